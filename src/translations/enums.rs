//! Enums used by the translations module.
//!
//! - `TemplateCategory`: what an embedded template means inside an entry.
//! - `ErrorKind`: every soft issue the parser can report.
//! - `Severity`: whether an issue invalidates the text it was found in.
//!
//! `ErrorKind` implements `Display`/`FromStr` using its stable snake_case code
//! so reports can be written out and read back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Templates that open a translation table.
pub const TOP_TEMPLATES: &[&str] = &[
    "trans-top",
    "trans-top-see",
    "trans-top-also",
    "checktrans-top",
    "ttbc-top",
];

/// Templates that close a translation table.
pub const BOTTOM_TEMPLATES: &[&str] = &["checktrans-bottom", "trans-bottom", "ttbc-bottom"];

const QUALIFIER_TEMPLATES: &[&str] = &["i", "q", "qf", "qual", "qualifier", "lb", "lbl", "label"];
const GENDER_TEMPLATES: &[&str] = &["g"];
const TRANSLATION_TEMPLATES: &[&str] = &[
    "t",
    "t+",
    "tt",
    "tt+",
    "t-check",
    "t+check",
    "t-egy",
    "tt-egy",
    "t-check-egy",
    "l",
];
const ALLOW_MISSING_TEMPLATES: &[&str] = &["not used", "t-needed", "t-simple"];
const IGNORE_TEMPLATES: &[&str] = &[
    "attention",
    "attn",
    "cite-book",
    "cite-web",
    "trans-bottom",
    "trans-mid",
    "trans-see",
];

/// Legacy link template that is accepted in place of a translation template.
pub const LEGACY_TRANSLATION_ALIAS: &str = "l";

/// Marker in a translation template name for the Egyptian transliteration
/// family, which carries no language code or target parameter.
pub const WRITING_SYSTEM_MARKER: &str = "-egy";

/// What a template found inside an entry is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateCategory {
    /// `{{q|...}}`, `{{lb|...}}` and friends: an annotation on the translation.
    Qualifier,
    /// `{{g|...}}`: grammatical genders kept outside the translation template.
    Gender,
    /// `{{t|...}}`, `{{tt+|...}}`, ...: the translation itself.
    Translation,
    /// `{{t-needed}}` etc: the entry may legitimately lack a translation.
    AllowMissing,
    /// Templates that only make sense as table structure, never in an entry.
    Ignore,
    /// Anything else.
    Unknown,
}

impl TemplateCategory {
    /// Classify a (trimmed) template name. Matching is exact and case-sensitive.
    pub fn classify(name: &str) -> Self {
        if QUALIFIER_TEMPLATES.contains(&name) {
            TemplateCategory::Qualifier
        } else if GENDER_TEMPLATES.contains(&name) {
            TemplateCategory::Gender
        } else if TRANSLATION_TEMPLATES.contains(&name) {
            TemplateCategory::Translation
        } else if ALLOW_MISSING_TEMPLATES.contains(&name) {
            TemplateCategory::AllowMissing
        } else if IGNORE_TEMPLATES.contains(&name) {
            TemplateCategory::Ignore
        } else {
            TemplateCategory::Unknown
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateCategory::Qualifier => write!(f, "Qualifier"),
            TemplateCategory::Gender => write!(f, "Gender"),
            TemplateCategory::Translation => write!(f, "Translation"),
            TemplateCategory::AllowMissing => write!(f, "AllowMissing"),
            TemplateCategory::Ignore => write!(f, "Ignore"),
            TemplateCategory::Unknown => write!(f, "Unknown"),
        }
    }
}

/// How serious a reported issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Every issue the parser reports through an [`ErrorSink`](crate::translations::ErrorSink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    HeaderHasPretext,
    HeaderHasPosttext,
    FooterHasPretext,
    FooterHasPosttext,
    UnexpectedLanguage,
    TableHtmlComment,
    UnexpectedData,
    ItemHtmlComment,
    NestedTemplate,
    MixedDelimiters,
    MultipleQualifierTemplates,
    MultipleGendersSources,
    #[serde(rename = "multiple_t_templates")]
    MultipleTranslationTemplates,
    AllowMissingHasTemplate,
    #[serde(rename = "t_is_l")]
    TranslationIsLink,
    IgnoredTemplate,
    UnexpectedTemplate,
    #[serde(rename = "missing_t")]
    MissingTranslationTemplate,
    #[serde(rename = "t_missing_p1")]
    MissingLanguageCode,
    WrongLanguageCode,
    MergedGenders,
    TextOutsideTemplate,
    MissingTranslationTarget,
}

const ALL_KINDS: &[ErrorKind] = &[
    ErrorKind::HeaderHasPretext,
    ErrorKind::HeaderHasPosttext,
    ErrorKind::FooterHasPretext,
    ErrorKind::FooterHasPosttext,
    ErrorKind::UnexpectedLanguage,
    ErrorKind::TableHtmlComment,
    ErrorKind::UnexpectedData,
    ErrorKind::ItemHtmlComment,
    ErrorKind::NestedTemplate,
    ErrorKind::MixedDelimiters,
    ErrorKind::MultipleQualifierTemplates,
    ErrorKind::MultipleGendersSources,
    ErrorKind::MultipleTranslationTemplates,
    ErrorKind::AllowMissingHasTemplate,
    ErrorKind::TranslationIsLink,
    ErrorKind::IgnoredTemplate,
    ErrorKind::UnexpectedTemplate,
    ErrorKind::MissingTranslationTemplate,
    ErrorKind::MissingLanguageCode,
    ErrorKind::WrongLanguageCode,
    ErrorKind::MergedGenders,
    ErrorKind::TextOutsideTemplate,
    ErrorKind::MissingTranslationTarget,
];

impl ErrorKind {
    /// Stable code used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::HeaderHasPretext => "header_has_pretext",
            ErrorKind::HeaderHasPosttext => "header_has_posttext",
            ErrorKind::FooterHasPretext => "footer_has_pretext",
            ErrorKind::FooterHasPosttext => "footer_has_posttext",
            ErrorKind::UnexpectedLanguage => "unexpected_language",
            ErrorKind::TableHtmlComment => "table_html_comment",
            ErrorKind::UnexpectedData => "unexpected_data",
            ErrorKind::ItemHtmlComment => "item_html_comment",
            ErrorKind::NestedTemplate => "nested_template",
            ErrorKind::MixedDelimiters => "mixed_delimiters",
            ErrorKind::MultipleQualifierTemplates => "multiple_qualifier_templates",
            ErrorKind::MultipleGendersSources => "multiple_genders_sources",
            ErrorKind::MultipleTranslationTemplates => "multiple_t_templates",
            ErrorKind::AllowMissingHasTemplate => "allow_missing_has_template",
            ErrorKind::TranslationIsLink => "t_is_l",
            ErrorKind::IgnoredTemplate => "ignored_template",
            ErrorKind::UnexpectedTemplate => "unexpected_template",
            ErrorKind::MissingTranslationTemplate => "missing_t",
            ErrorKind::MissingLanguageCode => "t_missing_p1",
            ErrorKind::WrongLanguageCode => "wrong_language_code",
            ErrorKind::MergedGenders => "merged_genders",
            ErrorKind::TextOutsideTemplate => "text_outside_template",
            ErrorKind::MissingTranslationTarget => "missing_translation_target",
        }
    }

    /// Only `Severity::Error` marks the owning entity as invalid.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::TranslationIsLink => Severity::Warning,
            ErrorKind::MergedGenders => Severity::Info,
            _ => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KINDS
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown ErrorKind '{}'", s))
    }
}
