//! A single translation inside a language line.
//!
//! An entry is one comma (or semicolon) separated piece of a line such as
//! `{{q|informal}} {{t+|es|perro|m}}`. Parsing classifies every embedded
//! template, folds external `{{g}}` genders into the translation template and
//! checks the result against the line's language. Any error makes the entry
//! render as its original text.

use std::fmt;

use crate::translations::enums::{
    ErrorKind, LEGACY_TRANSLATION_ALIAS, TemplateCategory, WRITING_SYSTEM_MARKER,
};
use crate::translations::grammar::{find_templates, strip_templates};
use crate::translations::params::{Params, parse_params};
use crate::translations::report::LineScope;

/// Characters that may surround the templates of an entry without counting
/// as stray text.
const OUTSIDE_TRIM: &[char] = &[' ', ',', ';', '.', ':', '¿', '?', '¡', '!', '\'', '(', ')'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    orig: String,
    /// Name of the translation template, e.g. `t+`.
    pub template: Option<String>,
    pub params: Params,
    /// Raw text of the qualifier template, e.g. `{{q|formal}}`.
    pub qualifier: Option<String>,
    pub qualifier_before: bool,
    pub has_errors: bool,
}

/// Tracks errors while one entry is parsed.
struct EntryReport<'e, 'l, 's> {
    scope: &'e mut LineScope<'l, 's>,
    orig: &'e str,
    has_errors: bool,
}

impl EntryReport<'_, '_, '_> {
    /// Report and invalidate. Without a highlight the whole entry is quoted.
    fn error(&mut self, kind: ErrorKind, highlight: Option<&str>) {
        self.has_errors = true;
        self.note(kind, highlight);
    }

    /// Report without invalidating.
    fn note(&mut self, kind: ErrorKind, highlight: Option<&str>) {
        let highlight = highlight.unwrap_or(self.orig);
        self.scope.log(kind, highlight);
    }
}

impl Entry {
    /// Parse one entry of a line whose language resolved to `lang_id`.
    pub(crate) fn parse(text: &str, lang_id: &str, scope: &mut LineScope<'_, '_>) -> Entry {
        let mut report = EntryReport {
            scope,
            orig: text,
            has_errors: false,
        };

        let mut template: Option<&str> = None;
        let mut params = Params::new();
        let mut qualifier: Option<&str> = None;
        let mut qualifier_before = false;
        let mut genders: Vec<String> = Vec::new();
        let mut allow_missing = false;

        for tpl in find_templates(text) {
            match TemplateCategory::classify(tpl.name) {
                TemplateCategory::Qualifier => {
                    if qualifier.is_some() {
                        report.error(ErrorKind::MultipleQualifierTemplates, None);
                    }
                    qualifier = Some(tpl.raw);
                    if template.is_none() {
                        qualifier_before = true;
                    }
                }
                TemplateCategory::Gender => {
                    if params.get_non_empty(3).is_some() {
                        report.error(ErrorKind::MultipleGendersSources, None);
                    }
                    for g in parse_params(tpl.params).positional() {
                        if !g.is_empty() && !genders.iter().any(|seen| seen == g) {
                            genders.push(g.to_string());
                        }
                    }
                }
                TemplateCategory::Translation => {
                    if template.is_some() {
                        report.error(ErrorKind::MultipleTranslationTemplates, None);
                        continue;
                    }
                    if allow_missing {
                        report.error(ErrorKind::AllowMissingHasTemplate, None);
                    }
                    template = Some(tpl.name);
                    params = parse_params(tpl.params);
                    if tpl.name == LEGACY_TRANSLATION_ALIAS {
                        report.note(ErrorKind::TranslationIsLink, None);
                    }
                }
                TemplateCategory::AllowMissing => allow_missing = true,
                TemplateCategory::Ignore => report.error(ErrorKind::IgnoredTemplate, Some(tpl.raw)),
                TemplateCategory::Unknown => {
                    report.error(ErrorKind::UnexpectedTemplate, Some(tpl.raw))
                }
            }
        }

        let Some(name) = template.filter(|_| !params.is_empty()) else {
            if !allow_missing {
                report.error(ErrorKind::MissingTranslationTemplate, None);
            }
            return Entry {
                orig: text.to_string(),
                template: None,
                params: Params::new(),
                qualifier: None,
                qualifier_before: false,
                has_errors: report.has_errors,
            };
        };
        let exempt = name.contains(WRITING_SYSTEM_MARKER);

        match params.get_non_empty(1) {
            None => {
                let highlight = format!("{{{{{}|", name);
                report.error(ErrorKind::MissingLanguageCode, Some(&highlight));
            }
            Some(code) if code != lang_id && !exempt => {
                let highlight = format!("|{}|", code);
                report.error(ErrorKind::WrongLanguageCode, Some(&highlight));
            }
            Some(_) => {}
        }

        if !genders.is_empty() && !exempt {
            if params.contains(3) {
                report.error(ErrorKind::MultipleGendersSources, None);
            } else {
                for (position, gender) in (3usize..).zip(&genders) {
                    params.insert_positional(position, gender.as_str());
                }
                log::info!("merged genders {:?} into {:?}", genders, text);
                report.note(ErrorKind::MergedGenders, None);
            }
        }

        let stripped = strip_templates(text);
        let stripped = stripped.trim_matches(OUTSIDE_TRIM);
        if !stripped.is_empty() {
            report.error(ErrorKind::TextOutsideTemplate, Some(stripped));
        }

        if !report.has_errors && params.get_non_empty(2).is_none() && !exempt {
            report.error(ErrorKind::MissingTranslationTarget, None);
        }

        Entry {
            orig: text.to_string(),
            template: Some(name.to_string()),
            params,
            qualifier: qualifier.map(str::to_string),
            qualifier_before,
            has_errors: report.has_errors,
        }
    }

    /// The text this entry was parsed from.
    pub fn original(&self) -> &str {
        &self.orig
    }

    /// Whether the entry renders in normalized form rather than verbatim.
    pub fn is_canonical(&self) -> bool {
        !self.has_errors && self.template.is_some() && !self.params.is_empty()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(name) = self.template.as_deref().filter(|_| self.is_canonical()) else {
            return f.write_str(&self.orig);
        };

        let template = format!("{{{{{}|{}}}}}", name, self.params);
        match &self.qualifier {
            Some(q) if self.qualifier_before => write!(f, "{} {}", q, template),
            Some(q) => write!(f, "{} {}", template, q),
            None => f.write_str(&template),
        }
    }
}
