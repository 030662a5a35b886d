//! A whole translation table, from `{{trans-top}}` to `{{trans-bottom}}`.
//!
//! [`TableParser`] owns the language lookups and the curation tallies for a
//! run; each call to [`TableParser::parse`] turns the lines of one block into
//! a [`TranslationTable`]. Every body line becomes exactly one
//! [`TableItem`], so rendering the table reproduces the block line for line:
//! valid language rows in normalized form, everything else verbatim.

use std::fmt;

use lazy_regex::{regex_captures, regex_is_match};

use crate::translations::enums::{ErrorKind, TOP_TEMPLATES};
use crate::translations::errors::{Result, T9nError};
use crate::translations::grammar::{TemplateLine, find_comment, parse_lang_line, parse_template_line};
use crate::translations::languages::LanguageRegistry;
use crate::translations::line::Line;
use crate::translations::params::parse_params;
use crate::translations::report::{CurationStats, ErrorSink, TableScope};

/// One body line of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableItem {
    Parsed(Line),
    Verbatim(String),
}

impl TableItem {
    pub fn as_line(&self) -> Option<&Line> {
        match self {
            TableItem::Parsed(line) => Some(line),
            TableItem::Verbatim(_) => None,
        }
    }
}

impl fmt::Display for TableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableItem::Parsed(line) => line.fmt(f),
            TableItem::Verbatim(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    pub page: String,
    pub pos: String,
    /// Name of the header template, e.g. `trans-top`.
    pub template: String,
    /// Raw parameter text of the header template.
    pub params: String,
    /// Word sense the table is for (first header parameter).
    pub gloss: String,
    /// Every line after the header, footer included.
    pub items: Vec<TableItem>,
    header: String,
    footer: String,
}

impl TranslationTable {
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    /// The language rows that were recognised.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.items.iter().filter_map(TableItem::as_line)
    }

    /// True if any recognised row has to be kept verbatim.
    pub fn has_errors(&self) -> bool {
        self.lines().any(|line| line.has_errors)
    }
}

impl fmt::Display for TranslationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        for item in &self.items {
            write!(f, "\n{}", item)?;
        }
        Ok(())
    }
}

/// Parses table blocks against one language registry, tallying unresolved
/// labels as it goes.
pub struct TableParser<'a> {
    languages: &'a dyn LanguageRegistry,
    stats: CurationStats,
}

impl<'a> TableParser<'a> {
    pub fn new(languages: &'a dyn LanguageRegistry) -> Self {
        Self {
            languages,
            stats: CurationStats::new(),
        }
    }

    pub fn stats(&self) -> &CurationStats {
        &self.stats
    }

    /// Hand the tallies to the caller, leaving an empty set behind.
    pub fn take_stats(&mut self) -> CurationStats {
        std::mem::take(&mut self.stats)
    }

    /// Parse one block. `lines[0]` is the header, the last line the footer.
    ///
    /// Fails only if there are no lines or the header is not a top marker
    /// template; every other problem is sent to `sink` and the offending
    /// text is kept as written.
    pub fn parse<S: AsRef<str>>(
        &mut self,
        page: &str,
        pos: &str,
        lines: &[S],
        sink: &mut dyn ErrorSink,
    ) -> Result<TranslationTable> {
        let (header, body) = lines.split_first().ok_or(T9nError::EmptyTable)?;
        let header = header.as_ref();
        let footer = lines.last().map_or(header, |l| l.as_ref());

        let top = parse_template_line(header)
            .filter(|t| TOP_TEMPLATES.contains(&t.name))
            .ok_or_else(|| T9nError::header(header))?;

        let mut scope = TableScope::new(page, pos, sink);
        let params = top.params.trim();
        scope.set_gloss(parse_params(params).get(1).unwrap_or(""));
        check_surroundings(
            &mut scope,
            &top,
            ErrorKind::HeaderHasPretext,
            ErrorKind::HeaderHasPosttext,
        );

        let mut parents = Vec::new();
        let mut items = Vec::with_capacity(body.len());
        for line in body {
            items.push(self.parse_item(line.as_ref(), &mut parents, &mut scope));
        }

        if let Some(bottom) = parse_template_line(footer) {
            check_surroundings(
                &mut scope,
                &bottom,
                ErrorKind::FooterHasPretext,
                ErrorKind::FooterHasPosttext,
            );
        }

        let parsed = items.iter().filter(|i| i.as_line().is_some()).count();
        log::debug!(
            "{} ({}): table {:?} with {} lines, {} language rows",
            page,
            pos,
            scope.gloss(),
            items.len(),
            parsed
        );

        Ok(TranslationTable {
            page: page.to_string(),
            pos: pos.to_string(),
            template: top.name.to_string(),
            params: params.to_string(),
            gloss: scope.gloss().to_string(),
            items,
            header: header.to_string(),
            footer: footer.to_string(),
        })
    }

    /// `parents` is the stack of labels of the enclosing rows.
    fn parse_item<'l>(
        &mut self,
        line: &'l str,
        parents: &mut Vec<&'l str>,
        scope: &mut TableScope<'_>,
    ) -> TableItem {
        let verbatim = || TableItem::Verbatim(line.to_string());
        if line.is_empty() {
            return verbatim();
        }

        if let Some(lang_line) = parse_lang_line(line) {
            let depth = lang_line.marker.len().saturating_sub(1);
            parents.truncate(depth);
            parents.push(lang_line.label);
            let label = if parents.len() > 1 {
                parents.join(":")
            } else {
                lang_line.label.to_string()
            };

            let languages = self.languages;
            if let Some(lang_id) = languages.lookup(&label) {
                let name = languages.name_of(lang_id).unwrap_or(label.as_str());
                let mut line_scope = scope.line(line, name);
                let parsed = Line::parse(
                    lang_line.marker,
                    &label,
                    lang_id,
                    lang_line.data,
                    line,
                    &mut line_scope,
                );
                return TableItem::Parsed(parsed);
            }

            if !label.is_empty() {
                if let Some((_, code)) =
                    regex_captures!(r"\{\{(?:t|t\+|tt|tt\+)\|([^|}]*)", lang_line.data)
                {
                    self.stats.record_unknown(&label, code);
                } else if lang_line.data.is_empty() {
                    if languages.is_parent_only(&label) {
                        return verbatim();
                    }
                    self.stats.record_parent_candidate(&label);
                }

                scope.log(ErrorKind::UnexpectedLanguage, line, lang_line.label, &label);
                return verbatim();
            }
        }

        if let Some(comment) = find_comment(line) {
            scope.log(ErrorKind::TableHtmlComment, comment, "", "");
            return verbatim();
        }

        if is_allowed_line(line) {
            return verbatim();
        }

        scope.log(ErrorKind::UnexpectedData, line, "", "");
        verbatim()
    }
}

/// Table structure lines that carry no language data.
fn is_allowed_line(line: &str) -> bool {
    regex_is_match!(
        r"^\s*(?:\{\{trans-mid\}\}|\{\{(?:checktrans|trans|ttbc)-bottom\}\}|\{\{multitrans\|data=|\}\})+\s*$",
        line
    )
}

/// Text before or after a marker template is reported but tolerated.
fn check_surroundings(
    scope: &mut TableScope<'_>,
    template: &TemplateLine<'_>,
    pretext_kind: ErrorKind,
    posttext_kind: ErrorKind,
) {
    if !template.pretext.trim().is_empty() {
        scope.log(pretext_kind, template.pretext, "", "");
    }
    if !template.posttext.trim().is_empty() {
        scope.log(posttext_kind, template.posttext, "", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::languages::Languages;
    use crate::translations::report::IssueLog;
    use pretty_assertions::assert_eq;

    fn parse_lines(lines: &[&str]) -> (TranslationTable, IssueLog, CurationStats) {
        let languages = Languages::builtin();
        let mut parser = TableParser::new(&languages);
        let mut log = IssueLog::new();
        let table = parser
            .parse("dog", "Noun", lines, &mut log)
            .expect("header parses");
        (table, log, parser.take_stats())
    }

    #[test]
    fn clean_table_round_trips() {
        let lines = [
            "{{trans-top|domesticated animal}}",
            "* French: {{t+|fr|chien|m}}",
            "* Spanish: {{t+|es|perro|m}}, {{t|es|can|m}}",
            "{{trans-mid}}",
            "",
            "* Swedish: {{t+|sv|hund|c}}",
            "{{trans-bottom}}",
        ];
        let (table, log, stats) = parse_lines(&lines);
        assert!(log.is_empty(), "{:?}", log.issues);
        assert!(stats.is_empty());
        assert_eq!(table.template, "trans-top");
        assert_eq!(table.gloss, "domesticated animal");
        assert_eq!(table.items.len(), lines.len() - 1);
        assert_eq!(table.lines().count(), 3);
        assert!(!table.has_errors());
        assert_eq!(table.to_string(), lines.join("\n"));
    }

    #[test]
    fn normalizes_valid_lines_only() {
        let lines = [
            "{{trans-top|dog}}",
            "*Spanish {{t|es|perro}} {{g|m}}",
            "* French: {{t|es|chien}}",
            "{{trans-bottom}}",
        ];
        let (table, log, _) = parse_lines(&lines);
        assert_eq!(
            log.kinds(),
            vec![ErrorKind::MergedGenders, ErrorKind::WrongLanguageCode]
        );
        let wrong = &log.issues[1];
        assert_eq!(wrong.language, "French");
        assert_eq!(wrong.gloss, "dog");
        assert_eq!(wrong.line, "* French: {{t|es|chien}}");
        assert_eq!(
            table.to_string(),
            "{{trans-top|dog}}\n* Spanish: {{t|es|perro|m}}\n* French: {{t|es|chien}}\n{{trans-bottom}}"
        );
    }

    #[test]
    fn unparsable_header_aborts() {
        let languages = Languages::builtin();
        let mut parser = TableParser::new(&languages);
        let mut log = IssueLog::new();

        let err = parser
            .parse("dog", "Noun", &["{{see also|cat}}", "{{trans-bottom}}"], &mut log)
            .unwrap_err();
        assert_eq!(err.kind(), "UnparsableHeader");

        let err = parser.parse("dog", "Noun", &["just text"], &mut log).unwrap_err();
        assert_eq!(err.kind(), "UnparsableHeader");

        let empty: [&str; 0] = [];
        let err = parser.parse("dog", "Noun", &empty, &mut log).unwrap_err();
        assert_eq!(err.kind(), "EmptyTable");
        assert!(log.is_empty());
    }

    #[test]
    fn header_and_footer_leakage() {
        let lines = [
            "pre {{trans-top|dog}} post",
            "* Spanish: {{t|es|perro}}",
            "{{trans-bottom}} <!-- end -->",
        ];
        let (table, log, _) = parse_lines(&lines);
        assert_eq!(
            log.kinds(),
            vec![
                ErrorKind::HeaderHasPretext,
                ErrorKind::HeaderHasPosttext,
                ErrorKind::TableHtmlComment,
                ErrorKind::FooterHasPosttext,
            ]
        );
        assert_eq!(log.issues[0].line, "pre ");
        assert_eq!(log.issues[1].gloss, "dog");
        assert_eq!(log.issues[3].line, " <!-- end -->");
        assert_eq!(table.to_string(), lines.join("\n"));

        let lines = ["{{trans-top|dog}}", "* Spanish: {{t|es|perro}}", "* {{trans-bottom}}"];
        let (table, log, _) = parse_lines(&lines);
        assert_eq!(
            log.kinds(),
            vec![ErrorKind::UnexpectedData, ErrorKind::FooterHasPretext]
        );
        assert_eq!(log.issues[1].line, "* ");
        assert_eq!(table.to_string(), lines.join("\n"));
    }

    #[test]
    fn indented_row_without_label_is_plain_data() {
        let lines = [
            "{{trans-top|dog}}",
            "* Spanish: {{t|es|perro}}",
            " {{tt|es|can}}, {{t|es|chucho}}",
            "{{trans-bottom}}",
        ];
        let (table, log, stats) = parse_lines(&lines);
        assert_eq!(log.kinds(), vec![ErrorKind::UnexpectedData]);
        assert_eq!(log.issues[0].line, " {{tt|es|can}}, {{t|es|chucho}}");
        assert!(stats.is_empty());
        assert_eq!(table.to_string(), lines.join("\n"));
    }

    #[test]
    fn loose_footer_is_accepted() {
        let (table, log, _) = parse_lines(&["{{checktrans-top}}", "* Spanish: {{t|es|perro}}", "}}"]);
        assert!(log.is_empty());
        assert_eq!(table.footer(), "}}");
    }

    #[test]
    fn nested_rows_use_parent_context() {
        let lines = [
            "{{trans-top|dog}}",
            "* Chinese:",
            "*: Mandarin: {{t+|cmn|狗|tr=gǒu}}",
            "*: Cantonese: {{t|yue|狗|tr=gau2}}",
            "* Norwegian:",
            "*: Bokmål: {{t+|nb|hund|m}}",
            "{{trans-bottom}}",
        ];
        let (table, log, stats) = parse_lines(&lines);
        assert!(log.is_empty(), "{:?}", log.issues);
        assert!(stats.is_empty());
        let labels: Vec<_> = table.lines().map(|l| l.language.as_str()).collect();
        assert_eq!(labels, vec!["Chinese:Mandarin", "Chinese:Cantonese", "Norwegian:Bokmål"]);
        assert_eq!(table.lines().next().unwrap().lang_id, "cmn");
        assert!(matches!(&table.items[0], TableItem::Verbatim(s) if s == "* Chinese:"));
        assert_eq!(table.to_string(), lines.join("\n"));
    }

    #[test]
    fn unknown_languages_are_tallied() {
        let lines = [
            "{{trans-top|dog}}",
            "* Klingon: {{t|tlh|targh}}",
            "* Elvish:",
            "* Klingon: {{tt+|tlh|SaQ}}",
            "{{trans-bottom}}",
        ];
        let (table, log, stats) = parse_lines(&lines);
        assert_eq!(log.kinds(), vec![ErrorKind::UnexpectedLanguage; 3]);
        assert_eq!(log.issues[0].highlight, "Klingon");
        assert_eq!(stats.unknown_languages["Klingon"]["tlh"], 2);
        assert_eq!(stats.parent_candidates["Elvish"], 1);
        assert_eq!(table.lines().count(), 0);
        assert_eq!(table.to_string(), lines.join("\n"));
    }

    #[test]
    fn parent_only_label_is_benign() {
        let (_, log, stats) = parse_lines(&["{{trans-top|dog}}", "* Chinese:", "{{trans-bottom}}"]);
        assert!(log.is_empty());
        assert!(stats.is_empty());
    }

    #[test]
    fn comments_filler_and_junk() {
        let lines = [
            "{{trans-top|dog}}",
            "<!-- add more -->",
            "{{multitrans|data=",
            "* Spanish: {{tt+|es|perro}}",
            "}}",
            "some loose prose",
            "{{trans-bottom}}",
        ];
        let (table, log, _) = parse_lines(&lines);
        assert_eq!(
            log.kinds(),
            vec![ErrorKind::TableHtmlComment, ErrorKind::UnexpectedData]
        );
        assert_eq!(log.issues[0].line, "<!-- add more -->");
        assert_eq!(log.issues[1].line, "some loose prose");
        assert_eq!(table.to_string(), lines.join("\n"));
    }

    #[test]
    fn mixed_delimiters_render_verbatim() {
        let bad = "* Spanish: {{t|es|perro}}; {{t|es|can}}, {{t|es|chucho}}";
        let lines = ["{{trans-top|dog}}", bad, "{{trans-bottom}}"];
        let (table, log, _) = parse_lines(&lines);
        assert_eq!(log.kinds(), vec![ErrorKind::MixedDelimiters]);
        assert!(table.has_errors());
        assert_eq!(table.items[0].to_string(), bad);
    }

    #[test]
    fn single_line_table() {
        let (table, log, _) = parse_lines(&["{{trans-top|dog}}"]);
        assert!(log.is_empty());
        assert!(table.items.is_empty());
        assert_eq!(table.to_string(), "{{trans-top|dog}}");
    }
}
