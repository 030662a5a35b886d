//! Issue reporting and curation tallies.
//!
//! Every problem found while parsing is handed to an [`ErrorSink`] as an
//! [`Issue`] carrying enough context (page, part of speech, gloss, language,
//! offending line) to be reviewed by a human later. Sinks are called
//! synchronously, in line order, and cannot influence the parse.
//!
//! [`CurationStats`] collects the unresolved-language tallies used to grow the
//! alias and parent tables. It is owned by the caller; parallel runs can each
//! keep their own and [`merge`](CurationStats::merge) them afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::translations::enums::{ErrorKind, Severity};

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: ErrorKind,
    pub page: String,
    pub pos: String,
    pub gloss: String,
    pub language: String,
    /// The line (or line fragment) the problem was found in.
    pub line: String,
    /// The part of `line` that triggered it, if narrower than the line.
    pub highlight: String,
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Receiver for reported issues.
pub trait ErrorSink {
    fn report(&mut self, issue: Issue);
}

impl<F> ErrorSink for F
where
    F: FnMut(Issue),
{
    fn report(&mut self, issue: Issue) {
        self(issue)
    }
}

/// Collects issues in memory.
#[derive(Debug, Clone, Default)]
pub struct IssueLog {
    pub issues: Vec<Issue>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.issues.iter().map(|i| i.kind).collect()
    }

    pub fn has(&self, kind: ErrorKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl ErrorSink for IssueLog {
    fn report(&mut self, issue: Issue) {
        self.issues.push(issue);
    }
}

/// Forwards issues to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&mut self, issue: Issue) {
        let level = match issue.severity() {
            Severity::Error => log::Level::Warn,
            Severity::Warning => log::Level::Info,
            Severity::Info => log::Level::Debug,
        };
        log::log!(
            level,
            "[{}] {} ({}) {}: {:?} {:?}",
            issue.kind,
            issue.page,
            issue.pos,
            issue.language,
            issue.line,
            issue.highlight
        );
    }
}

/// Tallies of labels that did not resolve to a language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationStats {
    /// label -> language code seen in its first translation template -> count
    pub unknown_languages: BTreeMap<String, BTreeMap<String, usize>>,
    /// empty unresolved labels that might be parent-only languages -> count
    pub parent_candidates: BTreeMap<String, usize>,
}

impl CurationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_unknown(&mut self, label: &str, code: &str) {
        *self
            .unknown_languages
            .entry(label.to_string())
            .or_default()
            .entry(code.to_string())
            .or_default() += 1;
    }

    pub fn record_parent_candidate(&mut self, label: &str) {
        *self.parent_candidates.entry(label.to_string()).or_default() += 1;
    }

    pub fn merge(&mut self, other: CurationStats) {
        for (label, codes) in other.unknown_languages {
            let slot = self.unknown_languages.entry(label).or_default();
            for (code, n) in codes {
                *slot.entry(code).or_default() += n;
            }
        }
        for (label, n) in other.parent_candidates {
            *self.parent_candidates.entry(label).or_default() += n;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unknown_languages.is_empty() && self.parent_candidates.is_empty()
    }
}

/// Table-wide reporting context.
pub(crate) struct TableScope<'s> {
    page: &'s str,
    pos: &'s str,
    gloss: String,
    sink: &'s mut dyn ErrorSink,
}

impl<'s> TableScope<'s> {
    pub(crate) fn new(page: &'s str, pos: &'s str, sink: &'s mut dyn ErrorSink) -> Self {
        Self {
            page,
            pos,
            gloss: String::new(),
            sink,
        }
    }

    pub(crate) fn set_gloss<S: Into<String>>(&mut self, gloss: S) {
        self.gloss = gloss.into();
    }

    pub(crate) fn gloss(&self) -> &str {
        &self.gloss
    }

    pub(crate) fn log(&mut self, kind: ErrorKind, line: &str, highlight: &str, language: &str) {
        log::debug!("{}: {} {:?} {:?}", self.page, kind, line, highlight);
        self.sink.report(Issue {
            kind,
            page: self.page.to_string(),
            pos: self.pos.to_string(),
            gloss: self.gloss.clone(),
            language: language.to_string(),
            line: line.to_string(),
            highlight: highlight.to_string(),
        });
    }

    /// Narrow the scope to one language line.
    pub(crate) fn line<'l>(&'l mut self, line: &'l str, language: &'l str) -> LineScope<'l, 's> {
        LineScope {
            table: self,
            line,
            language,
        }
    }
}

/// Reporting context for one language line.
pub(crate) struct LineScope<'l, 's> {
    table: &'l mut TableScope<'s>,
    line: &'l str,
    language: &'l str,
}

impl LineScope<'_, '_> {
    pub(crate) fn log(&mut self, kind: ErrorKind, highlight: &str) {
        let (line, language) = (self.line, self.language);
        self.table.log(kind, line, highlight, language);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, Once};

    /// Keeps every record so tests can look at what a sink logged.
    struct CaptureLogger {
        records: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };
    static INIT: Once = Once::new();

    fn captured(page: &str) -> Vec<(log::Level, String)> {
        INIT.call_once(|| {
            log::set_logger(&LOGGER).expect("no other logger in tests");
            log::set_max_level(log::LevelFilter::Trace);
        });
        LOGGER
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, msg)| msg.contains(page))
            .cloned()
            .collect()
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |issue: Issue| seen.push(issue.kind);
            let mut scope = TableScope::new("dog", "Noun", &mut sink);
            scope.set_gloss("animal");
            scope.log(ErrorKind::UnexpectedData, "junk", "", "");
        }
        assert_eq!(seen, vec![ErrorKind::UnexpectedData]);
    }

    #[test]
    fn line_scope_carries_context() {
        let mut log = IssueLog::new();
        {
            let mut scope = TableScope::new("dog", "Noun", &mut log);
            scope.set_gloss("animal");
            let mut line = scope.line("* Spanish: {{t|fr|chien}}", "Spanish");
            line.log(ErrorKind::WrongLanguageCode, "|fr|");
        }
        let issue = &log.issues[0];
        assert_eq!(issue.page, "dog");
        assert_eq!(issue.pos, "Noun");
        assert_eq!(issue.gloss, "animal");
        assert_eq!(issue.language, "Spanish");
        assert_eq!(issue.line, "* Spanish: {{t|fr|chien}}");
        assert_eq!(issue.highlight, "|fr|");
        assert!(log.has(ErrorKind::WrongLanguageCode));
    }

    #[test]
    fn stats_merge_adds_counts() {
        let mut a = CurationStats::new();
        a.record_unknown("Klingon", "tlh");
        a.record_parent_candidate("Alien");
        let mut b = CurationStats::new();
        b.record_unknown("Klingon", "tlh");
        b.record_unknown("Klingon", "kl");
        b.record_parent_candidate("Alien");
        a.merge(b);
        assert_eq!(a.unknown_languages["Klingon"]["tlh"], 2);
        assert_eq!(a.unknown_languages["Klingon"]["kl"], 1);
        assert_eq!(a.parent_candidates["Alien"], 2);
        assert!(!a.is_empty());
    }

    #[test]
    fn log_sink_maps_severity_to_level() {
        captured("");
        let mut sink = LogSink;
        let kinds = [
            ErrorKind::WrongLanguageCode,
            ErrorKind::TranslationIsLink,
            ErrorKind::MergedGenders,
        ];
        for kind in kinds {
            sink.report(Issue {
                kind,
                page: "logsink-page".to_string(),
                pos: "Noun".to_string(),
                gloss: String::new(),
                language: "Spanish".to_string(),
                line: "* Spanish: {{t|es|perro}}".to_string(),
                highlight: String::new(),
            });
        }

        let levels: Vec<_> = captured("logsink-page")
            .into_iter()
            .filter(|(_, msg)| msg.starts_with('['))
            .map(|(level, _)| level)
            .collect();
        assert_eq!(levels, vec![log::Level::Warn, log::Level::Info, log::Level::Debug]);
        assert_eq!(captured("[wrong_language_code] logsink-page (Noun) Spanish").len(), 1);
    }
}
