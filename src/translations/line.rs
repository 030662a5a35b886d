//! One language row of a translation table.
//!
//! The data portion of a row is split into entries on top-level commas, or on
//! semicolons when there are no commas. A row that uses both, contains a
//! markup comment or nests a template inside a template is left alone: it is
//! reported and rendered exactly as written.

use std::fmt;

use itertools::Itertools;

use crate::translations::entry::Entry;
use crate::translations::enums::ErrorKind;
use crate::translations::grammar::{find_comment, find_nested_template};
use crate::translations::report::LineScope;
use crate::translations::split::{ENTRY_PAIRS, split_nested};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// List-structure marker, e.g. `*` or `*:`.
    pub depth: String,
    /// Label as resolved in context; nested rows are `Parent:Child`.
    pub language: String,
    pub lang_id: String,
    pub entries: Vec<Entry>,
    pub has_errors: bool,
    orig: String,
}

impl Line {
    pub(crate) fn parse(
        depth: &str,
        language: &str,
        lang_id: &str,
        data: &str,
        orig: &str,
        scope: &mut LineScope<'_, '_>,
    ) -> Line {
        let (entries, has_errors) = match parse_entries(data, lang_id, scope) {
            Some(entries) => (entries, false),
            None => (Vec::new(), true),
        };

        Line {
            depth: depth.to_string(),
            language: language.to_string(),
            lang_id: lang_id.to_string(),
            entries,
            has_errors,
            orig: orig.to_string(),
        }
    }

    /// The line exactly as it appeared in the table.
    pub fn original(&self) -> &str {
        &self.orig
    }

    /// Last component of a nested `Parent:Child` label.
    pub fn display_name(&self) -> &str {
        self.language.rsplit(':').next().unwrap_or(&self.language)
    }
}

/// `None` when the line has to be kept verbatim.
fn parse_entries(data: &str, lang_id: &str, scope: &mut LineScope<'_, '_>) -> Option<Vec<Entry>> {
    if let Some(comment) = find_comment(data) {
        scope.log(ErrorKind::ItemHtmlComment, comment);
        return None;
    }

    // TODO: {{l}} inside {{t}} could be rewritten as a [[link]] instead of rejecting the line
    if let Some(nested) = find_nested_template(data) {
        scope.log(ErrorKind::NestedTemplate, nested);
        return None;
    }

    let mut entries = Vec::new();
    for item in split_entry_list(data, scope)? {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let entry = Entry::parse(item, lang_id, scope);
        if entry.has_errors {
            return None;
        }
        entries.push(entry);
    }
    Some(entries)
}

/// Split a comma or semicolon delimited list of entries.
fn split_entry_list<'d>(data: &'d str, scope: &mut LineScope<'_, '_>) -> Option<Vec<&'d str>> {
    let commas = split_nested(data, ",", ENTRY_PAIRS);
    let semicolons = split_nested(data, ";", ENTRY_PAIRS);

    if commas.len() > 1 && semicolons.len() > 1 {
        scope.log(ErrorKind::MixedDelimiters, "");
        return None;
    }

    if commas.len() > 1 {
        Some(commas)
    } else {
        Some(semicolons)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_errors {
            return f.write_str(&self.orig);
        }

        let depth = if self.depth.is_empty() { "*" } else { &self.depth };
        write!(f, "{} {}:", depth, self.display_name())?;
        if !self.entries.is_empty() {
            write!(f, " {}", self.entries.iter().join(", "))?;
        }
        Ok(())
    }
}
