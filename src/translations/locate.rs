//! Finding translation tables in a whole page.
//!
//! Only markers at the top level count: a `{{trans-top}}` mentioned inside
//! another template or inside a markup comment does not start a table.

use std::ops::Range;

use lazy_regex::regex_captures;

use crate::translations::enums::{BOTTOM_TEMPLATES, TOP_TEMPLATES};
use crate::translations::report::ErrorSink;
use crate::translations::table::TableParser;

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";

#[derive(Debug, Default)]
struct MarkerScanner {
    depth: usize,
    in_comment: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Markers {
    top: bool,
    bottom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Top,
    Bottom,
}

impl Markers {
    fn add(&mut self, marker: Option<Marker>) {
        match marker {
            Some(Marker::Top) => self.top = true,
            Some(Marker::Bottom) => self.bottom = true,
            None => {}
        }
    }
}

impl MarkerScanner {
    /// Walk one line, carrying template and comment state over to the next.
    ///
    /// A line opening with a marker template is always at the top level, so
    /// a template left unclosed earlier (`{{trans-top|a}`) cannot swallow the
    /// rest of the page.
    fn scan_line(&mut self, line: &str) -> Markers {
        if !self.in_comment
            && let Some(after) = line.trim_start().strip_prefix("{{")
            && marker_after(after).is_some()
        {
            self.depth = 0;
        }

        let bytes = line.as_bytes();
        let mut found = Markers::default();
        let mut i = 0;
        while i < bytes.len() {
            let rest = &bytes[i..];
            if self.in_comment {
                if rest.starts_with(COMMENT_CLOSE) {
                    self.in_comment = false;
                    i += COMMENT_CLOSE.len();
                } else {
                    i += 1;
                }
            } else if rest.starts_with(COMMENT_OPEN) {
                self.in_comment = true;
                i += COMMENT_OPEN.len();
            } else if rest.starts_with(b"{{") {
                if self.depth == 0 {
                    found.add(marker_after(&line[i + 2..]));
                }
                self.depth += 1;
                i += 2;
            } else if rest.starts_with(b"}}") && self.depth > 0 {
                self.depth -= 1;
                i += 2;
            } else {
                i += 1;
            }
        }
        found
    }
}

/// `after` is the text following a `{{`.
fn marker_after(after: &str) -> Option<Marker> {
    let stop = after.find(['|', '}'])?;
    let name = after[..stop].trim();
    if TOP_TEMPLATES.contains(&name) {
        Some(Marker::Top)
    } else if BOTTOM_TEMPLATES.contains(&name) && after[stop..].starts_with("}}") {
        Some(Marker::Bottom)
    } else {
        None
    }
}

/// Line ranges (end exclusive) of the tables in `text`, header through footer.
///
/// A table without a footer ends before the next header, or at the end of
/// the text.
pub fn find_tables(text: &str) -> Vec<Range<usize>> {
    let mut scanner = MarkerScanner::default();
    let mut tables = Vec::new();
    let mut start = None;
    let mut count = 0;

    for (n, line) in text.split('\n').enumerate() {
        count = n + 1;
        let markers = scanner.scan_line(line);
        if markers.top {
            if let Some(open) = start.take() {
                tables.push(open..n);
            }
            start = Some(n);
        }
        if markers.bottom {
            if let Some(open) = start.take() {
                tables.push(open..n + 1);
            }
        }
    }
    if let Some(open) = start {
        tables.push(open..count);
    }
    tables
}

/// Title of a `==Heading==` line.
pub fn heading(line: &str) -> Option<&str> {
    regex_captures!(r"^=+\s*([^=]+?)\s*=+\s*$", line).map(|(_, title)| title)
}

/// Part of speech in effect at `line`: the last heading above it, skipping
/// the `Translations` headings that sit between a part of speech and its
/// tables.
fn part_of_speech<'t>(lines: &[&'t str], line: usize) -> &'t str {
    lines[..line]
        .iter()
        .rev()
        .filter_map(|&l| heading(l))
        .find(|title| !title.starts_with("Translations"))
        .unwrap_or("")
}

/// Re-render every table on a page.
///
/// Lines outside tables are copied unchanged. A table whose header cannot
/// be parsed is also copied unchanged, with a warning.
pub fn rewrite_tables(
    text: &str,
    page: &str,
    parser: &mut TableParser<'_>,
    sink: &mut dyn ErrorSink,
) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut copied = 0;

    for range in find_tables(text) {
        out.extend(lines[copied..range.start].iter().map(|l| l.to_string()));
        let pos = part_of_speech(&lines, range.start);
        match parser.parse(page, pos, &lines[range.clone()], sink) {
            Ok(table) => out.push(table.to_string()),
            Err(e) => {
                log::warn!("{} ({}): skipping table at line {}: {}", page, pos, range.start + 1, e);
                out.extend(lines[range.clone()].iter().map(|l| l.to_string()));
            }
        }
        copied = range.end;
    }
    out.extend(lines[copied..].iter().map(|l| l.to_string()));
    out.join("\n")
}
