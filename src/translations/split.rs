//! Delimiter splitting that respects nested bracket pairs.
//!
//! Works like splitting on top-level `|` inside a template, but the pairs are
//! supplied by the caller. Pieces are returned untrimmed so that joining them
//! with the delimiter gives back the input.

/// Bracket pairs that make a delimiter opaque inside a translation line:
/// templates, parentheses and markup comments.
pub const ENTRY_PAIRS: &[(&str, &str)] = &[("{{", "}}"), ("(", ")"), (COMMENT_OPEN, COMMENT_CLOSE)];

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Split `text` on `delimiter` wherever no pair from `pairs` is open.
///
/// Nested openers are tracked, except inside a markup comment where only the
/// comment's own closer counts. A closer that matches a pair further down the
/// stack closes everything above it. Stray closers are plain text.
pub fn split_nested<'a>(text: &'a str, delimiter: &str, pairs: &[(&str, &str)]) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut stack: Vec<(&str, &str)> = Vec::new();
    let mut piece_start = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        let opaque = stack.last().is_some_and(|(open, _)| *open == COMMENT_OPEN);
        let closing = if opaque {
            stack.len().checked_sub(1).filter(|_| rest.starts_with(COMMENT_CLOSE))
        } else {
            stack.iter().rposition(|(_, close)| rest.starts_with(close))
        };
        if let Some(depth) = closing {
            let (_, close) = stack[depth];
            stack.truncate(depth);
            i += close.len();
            continue;
        }

        if !opaque {
            if let Some(&(open, close)) = pairs.iter().find(|(open, _)| rest.starts_with(open)) {
                stack.push((open, close));
                i += open.len();
                continue;
            }
            if stack.is_empty() && !delimiter.is_empty() && rest.starts_with(delimiter) {
                pieces.push(&text[piece_start..i]);
                i += delimiter.len();
                piece_start = i;
                continue;
            }
        }

        i += rest.chars().next().map_or(1, char::len_utf8);
    }

    pieces.push(&text[piece_start..]);
    pieces
}
