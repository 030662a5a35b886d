//! Hand-written scanners for the line-level grammar of translation tables.
//!
//! - [`parse_template_line`] pulls the first `{{name|params}}` out of a line
//!   together with the text around it (used for header and footer lines).
//! - [`parse_lang_line`] splits `* Language: data` rows into marker, label
//!   and data.
//! - [`find_templates`] / [`strip_templates`] work on the `{{...}}` spans
//!   inside a single entry.
//! - [`find_comment`] / [`find_nested_template`] locate constructs that make
//!   a line unparseable.
//!
//! The scanners deliberately reproduce some looseness of the markup found in
//! the wild: a template closed by a single `}` is still accepted by
//! [`parse_template_line`].

/// Result of [`parse_template_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLine<'a> {
    pub pretext: &'a str,
    pub name: &'a str,
    pub params: &'a str,
    pub posttext: &'a str,
}

/// Result of [`parse_lang_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LangLine<'a> {
    /// List-structure prefix such as `*` or `*:`.
    pub marker: &'a str,
    pub label: &'a str,
    /// Everything after the label, without leading/trailing `:` and spaces.
    pub data: &'a str,
}

/// A `{{...}}` span found inside an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedTemplate<'a> {
    /// The whole span including braces.
    pub raw: &'a str,
    /// Trimmed template name.
    pub name: &'a str,
    /// Raw parameter text (without the first `|`).
    pub params: &'a str,
}

const LABEL_TRIM: &[char] = &[':', ' ', '\u{200c}'];
const MARKER_TRIM: &[char] = &[' ', '\u{200c}'];
const DATA_TRIM: &[char] = &[':', ' '];

/// Extract the first template from `line`.
///
/// The name runs up to the first `|` or `}`; parameters run up to the next
/// `}`; any run of closing braces is swallowed, so `{{test}` closes just like
/// `{{test}}`. Returns `None` if the line has no `{{` opening followed by a
/// name and a `|` or `}`.
pub fn parse_template_line(line: &str) -> Option<TemplateLine<'_>> {
    let mut from = 0;
    while let Some(rel) = line[from..].find("{{") {
        let open = from + rel;
        if let Some(found) = template_line_at(line, open) {
            return Some(found);
        }
        from = open + 1;
    }
    None
}

fn template_line_at(line: &str, open: usize) -> Option<TemplateLine<'_>> {
    let body = open + 2;
    let stop = body + line[body..].find(['|', '}'])?;
    let region = &line[body..stop];
    if region.is_empty() {
        return None;
    }

    let params_start = stop + 1;
    let params_end = line[params_start..]
        .find('}')
        .map_or(line.len(), |p| params_start + p);
    let post_start = line.len() - line[params_end..].trim_start_matches('}').len();

    Some(TemplateLine {
        pretext: &line[..open],
        name: template_name(region),
        params: &line[params_start..params_end],
        posttext: &line[post_start..],
    })
}

/// Surrounding whitespace is not part of a name, but a name is never empty:
/// an all-whitespace region keeps its last character.
fn template_name(region: &str) -> &str {
    let trimmed = region.trim();
    if !trimmed.is_empty() {
        return trimmed;
    }
    match region.char_indices().last() {
        Some((i, _)) => &region[i..],
        None => region,
    }
}

/// Classify a table row as a language line.
///
/// Accepts all of:
///
/// ```text
/// * Spanish: {{tt|es|blah}}   (preferred)
/// * Spanish {{tt|es|blah}}    (missing :)
/// *: Spanish: {{tt|es|blah}}  (nested)
/// * Spanish: blah             (translation not in template)
/// Spanish {{tt|es|blah}}      (missing marker and :)
/// ```
///
/// The data must start with a `:` or a `{{t...` opening, which keeps plain
/// prose such as `Spanish bar` from being taken for a language line.
pub fn parse_lang_line(line: &str) -> Option<LangLine<'_>> {
    line.char_indices()
        .map(|(i, _)| i)
        .find_map(|start| lang_line_at(line, start))
}

fn lang_line_at(line: &str, start: usize) -> Option<LangLine<'_>> {
    let marker_start = skip_ws(line, start);
    let marker_run = line[marker_start..].len()
        - line[marker_start..]
            .trim_start_matches(['#', ':', '*'])
            .len();

    // the marker is greedy but gives characters back if nothing else fits
    for marker_len in (0..=marker_run).rev() {
        let marker_end = marker_start + marker_len;
        let label_ws = skip_ws(line, marker_end);
        // without a marker, the whitespace before it can be given to the label
        let ws_start = if marker_len == 0 { start } else { marker_end };

        let (label_start, ends) = match line[label_ws..].chars().next() {
            Some(c) if !is_label_stop(c) => (label_ws, label_ends(line, label_ws)),
            // a label made only of the whitespace before a `:` or `{`
            _ if label_ws > ws_start => {
                let (i, _) = line[ws_start..label_ws].char_indices().last()?;
                (ws_start + i, vec![label_ws])
            }
            _ => continue,
        };

        for end in ends {
            if let Some(data_start) = data_start_after_label(line, end) {
                return Some(LangLine {
                    marker: line[marker_start..marker_end].trim_matches(MARKER_TRIM),
                    label: line[label_start..end].trim_matches(LABEL_TRIM),
                    data: line[data_start..].trim_matches(DATA_TRIM),
                });
            }
        }
    }
    None
}

fn is_label_stop(c: char) -> bool {
    c == ':' || c == '{'
}

/// Candidate label end offsets, shortest first.
fn label_ends(line: &str, label_start: usize) -> Vec<usize> {
    line[label_start..]
        .char_indices()
        .take_while(|(_, c)| !is_label_stop(*c))
        .map(|(i, c)| label_start + i + c.len_utf8())
        .collect()
}

/// After the label: an optional `:`, whitespace, then data that starts with
/// `:` or `{{t`.
fn data_start_after_label(line: &str, end: usize) -> Option<usize> {
    if line[end..].starts_with(':') {
        let data = skip_ws(line, end + 1);
        if starts_data(&line[data..]) {
            return Some(data);
        }
    }
    let data = skip_ws(line, end);
    starts_data(&line[data..]).then_some(data)
}

fn starts_data(rest: &str) -> bool {
    rest.starts_with(':') || rest.starts_with("{{t")
}

fn skip_ws(s: &str, from: usize) -> usize {
    s.len() - s[from..].trim_start().len()
}

/// Find every `{{name|params}}` span in `text`, left to right, without
/// overlap. Spans that are not closed by `}}` are skipped.
pub fn find_templates(text: &str) -> Vec<EmbeddedTemplate<'_>> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(rel) = text[from..].find("{{") {
        let open = from + rel;
        match embedded_template_at(text, open) {
            Some(tpl) => {
                from = open + tpl.raw.len();
                found.push(tpl);
            }
            None => from = open + 1,
        }
    }
    found
}

fn embedded_template_at(text: &str, open: usize) -> Option<EmbeddedTemplate<'_>> {
    let body = open + 2;
    let stop = body + text[body..].find(['|', '}'])?;
    if stop == body {
        return None;
    }
    let params_start = if text[stop..].starts_with('|') { stop + 1 } else { stop };
    let params_end = text[params_start..]
        .find('}')
        .map_or(text.len(), |p| params_start + p);
    if !text[params_end..].starts_with("}}") {
        return None;
    }
    Some(EmbeddedTemplate {
        raw: &text[open..params_end + 2],
        name: text[body..stop].trim(),
        params: &text[params_start..params_end],
    })
}

/// Remove every `{{...}}` span that contains no `}`.
pub fn strip_templates(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut from = 0;
    let mut copied = 0;
    while let Some(rel) = text[from..].find("{{") {
        let open = from + rel;
        let inner = open + 2;
        let close = inner + text[inner..].find('}').unwrap_or(text.len() - inner);
        if text[close..].starts_with("}}") {
            out.push_str(&text[copied..open]);
            copied = close + 2;
            from = copied;
        } else {
            from = open + 1;
        }
    }
    out.push_str(&text[copied..]);
    out
}

/// The first markup comment in `text`; an unterminated comment runs to the
/// end of the text.
pub fn find_comment(text: &str) -> Option<&str> {
    let open = text.find("<!--")?;
    let body = open + 4;
    let end = text[body..].find("-->").map_or(text.len(), |p| body + p + 3);
    Some(&text[open..end])
}

/// The first template opened inside another template, e.g. the `{{l|x}}` in
/// `{{t|es|{{l|x}}}}`.
pub fn find_nested_template(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(rel) = text[from..].find("{{") {
        let outer = from + rel;
        let body = outer + 2;
        let segment_end = text[body..].find('}').map_or(text.len(), |p| body + p);
        if let Some(inner_rel) = text[body..segment_end].rfind("{{") {
            let inner = body + inner_rel;
            if let Some(close) = text[inner + 2..].find("}}") {
                return Some(&text[inner..inner + 2 + close + 2]);
            }
        }
        from = outer + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tl<'a>(pre: &'a str, name: &'a str, params: &'a str, post: &'a str) -> TemplateLine<'a> {
        TemplateLine {
            pretext: pre,
            name,
            params,
            posttext: post,
        }
    }

    #[rstest]
    #[case("{{test}}", tl("", "test", "", ""))]
    #[case("{{ test }}", tl("", "test", "", ""))]
    #[case("{{ test | bar }}", tl("", "test", " bar ", ""))]
    #[case("pre {{test}} post", tl("pre ", "test", "", " post"))]
    #[case("pre {{test|foo|bar=baz|}} post", tl("pre ", "test", "foo|bar=baz|", " post"))]
    #[case("{{foo|bar}} {{baz}}", tl("", "foo", "bar", " {{baz}}"))]
    #[case(
        "unclosed|end}} {{foo|bar}} {{baz|foo}}",
        tl("unclosed|end}} ", "foo", "bar", " {{baz|foo}}")
    )]
    // a single closing brace is accepted
    #[case("{{test|blah}", tl("", "test", "blah", ""))]
    #[case("{{test}", tl("", "test", "", ""))]
    #[case("{{trans-top|a [[dog]]}}", tl("", "trans-top", "a [[dog]]", ""))]
    fn template_line_matches(#[case] line: &str, #[case] expected: TemplateLine<'_>) {
        assert_eq!(parse_template_line(line), Some(expected));
    }

    #[rstest]
    #[case("test")]
    #[case("{test}")]
    #[case("{test}}")]
    #[case("{{test")]
    #[case("{{|x}}")]
    fn template_line_rejects(#[case] line: &str) {
        assert_eq!(parse_template_line(line), None);
    }

    fn ll<'a>(marker: &'a str, label: &'a str, data: &'a str) -> LangLine<'a> {
        LangLine {
            marker,
            label,
            data,
        }
    }

    #[rstest]
    #[case("* Spanish: {{tt|es|foo}} bar", ll("*", "Spanish", "{{tt|es|foo}} bar"))]
    #[case(
        "* Spanish: {{tt|es|foo}}, {{tt|es|bar}}",
        ll("*", "Spanish", "{{tt|es|foo}}, {{tt|es|bar}}")
    )]
    #[case("  * Spanish: {{tt|es|foo}} bar", ll("*", "Spanish", "{{tt|es|foo}} bar"))]
    #[case("* Spanish {{tt|es|foo}} bar", ll("*", "Spanish", "{{tt|es|foo}} bar"))]
    #[case("*: Spanish: {{tt|es|foo}} bar", ll("*:", "Spanish", "{{tt|es|foo}} bar"))]
    #[case(" Spanish: {{tt|es|foo}} bar", ll("", "Spanish", "{{tt|es|foo}} bar"))]
    #[case("Spanish {{tt|es|foo}} bar", ll("", "Spanish", "{{tt|es|foo}} bar"))]
    #[case("Spanish: bar", ll("", "Spanish", "bar"))]
    #[case("* Spanish:", ll("*", "Spanish", ""))]
    #[case("* Old Norse: {{t|non|hundr}}", ll("*", "Old Norse", "{{t|non|hundr}}"))]
    #[case("* Spanish\u{200c}: {{t|es|x}}", ll("*", "Spanish", "{{t|es|x}}"))]
    #[case("* Bokmål: {{t+|nb|hund|m}}", ll("*", "Bokmål", "{{t+|nb|hund|m}}"))]
    // leading whitespace alone can stand in for the label
    #[case(" {{t|es|x}}", ll("", "", "{{t|es|x}}"))]
    #[case(" : foo", ll("", "", "foo"))]
    #[case("\t: foo", ll("", "\t", "foo"))]
    #[case(" {{tt|es|x}}, {{t|es|y}}", ll("", "", "{{tt|es|x}}, {{t|es|y}}"))]
    #[case("* : foo", ll("*", "", "foo"))]
    fn lang_line_matches(#[case] line: &str, #[case] expected: LangLine<'_>) {
        assert_eq!(parse_lang_line(line), Some(expected));
    }

    #[rstest]
    #[case("Spanish bar")]
    #[case("* Spanish bar")]
    #[case("{{tt|es|foo}}")]
    #[case("")]
    #[case("{{trans-mid}}")]
    #[case("* Spanish {{q|informal}}")]
    fn lang_line_rejects(#[case] line: &str) {
        assert_eq!(parse_lang_line(line), None);
    }

    #[test]
    fn embedded_templates_in_order() {
        let found = find_templates("{{q|informal}} {{t+|es|perro|m}} {{g|m|f}}");
        let names: Vec<_> = found.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["q", "t+", "g"]);
        assert_eq!(found[1].raw, "{{t+|es|perro|m}}");
        assert_eq!(found[1].params, "es|perro|m");
        assert_eq!(found[2].params, "m|f");
    }

    #[test]
    fn embedded_templates_skip_unclosed() {
        let found = find_templates("{{t|es|a} {{ t-needed }}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "t-needed");
        assert_eq!(found[0].params, "");
    }

    #[test]
    fn strip_removes_only_closed_templates() {
        assert_eq!(strip_templates("(formal) {{t|es|usted}}, "), "(formal) , ");
        assert_eq!(strip_templates("{{t|es|a} b"), "{{t|es|a} b");
        assert_eq!(strip_templates("{{a}}{{b|c}}x"), "x");
    }

    #[test]
    fn comments_terminated_or_not() {
        assert_eq!(find_comment("a <!-- x --> b"), Some("<!-- x -->"));
        assert_eq!(find_comment("a <!-- x"), Some("<!-- x"));
        assert_eq!(find_comment("a b"), None);
    }

    #[test]
    fn nested_template_detection() {
        assert_eq!(
            find_nested_template("{{t|es|{{l|es|x}}}}"),
            Some("{{l|es|x}}")
        );
        assert_eq!(find_nested_template("{{t|es|a}}, {{t|es|b}}"), None);
    }
}
