//! Template parameters.
//!
//! `Params` keeps insertion order. Re-inserting an existing key replaces the
//! value in place, so `{{t|es|a|tr=x|tr=y}}` ends up with `tr=y` in the slot
//! the first `tr` occupied.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Key of a template parameter: 1-based position or name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamKey {
    Position(usize),
    Named(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    items: Vec<(ParamKey, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; overwriting keeps the original position.
    pub fn insert<V: Into<String>>(&mut self, key: ParamKey, value: V) {
        let value = value.into();
        match self.items.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.items.push((key, value)),
        }
    }

    pub fn insert_positional<V: Into<String>>(&mut self, position: usize, value: V) {
        self.insert(ParamKey::Position(position), value);
    }

    pub fn insert_named<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.insert(ParamKey::Named(name.into()), value);
    }

    fn find(&self, key: &ParamKey) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Positional parameter, 1-based.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.find(&ParamKey::Position(position))
    }

    pub fn get_named(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| matches!(k, ParamKey::Named(n) if n == name))
            .map(|(_, v)| v.as_str())
    }

    /// Like `get`, but treats an empty value as absent.
    pub fn get_non_empty(&self, position: usize) -> Option<&str> {
        self.get(position).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, position: usize) -> bool {
        self.get(position).is_some()
    }

    pub fn positional(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|(k, v)| match k {
            ParamKey::Position(_) => Some(v.as_str()),
            ParamKey::Named(_) => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, &str)> {
        self.items.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Renders the `|`-joined parameter list, `name=value` for named ones.
impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .items
            .iter()
            .map(|(k, v)| match k {
                ParamKey::Position(_) => v.clone(),
                ParamKey::Named(n) => format!("{}={}", n, v),
            })
            .join("|");
        f.write_str(&text)
    }
}

/// Parse raw parameter text such as `param1|named=val|param2`.
///
/// A piece is named only if it has an `=` followed by a non-empty value;
/// `foo=` stays positional. Positions count positional pieces only.
pub fn parse_params(text: &str) -> Params {
    let mut params = Params::new();
    if text.is_empty() {
        return params;
    }

    let mut position = 1;
    for piece in text.split('|') {
        match piece.split_once('=') {
            Some((name, value)) if !value.is_empty() => {
                params.insert_named(name.trim(), value.trim());
            }
            _ => {
                params.insert_positional(position, piece.trim());
                position += 1;
            }
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_and_named_with_duplicates() {
        let p = parse_params("param1|named=val|param2|dup=first|dup=second|g=foo|g2=bar");
        assert_eq!(p.get(1), Some("param1"));
        assert_eq!(p.get(2), Some("param2"));
        assert_eq!(p.get_named("named"), Some("val"));
        assert_eq!(p.get_named("dup"), Some("second"));
        assert_eq!(p.get_named("g2"), Some("bar"));
        assert_eq!(p.len(), 6);
        // the overwritten key keeps its first slot
        assert_eq!(p.to_string(), "param1|named=val|param2|dup=second|g=foo|g2=bar");
    }

    #[test]
    fn empty_text_gives_no_params() {
        assert!(parse_params("").is_empty());
    }

    #[test]
    fn empty_value_is_positional() {
        let p = parse_params("es|foo=|bar");
        assert_eq!(p.get(2), Some("foo="));
        assert_eq!(p.get(3), Some("bar"));
        assert_eq!(p.get_named("foo"), None);
    }

    #[test]
    fn values_are_trimmed_and_empty_pieces_kept() {
        let p = parse_params(" es | perro || tr = x ");
        assert_eq!(p.get(1), Some("es"));
        assert_eq!(p.get(2), Some("perro"));
        assert_eq!(p.get(3), Some(""));
        assert_eq!(p.get_non_empty(3), None);
        assert_eq!(p.get_named("tr"), Some("x"));
    }

    #[test]
    fn numeric_name_is_not_a_position() {
        let p = parse_params("es|2=perro");
        assert_eq!(p.get(2), None);
        assert_eq!(p.get_named("2"), Some("perro"));
        assert_eq!(p.positional().collect::<Vec<_>>(), vec!["es"]);
    }

    #[test]
    fn iter_yields_keys_in_order() {
        let p = parse_params("es|tr=x|perro");
        let items: Vec<_> = p.iter().collect();
        assert_eq!(
            items,
            vec![
                (&ParamKey::Position(1), "es"),
                (&ParamKey::Named("tr".to_string()), "x"),
                (&ParamKey::Position(2), "perro"),
            ]
        );
    }
}
