//! Language reference data.
//!
//! The parser never hard-codes language names; it asks a [`LanguageRegistry`].
//! [`Languages`] is the stock implementation: a name/id table, an alias table
//! mapping labels as they appear in tables (including nested `Parent:Child`
//! labels) onto canonical names, and the set of labels that may appear as an
//! empty parent row.
//!
//! Some of this is easier hard coded than guessed, so [`Languages::builtin`]
//! ships a small curated set. Larger tables can be loaded from JSON:
//!
//! ```json
//! {
//!   "languages": { "es": "Spanish", "cmn": "Mandarin" },
//!   "aliases": { "Chinese:Mandarin": "Mandarin" },
//!   "parents": ["Chinese"]
//! }
//! ```

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::translations::errors::{Result, T9nError};

/// Read-only lookups the parser needs.
pub trait LanguageRegistry {
    /// Canonical id for a canonical language name.
    fn resolve(&self, name: &str) -> Option<&str>;

    /// Canonical name for an id.
    fn name_of(&self, id: &str) -> Option<&str>;

    /// Map a label as written in a table onto a canonical name. Unknown
    /// labels come back unchanged.
    fn normalize<'a>(&'a self, label: &'a str) -> &'a str;

    /// Labels allowed as an empty row that only groups nested rows.
    fn is_parent_only(&self, label: &str) -> bool;

    /// `normalize` followed by `resolve`.
    fn lookup(&self, label: &str) -> Option<&str> {
        self.resolve(self.normalize(label))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Languages {
    ids: HashMap<String, String>,
    names: HashMap<String, String>,
    aliases: HashMap<String, String>,
    parents: HashSet<String>,
}

#[derive(Debug, Deserialize)]
struct LanguageFile {
    languages: HashMap<String, String>,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    parents: Vec<String>,
}

const BUILTIN_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("sq", "Albanian"),
    ("ar", "Arabic"),
    ("hy", "Armenian"),
    ("eu", "Basque"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("yue", "Cantonese"),
    ("ca", "Catalan"),
    ("hr", "Croatian"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("nl", "Dutch"),
    ("egy", "Egyptian"),
    ("eo", "Esperanto"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("gl", "Galician"),
    ("ka", "Georgian"),
    ("de", "German"),
    ("el", "Greek"),
    ("grc", "Ancient Greek"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("is", "Icelandic"),
    ("id", "Indonesian"),
    ("ga", "Irish"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("la", "Latin"),
    ("lv", "Latvian"),
    ("lt", "Lithuanian"),
    ("mk", "Macedonian"),
    ("ms", "Malay"),
    ("cmn", "Mandarin"),
    ("nan", "Min Nan"),
    ("nb", "Norwegian Bokmål"),
    ("nn", "Norwegian Nynorsk"),
    ("non", "Old Norse"),
    ("ang", "Old English"),
    ("fa", "Persian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sr", "Serbian"),
    ("sh", "Serbo-Croatian"),
    ("sk", "Slovak"),
    ("sl", "Slovene"),
    ("es", "Spanish"),
    ("sw", "Swahili"),
    ("sv", "Swedish"),
    ("tl", "Tagalog"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("cy", "Welsh"),
    ("yi", "Yiddish"),
];

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("Chinese:Mandarin", "Mandarin"),
    ("Chinese:Cantonese", "Cantonese"),
    ("Chinese:Min Nan", "Min Nan"),
    ("Norwegian:Bokmål", "Norwegian Bokmål"),
    ("Norwegian:Nynorsk", "Norwegian Nynorsk"),
    ("Greek:Ancient", "Ancient Greek"),
    ("Greek:Ancient Greek", "Ancient Greek"),
    ("Greek:Modern", "Greek"),
    ("Serbo-Croatian:Cyrillic", "Serbo-Croatian"),
    ("Serbo-Croatian:Roman", "Serbo-Croatian"),
    ("Slovenian", "Slovene"),
    ("Farsi", "Persian"),
];

const BUILTIN_PARENTS: &[&str] = &["Chinese", "Norwegian", "Greek", "Serbo-Croatian", "Sorbian", "Sami"];

impl Languages {
    pub fn new() -> Self {
        Self::default()
    }

    /// The curated tables shipped with the crate.
    pub fn builtin() -> Self {
        let mut langs = Self::new();
        for (id, name) in BUILTIN_LANGUAGES {
            langs.add_language(*id, *name);
        }
        for (label, name) in BUILTIN_ALIASES {
            langs.add_alias(*label, *name);
        }
        for label in BUILTIN_PARENTS {
            langs.add_parent(*label);
        }
        langs
    }

    /// Load tables from JSON; see the module docs for the layout.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: LanguageFile = serde_json::from_str(text)?;
        if file.languages.is_empty() {
            return Err(T9nError::language_data("no languages defined"));
        }

        let mut langs = Self::new();
        for (id, name) in file.languages {
            langs.add_language(id, name);
        }
        for (label, name) in file.aliases {
            if !langs.ids.contains_key(&name) {
                log::warn!("alias {:?} points at unknown language {:?}", label, name);
            }
            langs.add_alias(label, name);
        }
        for label in file.parents {
            langs.add_parent(label);
        }
        log::debug!(
            "loaded {} languages, {} aliases, {} parents",
            langs.ids.len(),
            langs.aliases.len(),
            langs.parents.len()
        );
        Ok(langs)
    }

    pub fn add_language<I: Into<String>, N: Into<String>>(&mut self, id: I, name: N) {
        let (id, name) = (id.into(), name.into());
        self.names.insert(id.clone(), name.clone());
        self.ids.insert(name, id);
    }

    pub fn add_alias<L: Into<String>, N: Into<String>>(&mut self, label: L, name: N) {
        self.aliases.insert(label.into(), name.into());
    }

    pub fn add_parent<L: Into<String>>(&mut self, label: L) {
        self.parents.insert(label.into());
    }
}

impl LanguageRegistry for Languages {
    fn resolve(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    fn normalize<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases.get(label).map_or(label, String::as_str)
    }

    fn is_parent_only(&self, label: &str) -> bool {
        self.parents.contains(label)
    }
}
