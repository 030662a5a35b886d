//! Parser and validator for wiktionary-style translation tables.
//!
//! The interesting bits live in [`translations`]; the crate root only
//! re-exports the types most callers need.

pub mod translations;

pub use translations::{
    CurationStats, Entry, ErrorKind, ErrorSink, Issue, IssueLog, LanguageRegistry, Languages,
    Line, LogSink, T9nError, TableItem, TableParser, TranslationTable, find_tables,
    rewrite_tables,
};
