//! Translation table module root
//!
//! Declares the submodules and re-exports the commonly-used items so callers
//! can `use t9n_table::translations::...`.
//!
//! Parsing happens in three levels: [`table`] walks the lines of one block,
//! [`line`] handles one language row and [`entry`] one translation inside it.

pub mod entry;
pub mod enums;
pub mod errors;
pub mod grammar;
pub mod languages;
pub mod line;
pub mod locate;
pub mod params;
pub mod report;
pub mod split;
pub mod table;

pub use entry::Entry;
pub use enums::{ErrorKind, Severity, TemplateCategory};
pub use errors::{Result, T9nError};
pub use languages::{LanguageRegistry, Languages};
pub use line::Line;
pub use locate::{find_tables, rewrite_tables};
pub use params::{ParamKey, Params};
pub use report::{CurationStats, ErrorSink, Issue, IssueLog, LogSink};
pub use table::{TableItem, TableParser, TranslationTable};
