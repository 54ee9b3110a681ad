//! ISO 639 language lookup.
//!
//! Resolves a language code or name to one canonical record from the ISO
//! 639-3 charts, which also carry the ISO 639-1 and ISO 639-2 (bibliographic
//! and terminological) codes, retired codes and alternative names.
//!
//! # Architecture
//!
//! - `config`: Where the SIL tables come from (bundled snapshot or a directory)
//! - `tables`: Reader for the four SIL tab-separated tables
//! - `store`: The immutable set of language records, in table order
//! - `index`: Exact-string lookup tables, one per identifier namespace
//! - `resolver`: Direct lookups, the priority match, weak reference lookups
//! - `language`: The `Language` record handed out to callers
//!
//! Everything is built once and never changes afterwards. The bundled data
//! is loaded lazily on first use of a `Language::from_*` function,
//! [`Language::resolve`], [`all_languages`] or [`Resolver::global`].
//!
//! # Example
//!
//! ```rust
//! use iso639::{Language, Status};
//!
//! let french = Language::resolve("fre")?;
//! assert_eq!(french.part3(), "fra");
//! assert_eq!(french.part1(), Some("fr"));
//!
//! let retired = Language::resolve("bvs")?;
//! assert_eq!(retired.status(), Status::Retired);
//! assert_eq!(retired.retire_remedy_codes(), vec!["sfb", "vgt"]);
//!
//! assert!(Language::resolve("FRA").is_err());
//! # Ok::<(), iso639::LanguageNotFound>(())
//! ```
//!
//! An explicitly loaded resolver works the same way, e.g. over a newer SIL
//! release on disk:
//!
//! ```rust,no_run
//! use iso639::{DataSource, Resolver};
//!
//! let resolver = Resolver::load(&DataSource::directory("/usr/share/iso-639-3"))?;
//! let yue = resolver.resolve("yue")?;
//! println!("{} is part of {:?}", yue.name(), yue.macrolanguage());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod language;
pub mod resolver;
pub mod store;
pub mod tables;

use chrono::NaiveDate;

pub use config::{DataSource, TableFiles};
pub use error::{DataError, LanguageNotFound};
pub use index::{Namespace, NamespaceIndex};
pub use language::{Language, LanguageType, Name, RetireReason, Scope, Status};
pub use resolver::Resolver;
pub use store::LanguageStore;
pub use tables::{Table, TableTexts, Tables};

/// Date of the bundled SIL tables: the effective date of the newest change
/// request they contain.
pub const DATA_LAST_UPDATED: NaiveDate = match NaiveDate::from_ymd_opt(2022, 1, 20) {
    Some(date) => date,
    None => panic!("invalid DATA_LAST_UPDATED"),
};

/// Every bundled language, active and retired, in table order.
pub fn all_languages() -> &'static [Language] {
    Resolver::global().all()
}
