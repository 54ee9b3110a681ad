//! Language type: the immutable record handed out by every lookup.
//!
//! A `Language` is one row of the ISO 639-3 charts, active or retired,
//! joined with its alternative names, its macrolanguage and (for retired
//! codes) its retirement details.

use crate::error::LanguageNotFound;
use crate::resolver::Resolver;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Codes referenced in a retirement remedy, e.g. "[sfb]".
static REMEDY_CODE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Whether a code denotes an individual language, a macrolanguage or a
/// special code element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Individual,
    Macrolanguage,
    Special,
}

impl Scope {
    /// Parse the one-letter code used in the SIL tables.
    pub fn from_code(code: &str) -> Option<Scope> {
        match code {
            "I" => Some(Scope::Individual),
            "M" => Some(Scope::Macrolanguage),
            "S" => Some(Scope::Special),
            _ => None,
        }
    }

    /// The one-letter code used in the SIL tables (`"I"`, `"M"` or `"S"`).
    pub fn code(&self) -> &'static str {
        match self {
            Scope::Individual => "I",
            Scope::Macrolanguage => "M",
            Scope::Special => "S",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Scope::Individual => "Individual",
            Scope::Macrolanguage => "Macrolanguage",
            Scope::Special => "Special",
        };
        f.write_str(label)
    }
}

/// Language type as classified by ISO 639-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LanguageType {
    Ancient,
    Constructed,
    Extinct,
    Historical,
    Living,
    Special,
}

impl LanguageType {
    /// Parse the one-letter code used in the SIL tables.
    pub fn from_code(code: &str) -> Option<LanguageType> {
        match code {
            "A" => Some(LanguageType::Ancient),
            "C" => Some(LanguageType::Constructed),
            "E" => Some(LanguageType::Extinct),
            "H" => Some(LanguageType::Historical),
            "L" => Some(LanguageType::Living),
            "S" => Some(LanguageType::Special),
            _ => None,
        }
    }

    /// The one-letter code used in the SIL tables (`"L"`, `"E"`, `"A"`, `"H"`, `"C"` or `"S"`).
    pub fn code(&self) -> &'static str {
        match self {
            LanguageType::Ancient => "A",
            LanguageType::Constructed => "C",
            LanguageType::Extinct => "E",
            LanguageType::Historical => "H",
            LanguageType::Living => "L",
            LanguageType::Special => "S",
        }
    }
}

impl fmt::Display for LanguageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LanguageType::Ancient => "Ancient",
            LanguageType::Constructed => "Constructed",
            LanguageType::Extinct => "Extinct",
            LanguageType::Historical => "Historical",
            LanguageType::Living => "Living",
            LanguageType::Special => "Special",
        };
        f.write_str(label)
    }
}

/// Whether an ISO 639-3 code is currently valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Active,
    Retired,
}

impl Status {
    /// Parse the one-letter code used in the SIL tables.
    pub fn from_code(code: &str) -> Option<Status> {
        match code {
            "A" => Some(Status::Active),
            "R" => Some(Status::Retired),
            _ => None,
        }
    }

    /// The one-letter code used in the SIL tables (`"A"` or `"R"`).
    pub fn code(&self) -> &'static str {
        match self {
            Status::Active => "A",
            Status::Retired => "R",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => f.write_str("Active"),
            Status::Retired => f.write_str("Retired"),
        }
    }
}

/// Why a code was retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RetireReason {
    Change,
    Duplicate,
    NonExistent,
    Split,
    Merge,
}

impl RetireReason {
    /// Parse the one-letter code used in the SIL tables.
    pub fn from_code(code: &str) -> Option<RetireReason> {
        match code {
            "C" => Some(RetireReason::Change),
            "D" => Some(RetireReason::Duplicate),
            "N" => Some(RetireReason::NonExistent),
            "S" => Some(RetireReason::Split),
            "M" => Some(RetireReason::Merge),
            _ => None,
        }
    }

    /// The one-letter code used in the SIL tables (`"C"`, `"D"`, `"N"`, `"S"` or `"M"`).
    pub fn code(&self) -> &'static str {
        match self {
            RetireReason::Change => "C",
            RetireReason::Duplicate => "D",
            RetireReason::NonExistent => "N",
            RetireReason::Split => "S",
            RetireReason::Merge => "M",
        }
    }

    /// Only these reasons name a single replacement code.
    pub fn has_change_to(&self) -> bool {
        matches!(
            self,
            RetireReason::Change | RetireReason::Duplicate | RetireReason::Merge
        )
    }
}

impl fmt::Display for RetireReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RetireReason::Change => "Change",
            RetireReason::Duplicate => "Duplicate",
            RetireReason::NonExistent => "Non-existent",
            RetireReason::Split => "Split",
            RetireReason::Merge => "Merge",
        };
        f.write_str(label)
    }
}

/// An alternative name of a language, in print and inverted form
/// (e.g. "Yue Chinese" / "Chinese, Yue").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Name {
    print: String,
    inverted: String,
}

impl Name {
    /// Create a name from its print and inverted forms.
    ///
    /// # Arguments
    /// * `print` - The name as normally written (e.g., "Yue Chinese")
    /// * `inverted` - The name with its head word first (e.g., "Chinese, Yue")
    ///
    /// # Example
    /// ```
    /// let name = iso639::Name::new("Yue Chinese", "Chinese, Yue");
    /// assert_eq!(name.print(), "Yue Chinese");
    /// assert_eq!(name.inverted(), "Chinese, Yue");
    /// ```
    pub fn new(print: impl Into<String>, inverted: impl Into<String>) -> Self {
        Self {
            print: print.into(),
            inverted: inverted.into(),
        }
    }

    /// Print form.
    pub fn print(&self) -> &str {
        &self.print
    }

    /// Inverted form, as sorted in indexes.
    pub fn inverted(&self) -> &str {
        &self.inverted
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(print={:?}, inverted={:?})", self.print, self.inverted)
    }
}

/// A language in the ISO 639-3 charts.
///
/// Values are only built by the record store and never change afterwards.
/// Equality and hashing cover every attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Language {
    pub(crate) part3: String,
    pub(crate) part2b: Option<String>,
    pub(crate) part2t: Option<String>,
    pub(crate) part1: Option<String>,
    pub(crate) scope: Scope,
    #[serde(rename = "type")]
    pub(crate) language_type: Option<LanguageType>,
    pub(crate) status: Status,
    pub(crate) name: String,
    pub(crate) comment: Option<String>,
    pub(crate) other_names: Vec<Name>,
    pub(crate) macrolanguage: Option<String>,
    pub(crate) retire_reason: Option<RetireReason>,
    pub(crate) retire_change_to: Option<String>,
    pub(crate) retire_remedy: Option<String>,
    pub(crate) retire_date: Option<NaiveDate>,
}

impl Language {
    // ==================== Global Lookups ====================

    /// Look up an active ISO 639-3 code in the bundled data.
    ///
    /// # Example
    /// ```
    /// let french = iso639::Language::from_part3("fra")?;
    /// assert_eq!(french.name(), "French");
    /// # Ok::<(), iso639::LanguageNotFound>(())
    /// ```
    pub fn from_part3(code: &str) -> Result<&'static Language, LanguageNotFound> {
        Resolver::global().from_part3(code)
    }

    /// Look up an ISO 639-2 bibliographic code in the bundled data.
    pub fn from_part2b(code: &str) -> Result<&'static Language, LanguageNotFound> {
        Resolver::global().from_part2b(code)
    }

    /// Look up an ISO 639-2 terminological code in the bundled data.
    pub fn from_part2t(code: &str) -> Result<&'static Language, LanguageNotFound> {
        Resolver::global().from_part2t(code)
    }

    /// Look up an ISO 639-1 code in the bundled data.
    pub fn from_part1(code: &str) -> Result<&'static Language, LanguageNotFound> {
        Resolver::global().from_part1(code)
    }

    /// Look up an active reference name in the bundled data.
    pub fn from_name(name: &str) -> Result<&'static Language, LanguageNotFound> {
        Resolver::global().from_name(name)
    }

    /// Look up a retired ISO 639-3 code in the bundled data.
    pub fn from_retired_part3(code: &str) -> Result<&'static Language, LanguageNotFound> {
        Resolver::global().from_retired_part3(code)
    }

    /// Match a code or a name against every namespace of the bundled data,
    /// in priority order. See [`Resolver::resolve`].
    ///
    /// # Example
    /// ```
    /// let french = iso639::Language::resolve("fre")?;
    /// assert_eq!(french.part3(), "fra");
    /// # Ok::<(), iso639::LanguageNotFound>(())
    /// ```
    pub fn resolve(input: &str) -> Result<&'static Language, LanguageNotFound> {
        Resolver::global().resolve(input)
    }

    // ==================== Attributes ====================

    /// ISO 639-3 code.
    pub fn part3(&self) -> &str {
        &self.part3
    }

    /// ISO 639-2 bibliographic code.
    pub fn part2b(&self) -> Option<&str> {
        self.part2b.as_deref()
    }

    /// ISO 639-2 terminological code.
    pub fn part2t(&self) -> Option<&str> {
        self.part2t.as_deref()
    }

    /// ISO 639-1 code.
    pub fn part1(&self) -> Option<&str> {
        self.part1.as_deref()
    }

    /// Individual language, macrolanguage or special code.
    ///
    /// Retired codes are always [`Scope::Individual`].
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Always `None` for retired codes.
    pub fn language_type(&self) -> Option<LanguageType> {
        self.language_type
    }

    /// Whether the code is active or retired.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Reference name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text remark from the codes table (e.g. a deprecated ISO 639-1
    /// code).
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Alternative names, excluding the plain reference name.
    pub fn other_names(&self) -> &[Name] {
        &self.other_names
    }

    /// ISO 639-3 code of the macrolanguage this language belongs to.
    ///
    /// Advisory only: the code is not guaranteed to resolve. Use
    /// [`Resolver::macrolanguage_of`] to look it up.
    pub fn macrolanguage(&self) -> Option<&str> {
        self.macrolanguage.as_deref()
    }

    /// Why the code was retired. `None` for active codes.
    pub fn retire_reason(&self) -> Option<RetireReason> {
        self.retire_reason
    }

    /// Replacement code for retirements by change, duplicate or merge.
    pub fn retire_change_to(&self) -> Option<&str> {
        self.retire_change_to.as_deref()
    }

    /// Instructions for retirements without a single replacement, usually
    /// naming the codes to use instead in brackets.
    ///
    /// See [`Language::retire_remedy_codes`].
    pub fn retire_remedy(&self) -> Option<&str> {
        self.retire_remedy.as_deref()
    }

    /// Date the retirement took effect.
    pub fn retire_date(&self) -> Option<NaiveDate> {
        self.retire_date
    }

    // ==================== Derived ====================

    /// Check if the code is in current use.
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Check if the code has been retired.
    pub fn is_retired(&self) -> bool {
        self.status == Status::Retired
    }

    /// Check if the code stands for a macrolanguage (e.g. "zho", "ara").
    pub fn is_macrolanguage(&self) -> bool {
        self.scope == Scope::Macrolanguage
    }

    /// Codes mentioned in brackets in the retirement remedy, in order.
    ///
    /// Split retirements have no single replacement; the remedy text lists
    /// the new codes instead, e.g. `["sfb", "vgt"]` for `bvs`.
    pub fn retire_remedy_codes(&self) -> Vec<&str> {
        let Some(remedy) = self.retire_remedy.as_deref() else {
            return Vec::new();
        };
        let regex =
            REMEDY_CODE_REGEX.get_or_init(|| Regex::new(r"\[([a-z]{3})\]").unwrap());

        regex
            .captures_iter(remedy)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
            .collect()
    }
}

fn write_opt(f: &mut fmt::Formatter<'_>, value: Option<impl fmt::Debug>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{:?}", v),
        None => f.write_str("None"),
    }
}

fn write_opt_display(
    f: &mut fmt::Formatter<'_>,
    value: Option<impl fmt::Display>,
) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{}", v),
        None => f.write_str("None"),
    }
}

impl fmt::Display for Language {
    /// Every attribute, always in the same order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Language(part3={:?}, part2b=", self.part3)?;
        write_opt(f, self.part2b())?;
        f.write_str(", part2t=")?;
        write_opt(f, self.part2t())?;
        f.write_str(", part1=")?;
        write_opt(f, self.part1())?;
        write!(f, ", scope={:?}, type=", self.scope)?;
        write_opt(f, self.language_type)?;
        write!(f, ", status={:?}, name={:?}, comment=", self.status, self.name)?;
        write_opt(f, self.comment())?;

        f.write_str(", other_names=[")?;
        for (i, name) in self.other_names.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", name)?;
        }
        f.write_str("], macrolanguage=")?;
        write_opt(f, self.macrolanguage())?;
        f.write_str(", retire_reason=")?;
        write_opt(f, self.retire_reason)?;
        f.write_str(", retire_change_to=")?;
        write_opt(f, self.retire_change_to())?;
        f.write_str(", retire_remedy=")?;
        write_opt(f, self.retire_remedy())?;
        f.write_str(", retire_date=")?;
        write_opt_display(f, self.retire_date)?;
        f.write_str(")")
    }
}
