//! Reader for the ISO 639-3 code tables published by SIL.
//!
//! SIL distributes four tab-separated tables: the code set itself, the
//! alternative name index, the macrolanguage mappings and the retired codes.
//! Each table starts with a header row; columns are located by name.

use crate::error::DataError;
use crate::language::{LanguageType, RetireReason, Scope, Status};
use chrono::NaiveDate;
use std::fmt;
use tracing::debug;

/// One of the four SIL tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Codes,
    NameIndex,
    Macrolanguages,
    Retirements,
}

impl Table {
    /// Every table, in the order they are read.
    pub const ALL: [Table; 4] = [
        Table::Codes,
        Table::NameIndex,
        Table::Macrolanguages,
        Table::Retirements,
    ];

    /// File name of the table as shipped with this crate.
    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Codes => "iso-639-3.tab",
            Table::NameIndex => "iso-639-3_Name_Index.tab",
            Table::Macrolanguages => "iso-639-3-macrolanguages.tab",
            Table::Retirements => "iso-639-3_Retirements.tab",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Table::Codes => "codes",
            Table::NameIndex => "name index",
            Table::Macrolanguages => "macrolanguages",
            Table::Retirements => "retirements",
        };
        f.write_str(label)
    }
}

/// A row of the code set table (`iso-639-3.tab`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRow {
    pub id: String,
    pub part2b: Option<String>,
    pub part2t: Option<String>,
    pub part1: Option<String>,
    pub scope: Scope,
    pub language_type: Option<LanguageType>,
    pub ref_name: String,
    pub comment: Option<String>,
}

/// A row of the name index (`iso-639-3_Name_Index.tab`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIndexRow {
    pub id: String,
    pub print_name: String,
    pub inverted_name: String,
}

/// A row of the macrolanguage mappings (`iso-639-3-macrolanguages.tab`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacrolanguageRow {
    pub macrolanguage_id: String,
    pub individual_id: String,
    pub individual_status: Status,
}

/// A row of the retired codes (`iso-639-3_Retirements.tab`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetirementRow {
    pub id: String,
    pub ref_name: String,
    pub reason: RetireReason,
    pub change_to: Option<String>,
    pub remedy: Option<String>,
    pub effective: NaiveDate,
}

/// Raw text of the four tables.
#[derive(Debug, Clone, Copy)]
pub struct TableTexts<'a> {
    pub codes: &'a str,
    pub name_index: &'a str,
    pub macrolanguages: &'a str,
    pub retirements: &'a str,
}

/// The four tables, parsed and typed, rows in file order.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub codes: Vec<CodeRow>,
    pub name_index: Vec<NameIndexRow>,
    pub macrolanguages: Vec<MacrolanguageRow>,
    pub retirements: Vec<RetirementRow>,
}

impl Tables {
    /// Parse all four tables. Any malformed table fails the whole parse.
    pub fn parse(texts: TableTexts<'_>) -> Result<Tables, DataError> {
        let tables = Tables {
            codes: parse_codes(texts.codes)?,
            name_index: parse_name_index(texts.name_index)?,
            macrolanguages: parse_macrolanguages(texts.macrolanguages)?,
            retirements: parse_retirements(texts.retirements)?,
        };

        debug!(
            codes = tables.codes.len(),
            name_index = tables.name_index.len(),
            macrolanguages = tables.macrolanguages.len(),
            retirements = tables.retirements.len(),
            "Parsed ISO 639-3 tables"
        );

        Ok(tables)
    }
}

// ==================== TSV Reading ====================

/// A header-addressed view over one tab-separated table.
struct Tsv<'a> {
    table: Table,
    header: Vec<&'a str>,
    /// (1-based line number, fields)
    rows: Vec<(usize, Vec<&'a str>)>,
}

impl<'a> Tsv<'a> {
    fn read(table: Table, text: &'a str) -> Result<Tsv<'a>, DataError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.is_empty());

        let Some((_, header)) = lines.next() else {
            return Err(DataError::Malformed {
                table,
                line: 1,
                message: "table is empty (no header row)".to_string(),
            });
        };

        Ok(Tsv {
            table,
            header: header.split('\t').map(str::trim).collect(),
            rows: lines
                .map(|(n, line)| (n, line.split('\t').collect()))
                .collect(),
        })
    }

    /// Header names match ASCII case-insensitively: SIL publishes `Part2B`,
    /// older exports spell it `Part2b`.
    fn column(&self, name: &'static str) -> Result<usize, DataError> {
        self.header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(DataError::MissingColumn {
                table: self.table,
                column: name,
            })
    }

    fn malformed(&self, line: usize, message: String) -> DataError {
        DataError::Malformed {
            table: self.table,
            line,
            message,
        }
    }
}

/// A field, with missing trailing fields read as empty.
fn field<'a>(fields: &[&'a str], column: usize) -> &'a str {
    fields.get(column).copied().unwrap_or("")
}

fn optional(fields: &[&str], column: usize) -> Option<String> {
    let value = field(fields, column);
    (!value.is_empty()).then(|| value.to_string())
}

fn required(
    tsv: &Tsv<'_>,
    line: usize,
    fields: &[&str],
    column: usize,
) -> Result<String, DataError> {
    let value = field(fields, column);
    if value.is_empty() {
        return Err(tsv.malformed(line, format!("empty {} field", tsv.header[column])));
    }
    Ok(value.to_string())
}

fn coded<T>(
    tsv: &Tsv<'_>,
    line: usize,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, DataError> {
    parse(value).ok_or_else(|| tsv.malformed(line, format!("unknown code {:?}", value)))
}

// ==================== Table Parsers ====================

fn parse_codes(text: &str) -> Result<Vec<CodeRow>, DataError> {
    let tsv = Tsv::read(Table::Codes, text)?;
    let id = tsv.column("Id")?;
    let part2b = tsv.column("Part2B")?;
    let part2t = tsv.column("Part2T")?;
    let part1 = tsv.column("Part1")?;
    let scope = tsv.column("Scope")?;
    let language_type = tsv.column("Language_Type")?;
    let ref_name = tsv.column("Ref_Name")?;
    let comment = tsv.column("Comment")?;

    tsv.rows
        .iter()
        .map(|(line, fields)| -> Result<CodeRow, DataError> {
            let language_type = match field(fields, language_type) {
                "" => None,
                code => Some(coded(&tsv, *line, code, LanguageType::from_code)?),
            };
            Ok(CodeRow {
                id: required(&tsv, *line, fields, id)?,
                part2b: optional(fields, part2b),
                part2t: optional(fields, part2t),
                part1: optional(fields, part1),
                scope: coded(&tsv, *line, field(fields, scope), Scope::from_code)?,
                language_type,
                ref_name: required(&tsv, *line, fields, ref_name)?,
                comment: optional(fields, comment),
            })
        })
        .collect()
}

fn parse_name_index(text: &str) -> Result<Vec<NameIndexRow>, DataError> {
    let tsv = Tsv::read(Table::NameIndex, text)?;
    let id = tsv.column("Id")?;
    let print_name = tsv.column("Print_Name")?;
    let inverted_name = tsv.column("Inverted_Name")?;

    tsv.rows
        .iter()
        .map(|(line, fields)| -> Result<NameIndexRow, DataError> {
            Ok(NameIndexRow {
                id: required(&tsv, *line, fields, id)?,
                print_name: required(&tsv, *line, fields, print_name)?,
                inverted_name: required(&tsv, *line, fields, inverted_name)?,
            })
        })
        .collect()
}

fn parse_macrolanguages(text: &str) -> Result<Vec<MacrolanguageRow>, DataError> {
    let tsv = Tsv::read(Table::Macrolanguages, text)?;
    let macrolanguage_id = tsv.column("M_Id")?;
    let individual_id = tsv.column("I_Id")?;
    let individual_status = tsv.column("I_Status")?;

    tsv.rows
        .iter()
        .map(|(line, fields)| -> Result<MacrolanguageRow, DataError> {
            Ok(MacrolanguageRow {
                macrolanguage_id: required(&tsv, *line, fields, macrolanguage_id)?,
                individual_id: required(&tsv, *line, fields, individual_id)?,
                individual_status: coded(
                    &tsv,
                    *line,
                    field(fields, individual_status),
                    Status::from_code,
                )?,
            })
        })
        .collect()
}

fn parse_retirements(text: &str) -> Result<Vec<RetirementRow>, DataError> {
    let tsv = Tsv::read(Table::Retirements, text)?;
    let id = tsv.column("Id")?;
    let ref_name = tsv.column("Ref_Name")?;
    let reason = tsv.column("Ret_Reason")?;
    let change_to = tsv.column("Change_To")?;
    let remedy = tsv.column("Ret_Remedy")?;
    let effective = tsv.column("Effective")?;

    tsv.rows
        .iter()
        .map(|(line, fields)| -> Result<RetirementRow, DataError> {
            let date = field(fields, effective);
            let effective = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                tsv.malformed(*line, format!("invalid Effective date {:?}: {}", date, e))
            })?;
            Ok(RetirementRow {
                id: required(&tsv, *line, fields, id)?,
                ref_name: required(&tsv, *line, fields, ref_name)?,
                reason: coded(&tsv, *line, field(fields, reason), RetireReason::from_code)?,
                change_to: optional(fields, change_to),
                remedy: optional(fields, remedy),
                effective,
            })
        })
        .collect()
}
