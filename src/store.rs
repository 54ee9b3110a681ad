//! Record store: every language record, in table order, built once.

use crate::config::DataSource;
use crate::error::DataError;
use crate::index::Namespace;
use crate::language::{Language, Name, Scope, Status};
use crate::tables::{NameIndexRow, Tables};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// The immutable collection of language records.
///
/// Active codes come first, in codes table order, followed by retired codes
/// in retirements table order.
#[derive(Debug, Clone)]
pub struct LanguageStore {
    records: Vec<Language>,
    by_part3: HashMap<String, usize>,
}

impl LanguageStore {
    /// Read the tables from `source` and build the store.
    pub fn load(source: &DataSource) -> Result<LanguageStore, DataError> {
        Self::from_tables(source.read_tables()?)
    }

    /// Build the store from parsed tables.
    ///
    /// Fails if two records end up with the same ISO 639-3 code.
    pub fn from_tables(tables: Tables) -> Result<LanguageStore, DataError> {
        let mut names_by_id: HashMap<&str, Vec<&NameIndexRow>> = HashMap::new();
        for row in &tables.name_index {
            names_by_id.entry(row.id.as_str()).or_default().push(row);
        }

        let mut macrolanguage_by_id: HashMap<&str, &str> = HashMap::new();
        for row in &tables.macrolanguages {
            macrolanguage_by_id
                .entry(row.individual_id.as_str())
                .or_insert(row.macrolanguage_id.as_str());
        }

        let other_names = |part3: &str, name: &str| -> Vec<Name> {
            names_by_id
                .get(part3)
                .into_iter()
                .flatten()
                .filter(|row| !(row.print_name == name && row.inverted_name == name))
                .map(|row| Name::new(row.print_name.as_str(), row.inverted_name.as_str()))
                .collect()
        };
        let macrolanguage = |part3: &str| -> Option<String> {
            macrolanguage_by_id.get(part3).map(|m| m.to_string())
        };

        let mut store = LanguageStore {
            records: Vec::with_capacity(tables.codes.len() + tables.retirements.len()),
            by_part3: HashMap::new(),
        };

        for row in &tables.codes {
            store.push(
                Namespace::Part3,
                Language {
                    part3: row.id.clone(),
                    part2b: row.part2b.clone(),
                    part2t: row.part2t.clone(),
                    part1: row.part1.clone(),
                    scope: row.scope,
                    language_type: row.language_type,
                    status: Status::Active,
                    name: row.ref_name.clone(),
                    comment: row.comment.clone(),
                    other_names: other_names(&row.id, &row.ref_name),
                    macrolanguage: macrolanguage(&row.id),
                    retire_reason: None,
                    retire_change_to: None,
                    retire_remedy: None,
                    retire_date: None,
                },
            )?;
        }

        let active: HashSet<&str> = tables.codes.iter().map(|row| row.id.as_str()).collect();

        for row in &tables.retirements {
            if active.contains(row.id.as_str()) {
                warn!(
                    "Retired code {:?} is also an active code; keeping the active record",
                    row.id
                );
                continue;
            }

            let change_to = match &row.change_to {
                Some(code) if !row.reason.has_change_to() => {
                    warn!(
                        "Ignoring Change_To {:?} on {:?}: retirement reason {} has no single replacement",
                        code, row.id, row.reason
                    );
                    None
                }
                other => other.clone(),
            };

            store.push(
                Namespace::RetiredPart3,
                Language {
                    part3: row.id.clone(),
                    part2b: None,
                    part2t: None,
                    part1: None,
                    scope: Scope::Individual,
                    language_type: None,
                    status: Status::Retired,
                    name: row.ref_name.clone(),
                    comment: None,
                    other_names: other_names(&row.id, &row.ref_name),
                    macrolanguage: macrolanguage(&row.id),
                    retire_reason: Some(row.reason),
                    retire_change_to: change_to,
                    retire_remedy: row.remedy.clone(),
                    retire_date: Some(row.effective),
                },
            )?;
        }

        info!(
            active = store.records.iter().filter(|l| l.is_active()).count(),
            retired = store.records.iter().filter(|l| l.is_retired()).count(),
            "Built language store"
        );

        Ok(store)
    }

    fn push(&mut self, namespace: Namespace, language: Language) -> Result<(), DataError> {
        if self.by_part3.contains_key(&language.part3) {
            return Err(DataError::DuplicateKey {
                namespace,
                key: language.part3,
            });
        }
        self.by_part3
            .insert(language.part3.clone(), self.records.len());
        self.records.push(language);
        Ok(())
    }

    /// Every record, active and retired, in insertion order.
    pub fn all(&self) -> &[Language] {
        &self.records
    }

    /// Iterate over every record in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Language> {
        self.records.iter()
    }

    /// Number of records, active and retired.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A record by ISO 639-3 code, active or retired.
    pub fn get(&self, part3: &str) -> Option<&Language> {
        self.position(part3).map(|i| &self.records[i])
    }

    /// Insertion index of a record by ISO 639-3 code.
    pub fn position(&self, part3: &str) -> Option<usize> {
        self.by_part3.get(part3).copied()
    }

    pub(crate) fn at(&self, position: usize) -> &Language {
        &self.records[position]
    }
}

impl<'a> IntoIterator for &'a LanguageStore {
    type Item = &'a Language;
    type IntoIter = std::slice::Iter<'a, Language>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
