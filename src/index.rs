//! Namespace indices: exact-string lookup tables over the record store.
//!
//! Each ISO 639 identifier scheme, and each kind of name, is its own key
//! space. Keys are stored verbatim: no case folding, trimming or other
//! normalization.

use crate::error::DataError;
use crate::language::Language;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// One identifier namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// ISO 639-3 codes of active languages.
    Part3,
    /// ISO 639-2 bibliographic codes.
    Part2b,
    /// ISO 639-2 terminological codes.
    Part2t,
    /// ISO 639-1 codes.
    Part1,
    /// ISO 639-3 codes that have been retired.
    RetiredPart3,
    /// Reference names of active languages.
    Name,
    /// Alternative names, print form.
    PrintName,
    /// Alternative names, inverted form.
    InvertedName,
}

impl Namespace {
    /// The order in which [`crate::Resolver::resolve`] tries namespaces.
    ///
    /// Codes before names; among codes, ISO 639-3 first, then the older code
    /// sets, then retired codes.
    pub const MATCH_ORDER: [Namespace; 8] = [
        Namespace::Part3,
        Namespace::Part2b,
        Namespace::Part2t,
        Namespace::Part1,
        Namespace::RetiredPart3,
        Namespace::Name,
        Namespace::PrintName,
        Namespace::InvertedName,
    ];

    /// Whether several records may share a key in this namespace.
    pub fn is_shared(&self) -> bool {
        matches!(self, Namespace::PrintName | Namespace::InvertedName)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Namespace::Part3 => "part3",
            Namespace::Part2b => "part2b",
            Namespace::Part2t => "part2t",
            Namespace::Part1 => "part1",
            Namespace::RetiredPart3 => "retired part3",
            Namespace::Name => "name",
            Namespace::PrintName => "print name",
            Namespace::InvertedName => "inverted name",
        };
        f.write_str(label)
    }
}

/// Positions of records (in store order) keyed by namespace and key.
///
/// Every candidate list is sorted by insertion order and never empty, so the
/// first candidate is always the earliest record.
#[derive(Debug, Clone, Default)]
pub struct NamespaceIndex {
    part3: HashMap<String, usize>,
    part2b: HashMap<String, usize>,
    part2t: HashMap<String, usize>,
    part1: HashMap<String, usize>,
    retired_part3: HashMap<String, usize>,
    name: HashMap<String, usize>,
    print_name: HashMap<String, Vec<usize>>,
    inverted_name: HashMap<String, Vec<usize>>,
}

impl NamespaceIndex {
    /// Index `records` in one pass.
    ///
    /// A key appearing twice in any namespace other than the alternative
    /// names is a data-integrity violation.
    pub fn build(records: &[Language]) -> Result<NamespaceIndex, DataError> {
        let mut index = NamespaceIndex::default();

        for (position, language) in records.iter().enumerate() {
            if language.is_active() {
                index.insert_unique(Namespace::Part3, &language.part3, position)?;
                index.insert_unique(Namespace::Name, &language.name, position)?;
            } else {
                index.insert_unique(Namespace::RetiredPart3, &language.part3, position)?;
            }

            if let Some(code) = &language.part2b {
                index.insert_unique(Namespace::Part2b, code, position)?;
            }
            if let Some(code) = &language.part2t {
                index.insert_unique(Namespace::Part2t, code, position)?;
            }
            if let Some(code) = &language.part1 {
                index.insert_unique(Namespace::Part1, code, position)?;
            }

            for other in &language.other_names {
                index.insert_shared(Namespace::PrintName, other.print(), position);
                index.insert_shared(Namespace::InvertedName, other.inverted(), position);
            }
        }

        debug!(
            part3 = index.part3.len(),
            part2b = index.part2b.len(),
            part2t = index.part2t.len(),
            part1 = index.part1.len(),
            retired_part3 = index.retired_part3.len(),
            name = index.name.len(),
            print_name = index.print_name.len(),
            inverted_name = index.inverted_name.len(),
            "Built namespace indices"
        );

        Ok(index)
    }

    fn unique_map(&self, namespace: Namespace) -> Option<&HashMap<String, usize>> {
        match namespace {
            Namespace::Part3 => Some(&self.part3),
            Namespace::Part2b => Some(&self.part2b),
            Namespace::Part2t => Some(&self.part2t),
            Namespace::Part1 => Some(&self.part1),
            Namespace::RetiredPart3 => Some(&self.retired_part3),
            Namespace::Name => Some(&self.name),
            Namespace::PrintName | Namespace::InvertedName => None,
        }
    }

    fn shared_map(&self, namespace: Namespace) -> Option<&HashMap<String, Vec<usize>>> {
        match namespace {
            Namespace::PrintName => Some(&self.print_name),
            Namespace::InvertedName => Some(&self.inverted_name),
            _ => None,
        }
    }

    fn insert_unique(
        &mut self,
        namespace: Namespace,
        key: &str,
        position: usize,
    ) -> Result<(), DataError> {
        let map = match namespace {
            Namespace::Part3 => &mut self.part3,
            Namespace::Part2b => &mut self.part2b,
            Namespace::Part2t => &mut self.part2t,
            Namespace::Part1 => &mut self.part1,
            Namespace::RetiredPart3 => &mut self.retired_part3,
            Namespace::Name => &mut self.name,
            Namespace::PrintName | Namespace::InvertedName => {
                self.insert_shared(namespace, key, position);
                return Ok(());
            }
        };

        if map.contains_key(key) {
            return Err(DataError::DuplicateKey {
                namespace,
                key: key.to_string(),
            });
        }
        map.insert(key.to_string(), position);
        Ok(())
    }

    fn insert_shared(&mut self, namespace: Namespace, key: &str, position: usize) {
        let map = match namespace {
            Namespace::InvertedName => &mut self.inverted_name,
            _ => &mut self.print_name,
        };
        let positions = map.entry(key.to_string()).or_default();
        // Positions arrive in ascending order; a record repeating a name is
        // stored once.
        if positions.last() != Some(&position) {
            positions.push(position);
        }
    }

    /// The earliest record for `key` in `namespace`.
    pub fn get(&self, namespace: Namespace, key: &str) -> Option<usize> {
        self.candidates(namespace, key).first().copied()
    }

    /// Every record for `key` in `namespace`, in insertion order.
    pub fn candidates(&self, namespace: Namespace, key: &str) -> &[usize] {
        if let Some(map) = self.unique_map(namespace) {
            return map.get(key).map(std::slice::from_ref).unwrap_or(&[]);
        }
        self.shared_map(namespace)
            .and_then(|map| map.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct keys in a namespace.
    ///
    /// # Arguments
    /// * `namespace` - The namespace to count
    ///
    /// # Returns
    /// The key count. For the alternative-name namespaces this counts names,
    /// not the records sharing them.
    pub fn len(&self, namespace: Namespace) -> usize {
        match self.unique_map(namespace) {
            Some(map) => map.len(),
            None => self.shared_map(namespace).map_or(0, HashMap::len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{Name, Scope, Status};

    fn active(part3: &str, part2b: Option<&str>, part1: Option<&str>, name: &str) -> Language {
        Language {
            part3: part3.to_string(),
            part2b: part2b.map(str::to_string),
            part2t: part2b.map(|_| part3.to_string()),
            part1: part1.map(str::to_string),
            scope: Scope::Individual,
            language_type: None,
            status: Status::Active,
            name: name.to_string(),
            comment: None,
            other_names: Vec::new(),
            macrolanguage: None,
            retire_reason: None,
            retire_change_to: None,
            retire_remedy: None,
            retire_date: None,
        }
    }

    fn retired(part3: &str, name: &str) -> Language {
        Language {
            status: Status::Retired,
            ..active(part3, None, None, name)
        }
    }

    fn with_names(mut language: Language, names: &[(&str, &str)]) -> Language {
        language.other_names = names.iter().map(|(p, i)| Name::new(*p, *i)).collect();
        language
    }

    // ==================== Namespace Tests ====================

    #[test]
    fn test_match_order() {
        assert_eq!(Namespace::MATCH_ORDER[0], Namespace::Part3);
        assert_eq!(Namespace::MATCH_ORDER[4], Namespace::RetiredPart3);
        assert_eq!(Namespace::MATCH_ORDER[7], Namespace::InvertedName);
        assert!(Namespace::PrintName.is_shared());
        assert!(!Namespace::Name.is_shared());
    }

    #[test]
    fn test_namespace_display() {
        assert_eq!(Namespace::RetiredPart3.to_string(), "retired part3");
        assert_eq!(Namespace::Part2b.to_string(), "part2b");
    }

    // ==================== Build Tests ====================

    #[test]
    fn test_build_code_namespaces() {
        let records = vec![
            active("fra", Some("fre"), Some("fr"), "French"),
            active("yue", None, None, "Yue Chinese"),
            retired("mol", "Moldavian"),
        ];
        let index = NamespaceIndex::build(&records).unwrap();

        assert_eq!(index.get(Namespace::Part3, "fra"), Some(0));
        assert_eq!(index.get(Namespace::Part2b, "fre"), Some(0));
        assert_eq!(index.get(Namespace::Part2t, "fra"), Some(0));
        assert_eq!(index.get(Namespace::Part1, "fr"), Some(0));
        assert_eq!(index.get(Namespace::Part3, "yue"), Some(1));
        assert_eq!(index.get(Namespace::RetiredPart3, "mol"), Some(2));
        assert_eq!(index.get(Namespace::Part3, "mol"), None);
        assert_eq!(index.get(Namespace::Name, "French"), Some(0));
        assert_eq!(index.len(Namespace::Part3), 2);
        assert_eq!(index.len(Namespace::Part1), 1);
    }

    #[test]
    fn test_retired_names_not_indexed() {
        let records = vec![retired("mol", "Moldavian")];
        let index = NamespaceIndex::build(&records).unwrap();
        assert_eq!(index.get(Namespace::Name, "Moldavian"), None);
        assert_eq!(index.len(Namespace::Name), 0);
    }

    #[test]
    fn test_keys_are_exact() {
        let records = vec![active("fra", Some("fre"), Some("fr"), "French")];
        let index = NamespaceIndex::build(&records).unwrap();
        assert_eq!(index.get(Namespace::Part3, "FRA"), None);
        assert_eq!(index.get(Namespace::Part3, " fra"), None);
        assert_eq!(index.get(Namespace::Name, "french"), None);
        assert!(index.candidates(Namespace::Part1, "FR").is_empty());
    }

    #[test]
    fn test_shared_names_keep_insertion_order() {
        let records = vec![
            with_names(active("aaa", None, None, "Alpha"), &[("Common", "Common, The")]),
            with_names(active("bbb", None, None, "Beta"), &[("Common", "Common, The")]),
            with_names(active("ccc", None, None, "Gamma"), &[("Other", "Common, The")]),
        ];
        let index = NamespaceIndex::build(&records).unwrap();

        assert_eq!(index.candidates(Namespace::PrintName, "Common"), &[0, 1]);
        assert_eq!(index.get(Namespace::PrintName, "Common"), Some(0));
        assert_eq!(index.candidates(Namespace::InvertedName, "Common, The"), &[0, 1, 2]);
        assert_eq!(index.len(Namespace::PrintName), 2);
    }

    #[test]
    fn test_repeated_name_within_record_stored_once() {
        let records = vec![with_names(
            active("aaa", None, None, "Alpha"),
            &[("Same", "Same"), ("Same", "Same, Inverted")],
        )];
        let index = NamespaceIndex::build(&records).unwrap();
        assert_eq!(index.candidates(Namespace::PrintName, "Same"), &[0]);
    }

    // ==================== Integrity Tests ====================

    #[test]
    fn test_duplicate_part1_is_rejected() {
        let records = vec![
            active("fra", Some("fre"), Some("fr"), "French"),
            active("frx", None, Some("fr"), "Not French"),
        ];
        match NamespaceIndex::build(&records).unwrap_err() {
            DataError::DuplicateKey { namespace, key } => {
                assert_eq!(namespace, Namespace::Part1);
                assert_eq!(key, "fr");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_active_name_is_rejected() {
        let records = vec![
            active("aaa", None, None, "Same"),
            active("bbb", None, None, "Same"),
        ];
        let err = NamespaceIndex::build(&records).unwrap_err();
        assert!(matches!(
            err,
            DataError::DuplicateKey {
                namespace: Namespace::Name,
                ..
            }
        ));
    }

    #[test]
    fn test_retired_and_active_names_may_coincide() {
        let records = vec![
            active("ron", None, None, "Romanian"),
            retired("rox", "Romanian"),
        ];
        assert!(NamespaceIndex::build(&records).is_ok());
    }
}
