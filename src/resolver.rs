//! Resolver: turns a code or a name into exactly one language.
//!
//! The resolver owns a [`LanguageStore`] and the [`NamespaceIndex`] built
//! from it. Both are immutable, so one resolver can be shared freely across
//! threads. A process-wide resolver over the bundled data is available via
//! [`Resolver::global`].

use crate::config::DataSource;
use crate::error::{DataError, LanguageNotFound};
use crate::index::{Namespace, NamespaceIndex};
use crate::language::Language;
use crate::store::LanguageStore;
use crate::tables::Tables;
use std::sync::OnceLock;
use tracing::{info, trace};

/// Global resolver over the bundled data (initialized lazily, at most once).
static GLOBAL: OnceLock<Result<Resolver, DataError>> = OnceLock::new();

/// Lookups over one immutable set of language records.
#[derive(Debug, Clone)]
pub struct Resolver {
    store: LanguageStore,
    index: NamespaceIndex,
}

impl Resolver {
    /// Index `store` and wrap it in a resolver.
    pub fn new(store: LanguageStore) -> Result<Resolver, DataError> {
        let index = NamespaceIndex::build(store.all())?;
        Ok(Resolver { store, index })
    }

    /// Build a resolver from already parsed tables.
    ///
    /// # Returns
    /// * `Ok(Resolver)` over every record in `tables`
    /// * `Err(DataError::DuplicateKey)` if a code or reference name repeats
    pub fn from_tables(tables: Tables) -> Result<Resolver, DataError> {
        Self::new(LanguageStore::from_tables(tables)?)
    }

    /// Read, parse and index the tables from `source`.
    pub fn load(source: &DataSource) -> Result<Resolver, DataError> {
        Self::new(LanguageStore::load(source)?)
    }

    /// The process-wide resolver over the bundled data, or the error that
    /// prevented building it.
    ///
    /// The first call builds it; concurrent first calls wait for that single
    /// build. A failure is kept and returned to every later caller.
    pub fn try_global() -> Result<&'static Resolver, &'static DataError> {
        GLOBAL
            .get_or_init(|| {
                let resolver = Resolver::load(&DataSource::Embedded)?;
                info!(
                    languages = resolver.store.len(),
                    "Initialized global language resolver"
                );
                Ok(resolver)
            })
            .as_ref()
    }

    /// The process-wide resolver over the bundled data.
    ///
    /// # Panics
    /// Panics if the bundled data cannot be loaded. The data is compiled into
    /// the crate, so this only happens with a corrupt build.
    pub fn global() -> &'static Resolver {
        match Self::try_global() {
            Ok(resolver) => resolver,
            Err(e) => panic!("bundled ISO 639 data failed to load: {e}"),
        }
    }

    /// The records this resolver answers from.
    pub fn store(&self) -> &LanguageStore {
        &self.store
    }

    /// The per-namespace lookup tables.
    pub fn index(&self) -> &NamespaceIndex {
        &self.index
    }

    /// Every record, active and retired, in insertion order.
    pub fn all(&self) -> &[Language] {
        self.store.all()
    }

    // ==================== Direct Lookups ====================

    /// Look up `input` in exactly one namespace.
    ///
    /// For the alternative name namespaces, where several languages may share
    /// a name, the earliest language in store order wins.
    pub fn lookup(
        &self,
        namespace: Namespace,
        input: &str,
    ) -> Result<&Language, LanguageNotFound> {
        match self.index.get(namespace, input) {
            Some(position) => {
                let language = self.store.at(position);
                trace!(%namespace, input, part3 = language.part3(), "Lookup hit");
                Ok(language)
            }
            None => {
                trace!(%namespace, input, "Lookup miss");
                Err(LanguageNotFound::new(input))
            }
        }
    }

    /// Active ISO 639-3 code.
    pub fn from_part3(&self, code: &str) -> Result<&Language, LanguageNotFound> {
        self.lookup(Namespace::Part3, code)
    }

    /// ISO 639-2 bibliographic code.
    pub fn from_part2b(&self, code: &str) -> Result<&Language, LanguageNotFound> {
        self.lookup(Namespace::Part2b, code)
    }

    /// ISO 639-2 terminological code.
    pub fn from_part2t(&self, code: &str) -> Result<&Language, LanguageNotFound> {
        self.lookup(Namespace::Part2t, code)
    }

    /// ISO 639-1 code.
    pub fn from_part1(&self, code: &str) -> Result<&Language, LanguageNotFound> {
        self.lookup(Namespace::Part1, code)
    }

    /// Reference name of an active language. Alternative names and retired
    /// languages are not searched.
    pub fn from_name(&self, name: &str) -> Result<&Language, LanguageNotFound> {
        self.lookup(Namespace::Name, name)
    }

    /// Retired ISO 639-3 code.
    pub fn from_retired_part3(&self, code: &str) -> Result<&Language, LanguageNotFound> {
        self.lookup(Namespace::RetiredPart3, code)
    }

    // ==================== Priority Match ====================

    /// Match a code or a name, probing namespaces in
    /// [`Namespace::MATCH_ORDER`] and stopping at the first hit:
    ///
    /// 1. ISO 639-3 codes (active)
    /// 2. ISO 639-2 bibliographic codes
    /// 3. ISO 639-2 terminological codes
    /// 4. ISO 639-1 codes
    /// 5. ISO 639-3 codes (retired)
    /// 6. Reference names (active)
    /// 7. Alternative names, print form
    /// 8. Alternative names, inverted form
    ///
    /// Matching is exact and case-sensitive.
    pub fn resolve(&self, input: &str) -> Result<&Language, LanguageNotFound> {
        self.resolve_with_namespace(input).map(|(_, language)| language)
    }

    /// Like [`resolve`](Self::resolve), also reporting which namespace matched.
    pub fn resolve_with_namespace(
        &self,
        input: &str,
    ) -> Result<(Namespace, &Language), LanguageNotFound> {
        Namespace::MATCH_ORDER
            .iter()
            .find_map(|&namespace| {
                self.index
                    .get(namespace, input)
                    .map(|position| (namespace, self.store.at(position)))
            })
            .inspect(|(namespace, language)| {
                trace!(%namespace, input, part3 = language.part3(), "Matched");
            })
            .ok_or_else(|| {
                trace!(input, "No namespace matched");
                LanguageNotFound::new(input)
            })
    }

    // ==================== Weak References ====================

    /// Any record, active or retired, by ISO 639-3 code.
    pub fn language(&self, part3: &str) -> Option<&Language> {
        self.store.get(part3)
    }

    /// The macrolanguage `language` belongs to, if it is in this data set.
    pub fn macrolanguage_of(&self, language: &Language) -> Option<&Language> {
        language.macrolanguage().and_then(|code| self.language(code))
    }

    /// The replacement of a retired code, if it names one that is in this
    /// data set.
    pub fn change_to_of(&self, language: &Language) -> Option<&Language> {
        language
            .retire_change_to()
            .and_then(|code| self.language(code))
    }

    /// Languages (active and retired) whose macrolanguage is `language`, in
    /// store order.
    pub fn members_of(&self, language: &Language) -> Vec<&Language> {
        self.store
            .iter()
            .filter(|member| member.macrolanguage() == Some(language.part3()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TableTexts;

    const CODES: &str = "Id\tPart2B\tPart2T\tPart1\tScope\tLanguage_Type\tRef_Name\tComment\n\
                         fra\tfre\tfra\tfr\tI\tL\tFrench\t\n\
                         zho\tchi\tzho\tzh\tM\tL\tChinese\t\n\
                         yue\t\t\t\tI\tL\tYue Chinese\t\n\
                         aaa\t\t\t\tI\tL\tCode Zho Lookalike\t\n\
                         chx\t\t\t\tI\tL\tchi\t\n\
                         frb\t\t\t\tI\tL\tFirst Sharer\t\n\
                         frc\t\t\t\tI\tL\tSecond Sharer\t\n";

    const NAMES: &str = "Id\tPrint_Name\tInverted_Name\n\
                         yue\tYue Chinese\tChinese, Yue\n\
                         yue\tCantonese\tCantonese\n\
                         frb\tShared\tShared, First\n\
                         frc\tShared\tShared, Second\n\
                         frc\tOnly Inverted\tChinese\n";

    const MACROS: &str = "M_Id\tI_Id\tI_Status\n\
                          zho\tyue\tA\n\
                          zho\tgan\tR\n\
                          zzz\tfrb\tA\n";

    const RETIREMENTS: &str = "Id\tRef_Name\tRet_Reason\tChange_To\tRet_Remedy\tEffective\n\
                               gan\tGan (retired)\tM\tzho\t\t2020-01-01\n\
                               frx\tFrench\tD\tfrq\t\t2011-05-05\n";

    fn resolver() -> Resolver {
        let tables = Tables::parse(TableTexts {
            codes: CODES,
            name_index: NAMES,
            macrolanguages: MACROS,
            retirements: RETIREMENTS,
        })
        .expect("tables should parse");
        Resolver::from_tables(tables).expect("resolver should build")
    }

    // ==================== Direct Lookup Tests ====================

    #[test]
    fn test_direct_lookups() {
        let r = resolver();
        assert_eq!(r.from_part3("fra").unwrap().name(), "French");
        assert_eq!(r.from_part2b("fre").unwrap().part3(), "fra");
        assert_eq!(r.from_part2t("fra").unwrap().part3(), "fra");
        assert_eq!(r.from_part1("fr").unwrap().part3(), "fra");
        assert_eq!(r.from_name("French").unwrap().part3(), "fra");
        assert_eq!(r.from_retired_part3("gan").unwrap().name(), "Gan (retired)");
    }

    #[test]
    fn test_direct_lookups_stay_in_their_namespace() {
        let r = resolver();
        assert!(r.from_part3("fre").is_err());
        assert!(r.from_part3("gan").is_err());
        assert!(r.from_part1("fra").is_err());
        assert!(r.from_retired_part3("fra").is_err());
        assert!(r.from_name("Cantonese").is_err());
        assert!(r.from_name("Gan (retired)").is_err());
    }

    #[test]
    fn test_not_found_carries_input() {
        let r = resolver();
        let err = r.from_name("unknown language").unwrap_err();
        assert_eq!(err.input(), "unknown language");
        assert_eq!(err, LanguageNotFound::new("unknown language"));
    }

    // ==================== Priority Match Tests ====================

    #[test]
    fn test_resolve_each_namespace() {
        let r = resolver();
        let cases = [
            ("fra", Namespace::Part3, "fra"),
            ("fre", Namespace::Part2b, "fra"),
            ("fr", Namespace::Part1, "fra"),
            ("gan", Namespace::RetiredPart3, "gan"),
            ("French", Namespace::Name, "fra"),
            ("Cantonese", Namespace::PrintName, "yue"),
            ("Chinese, Yue", Namespace::InvertedName, "yue"),
        ];
        for (input, namespace, part3) in cases {
            let (matched, language) = r.resolve_with_namespace(input).unwrap();
            assert_eq!(matched, namespace, "namespace for {input:?}");
            assert_eq!(language.part3(), part3, "language for {input:?}");
        }
    }

    #[test]
    fn test_part2t_reached_when_not_a_part3() {
        // "zho" is both part3 and part2t of the same record; part3 wins.
        let r = resolver();
        let (namespace, language) = r.resolve_with_namespace("zho").unwrap();
        assert_eq!(namespace, Namespace::Part3);
        assert_eq!(language.part3(), "zho");
    }

    #[test]
    fn test_codes_outrank_names() {
        // "chi" is zho's part2b and also chx's reference name.
        let r = resolver();
        assert_eq!(r.resolve("chi").unwrap().part3(), "zho");
        assert_eq!(r.from_name("chi").unwrap().part3(), "chx");
    }

    #[test]
    fn test_reference_name_outranks_alternative_names() {
        // "Chinese" is zho's reference name and frc's inverted alternative.
        let r = resolver();
        let (namespace, language) = r.resolve_with_namespace("Chinese").unwrap();
        assert_eq!(namespace, Namespace::Name);
        assert_eq!(language.part3(), "zho");
    }

    #[test]
    fn test_retired_name_not_matched_as_reference_name() {
        // frx is retired with reference name "French"; the active one wins
        // and the retired name never enters the name namespace.
        let r = resolver();
        assert_eq!(r.resolve("French").unwrap().part3(), "fra");
        assert!(r.resolve("Gan (retired)").is_err());
    }

    #[test]
    fn test_shared_alternative_name_prefers_earliest_record() {
        let r = resolver();
        assert_eq!(r.resolve("Shared").unwrap().part3(), "frb");
        assert_eq!(
            r.index().candidates(Namespace::PrintName, "Shared"),
            &[
                r.store().position("frb").unwrap(),
                r.store().position("frc").unwrap()
            ]
        );
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let r = resolver();
        for input in ["FRA", "Fra", "FR", "french", "FRENCH", "cantonese", " fra", "fra "] {
            let err = r.resolve(input).unwrap_err();
            assert_eq!(err.input(), input);
        }
    }

    #[test]
    fn test_resolve_empty_input() {
        let r = resolver();
        assert_eq!(r.resolve("").unwrap_err().input(), "");
    }

    // ==================== Weak Reference Tests ====================

    #[test]
    fn test_language_by_part3_includes_retired() {
        let r = resolver();
        assert!(r.language("gan").unwrap().is_retired());
        assert!(r.language("fra").unwrap().is_active());
        assert!(r.language("xyz").is_none());
    }

    #[test]
    fn test_macrolanguage_of() {
        let r = resolver();
        let yue = r.from_part3("yue").unwrap();
        assert_eq!(r.macrolanguage_of(yue).unwrap().part3(), "zho");

        // frb points at a macrolanguage missing from the data.
        let frb = r.from_part3("frb").unwrap();
        assert_eq!(frb.macrolanguage(), Some("zzz"));
        assert!(r.macrolanguage_of(frb).is_none());

        assert!(r.macrolanguage_of(r.from_part3("fra").unwrap()).is_none());
    }

    #[test]
    fn test_change_to_of() {
        let r = resolver();
        let gan = r.from_retired_part3("gan").unwrap();
        assert_eq!(r.change_to_of(gan).unwrap().part3(), "zho");

        let frx = r.from_retired_part3("frx").unwrap();
        assert_eq!(frx.retire_change_to(), Some("frq"));
        assert!(r.change_to_of(frx).is_none());
    }

    #[test]
    fn test_members_of() {
        let r = resolver();
        let zho = r.from_part3("zho").unwrap();
        let members: Vec<&str> = r.members_of(zho).iter().map(|l| l.part3()).collect();
        assert_eq!(members, vec!["yue", "gan"]);
        assert!(r.members_of(r.from_part3("fra").unwrap()).is_empty());
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_all_in_insertion_order() {
        let r = resolver();
        let codes: Vec<&str> = r.all().iter().map(|l| l.part3()).collect();
        assert_eq!(
            codes,
            vec!["fra", "zho", "yue", "aaa", "chx", "frb", "frc", "gan", "frx"]
        );
    }

    #[test]
    fn test_new_rejects_duplicate_part2b() {
        let codes = "Id\tPart2B\tPart2T\tPart1\tScope\tLanguage_Type\tRef_Name\tComment\n\
                     fra\tfre\tfra\tfr\tI\tL\tFrench\t\n\
                     frz\tfre\t\t\tI\tL\tNot French\t\n";
        let tables = Tables::parse(TableTexts {
            codes,
            name_index: "Id\tPrint_Name\tInverted_Name\n",
            macrolanguages: "M_Id\tI_Id\tI_Status\n",
            retirements: "Id\tRef_Name\tRet_Reason\tChange_To\tRet_Remedy\tEffective\n",
        })
        .unwrap();
        let err = Resolver::from_tables(tables).unwrap_err();
        assert!(matches!(
            err,
            DataError::DuplicateKey {
                namespace: Namespace::Part2b,
                ..
            }
        ));
    }

    #[test]
    fn test_global_is_singleton() {
        let first = Resolver::global();
        let second = Resolver::global();
        assert!(std::ptr::eq(first, second));
        assert!(Resolver::try_global().is_ok());
    }
}
