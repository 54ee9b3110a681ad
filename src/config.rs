//! Where the language tables are loaded from.

use crate::error::DataError;
use crate::tables::{Table, TableTexts, Tables};
use std::path::{Path, PathBuf};
use tracing::debug;

const EMBEDDED_CODES: &str = include_str!("../data/iso-639-3.tab");
const EMBEDDED_NAME_INDEX: &str = include_str!("../data/iso-639-3_Name_Index.tab");
const EMBEDDED_MACROLANGUAGES: &str = include_str!("../data/iso-639-3-macrolanguages.tab");
const EMBEDDED_RETIREMENTS: &str = include_str!("../data/iso-639-3_Retirements.tab");

/// Paths of the four SIL table files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFiles {
    /// Code set table (`iso-639-3.tab`)
    pub codes: PathBuf,
    /// Language names index (`iso-639-3_Name_Index.tab`)
    pub name_index: PathBuf,
    /// Macrolanguage mappings (`iso-639-3-macrolanguages.tab`)
    pub macrolanguages: PathBuf,
    /// Retired code mappings (`iso-639-3_Retirements.tab`)
    pub retirements: PathBuf,
}

impl TableFiles {
    /// The four tables under their default file names in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            codes: dir.join(Table::Codes.file_name()),
            name_index: dir.join(Table::NameIndex.file_name()),
            macrolanguages: dir.join(Table::Macrolanguages.file_name()),
            retirements: dir.join(Table::Retirements.file_name()),
        }
    }

    /// Use a differently named codes table, e.g. SIL's dated
    /// `iso-639-3_20230123.tab`.
    pub fn with_codes(mut self, path: impl Into<PathBuf>) -> Self {
        self.codes = path.into();
        self
    }

    /// Use a differently named name index table.
    pub fn with_name_index(mut self, path: impl Into<PathBuf>) -> Self {
        self.name_index = path.into();
        self
    }

    /// Use a differently named macrolanguage mappings table.
    pub fn with_macrolanguages(mut self, path: impl Into<PathBuf>) -> Self {
        self.macrolanguages = path.into();
        self
    }

    /// Use a differently named retirements table.
    pub fn with_retirements(mut self, path: impl Into<PathBuf>) -> Self {
        self.retirements = path.into();
        self
    }

    /// Get the file a table is read from.
    ///
    /// # Arguments
    /// * `table` - Which of the four SIL tables
    ///
    /// # Returns
    /// The configured path, whether or not it exists.
    ///
    /// # Example
    /// ```
    /// use iso639::{Table, TableFiles};
    /// use std::path::Path;
    ///
    /// let files = TableFiles::in_dir("/srv/iso639")
    ///     .with_name_index("/srv/iso639/iso-639-3_Name_Index_20230123.tab");
    /// assert_eq!(files.path(Table::Codes), Path::new("/srv/iso639/iso-639-3.tab"));
    /// assert!(files
    ///     .path(Table::NameIndex)
    ///     .ends_with("iso-639-3_Name_Index_20230123.tab"));
    /// ```
    pub fn path(&self, table: Table) -> &Path {
        match table {
            Table::Codes => &self.codes,
            Table::NameIndex => &self.name_index,
            Table::Macrolanguages => &self.macrolanguages,
            Table::Retirements => &self.retirements,
        }
    }
}

/// Source of the language tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DataSource {
    /// The snapshot compiled into this crate (see [`crate::DATA_LAST_UPDATED`]).
    #[default]
    Embedded,
    /// Tables read from disk, e.g. a newer SIL release.
    Directory(TableFiles),
}

impl DataSource {
    /// Tables with default file names in `dir`.
    pub fn directory(dir: impl AsRef<Path>) -> Self {
        DataSource::Directory(TableFiles::in_dir(dir))
    }

    /// Read and parse the four tables.
    pub fn read_tables(&self) -> Result<Tables, DataError> {
        match self {
            DataSource::Embedded => Tables::parse(TableTexts {
                codes: EMBEDDED_CODES,
                name_index: EMBEDDED_NAME_INDEX,
                macrolanguages: EMBEDDED_MACROLANGUAGES,
                retirements: EMBEDDED_RETIREMENTS,
            }),
            DataSource::Directory(files) => {
                let codes = read_table(files, Table::Codes)?;
                let name_index = read_table(files, Table::NameIndex)?;
                let macrolanguages = read_table(files, Table::Macrolanguages)?;
                let retirements = read_table(files, Table::Retirements)?;

                Tables::parse(TableTexts {
                    codes: &codes,
                    name_index: &name_index,
                    macrolanguages: &macrolanguages,
                    retirements: &retirements,
                })
            }
        }
    }
}

fn read_table(files: &TableFiles, table: Table) -> Result<String, DataError> {
    let path = files.path(table);
    debug!("Reading {} table from {}", table, path.display());

    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        table,
        path: path.to_path_buf(),
        source,
    })
}
