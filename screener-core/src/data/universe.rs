//! Symbol universe: industry-organized ticker lists.
//!
//! Two on-disk shapes are supported:
//! - a TOML file with a `[sectors]` table mapping industry → tickers,
//! - a directory of per-industry CSV exports (one file per industry, a
//!   `Symbol` column, industry name taken from the file stem).
//!
//! Selection always yields trimmed, uppercased, de-duplicated tickers in a
//! stable order: sectors in name order, tickers in file order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Errors loading or querying a universe.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("read universe {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse universe TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialize universe: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("read CSV {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("CSV {path} has no '{column}' column")]
    MissingColumn { path: String, column: String },

    #[error("unknown sector '{0}'")]
    UnknownSector(String),
}

/// Column holding the ticker in per-industry CSV exports.
pub const SYMBOL_COLUMN: &str = "Symbol";

/// The complete universe configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    /// Load from a TOML file, or from a directory of CSV files.
    pub fn load(path: &Path) -> Result<Self, UniverseError> {
        if path.is_dir() {
            Self::from_csv_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path).map_err(|source| UniverseError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        Ok(toml::from_str(content)?)
    }

    /// Load every `*.csv` file in `dir` as one sector.
    pub fn from_csv_dir(dir: &Path) -> Result<Self, UniverseError> {
        let read_err = |source| UniverseError::Read {
            path: dir.display().to_string(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();

        let mut sectors = BTreeMap::new();
        for path in files {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().replace('_', " "))
                .unwrap_or_default();
            let file = std::fs::File::open(&path).map_err(|source| UniverseError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let tickers = read_symbol_column(file, &path.display().to_string())?;
            sectors.insert(name, tickers);
        }

        Ok(Self { sectors })
    }

    /// Get all tickers across all sectors, de-duplicated.
    pub fn all_tickers(&self) -> Vec<String> {
        normalize_symbols(self.sectors.values().flatten())
    }

    /// Tickers for the named sectors, in the order given, de-duplicated.
    ///
    /// An empty selection means the whole universe.
    pub fn select(&self, sectors: &[String]) -> Result<Vec<String>, UniverseError> {
        if sectors.is_empty() {
            return Ok(self.all_tickers());
        }

        let mut chosen: Vec<&String> = Vec::new();
        for name in sectors {
            let tickers = self
                .sector_tickers(name)
                .ok_or_else(|| UniverseError::UnknownSector(name.clone()))?;
            chosen.extend(tickers);
        }
        Ok(normalize_symbols(chosen))
    }

    /// Get tickers for a specific sector (case-insensitive name match).
    pub fn sector_tickers(&self, sector: &str) -> Option<&[String]> {
        self.sectors
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(sector))
            .map(|(_, v)| v.as_slice())
    }

    /// Get the list of sector names.
    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.keys().map(|s| s.as_str()).collect()
    }

    /// Total number of tickers (before de-duplication).
    pub fn ticker_count(&self) -> usize {
        self.sectors.values().map(|v| v.len()).sum()
    }

    /// A starter universe of US small and mid caps across a few industries.
    pub fn default_us() -> Self {
        let sector = |tickers: &[&str]| -> Vec<String> {
            tickers.iter().map(|t| t.to_string()).collect()
        };
        let mut sectors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        sectors.insert(
            "Healthcare".into(),
            sector(&[
                "ACAD", "AMPH", "ANIP", "CORT", "HALO", "IRWD", "LMAT", "OMCL", "PDCO", "SUPN",
            ]),
        );
        sectors.insert(
            "Technology".into(),
            sector(&[
                "AAOI", "ALRM", "CEVA", "DGII", "EGHT", "IMMR", "NTCT", "PLAB", "PRGS", "VECO",
            ]),
        );
        sectors.insert(
            "Energy".into(),
            sector(&["AMPY", "CLNE", "CRK", "GPRE", "REX", "SD", "TALO", "VTLE"]),
        );
        sectors.insert(
            "Financials".into(),
            sector(&[
                "BHLB", "CASH", "EZPW", "HMN", "MBWM", "NBHC", "OFG", "QCRH", "TBBK", "WRLD",
            ]),
        );
        sectors.insert(
            "Consumer".into(),
            sector(&["BBW", "CAL", "DXLG", "GIII", "HIBB", "LOCO", "MOV", "ZUMZ"]),
        );

        Self { sectors }
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, UniverseError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Trim, uppercase and de-duplicate tickers, keeping first occurrence.
pub fn normalize_symbols<I, S>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .map(|s| s.as_ref().trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

fn read_symbol_column<R: std::io::Read>(reader: R, path: &str) -> Result<Vec<String>, UniverseError> {
    let csv_err = |source| UniverseError::Csv {
        path: path.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let column = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .position(|h| h.eq_ignore_ascii_case(SYMBOL_COLUMN))
        .ok_or_else(|| UniverseError::MissingColumn {
            path: path.to_string(),
            column: SYMBOL_COLUMN.to_string(),
        })?;

    let mut tickers = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        if let Some(symbol) = record.get(column).filter(|s| !s.is_empty()) {
            tickers.push(symbol.to_string());
        }
    }
    Ok(tickers)
}
