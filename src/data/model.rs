use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Column names of the source file
// ---------------------------------------------------------------------------

pub const CITY: &str = "City";
pub const SH2_DESCRIPTION: &str = "SH2 Description";
pub const SH4_DESCRIPTION: &str = "SH4 Description";
pub const US_FOB: &str = "US$ FOB";
pub const NET_WEIGHT: &str = "Net Weight";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DataError {
    /// The input file is missing or cannot be read.
    #[error("O arquivo '{}' não foi encontrado ou não pode ser lido", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An expected column is absent from the loaded table.
    #[error("A coluna '{0}' não foi encontrada no arquivo de dados")]
    MissingColumn(String),

    #[error("CSV malformado")]
    Csv(#[from] csv::Error),

    #[error("Linha {row}, coluna '{column}': '{value}' não é um número")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// TradeRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single export shipment line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub city: String,
    /// Broad product category.
    pub sh2: String,
    /// Specific product.
    pub sh4: String,
    /// Export value in US dollars, free-on-board.
    pub fob: f64,
    pub net_weight: f64,
}

// ---------------------------------------------------------------------------
// TradeTable – the complete loaded dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TradeTable {
    pub records: Vec<TradeRecord>,
    /// Header names in file order, kept for column-presence checks.
    pub columns: Vec<String>,
}

impl TradeTable {
    pub fn new(records: Vec<TradeRecord>, columns: Vec<String>) -> Self {
        TradeTable { records, columns }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Aggregate summaries
// ---------------------------------------------------------------------------

/// Summed FOB for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub fob: f64,
}

impl GroupTotal {
    pub fn new(key: impl Into<String>, fob: f64) -> Self {
        GroupTotal {
            key: key.into(),
            fob,
        }
    }
}

/// Summed FOB for one (city, SH2) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTotal {
    pub city: String,
    pub sh2: String,
    pub fob: f64,
}

/// One scatter point: a filtered row seen as (weight, value).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePoint {
    pub net_weight: f64,
    pub fob: f64,
    pub city: String,
    pub sh2: String,
    pub sh4: String,
}

impl From<&TradeRecord> for TradePoint {
    fn from(rec: &TradeRecord) -> Self {
        TradePoint {
            net_weight: rec.net_weight,
            fob: rec.fob,
            city: rec.city.clone(),
            sh2: rec.sh2.clone(),
            sh4: rec.sh4.clone(),
        }
    }
}
