use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One property record from the listings dataset.
///
/// The CSV keeps the dataset's original Portuguese column names; fields that
/// may be blank in the source file are optional. `total_price`, `bedrooms`
/// and `parking` are required for filtering, but rows may still be missing
/// them — such rows load fine and are excluded by the query filter instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "quartos", default)]
    pub bedrooms: Option<u32>,
    #[serde(rename = "vagas", default)]
    pub parking: Option<u32>,
    #[serde(rename = "area", default)]
    pub area: Option<f64>,
    #[serde(rename = "valor_total", default)]
    pub total_price: Option<f64>,
    #[serde(rename = "condominio", default)]
    pub condo_fee: Option<f64>,
    #[serde(rename = "metro_estacao", default)]
    pub station: Option<String>,
    #[serde(rename = "metro_linha", default)]
    pub station_line: Option<String>,
    #[serde(rename = "metro_distancia", default)]
    pub station_distance_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The dataset file is missing or unreadable. Fatal to every query; a
    /// caller must never treat this as an empty result set.
    Unavailable { path: PathBuf, reason: String },
    /// The dataset exists but a row could not be decoded.
    Malformed { path: PathBuf, reason: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { path, reason } => {
                write!(f, "listings dataset {} unavailable: {reason}", path.display())
            }
            Self::Malformed { path, reason } => {
                write!(f, "listings dataset {} malformed: {reason}", path.display())
            }
        }
    }
}

impl Error for StoreError {}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// In-memory copy of the listings dataset, loaded once per session and
/// read-only afterwards. Never written back to the source file.
#[derive(Debug, Clone)]
pub struct ListingStore {
    listings: Vec<Listing>,
}

impl ListingStore {
    pub fn load(path: &Path) -> StoreResult<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|err| StoreError::Unavailable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let mut listings = Vec::new();
        for row in reader.deserialize() {
            let listing: Listing = row.map_err(|err| StoreError::Malformed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
            listings.push(listing);
        }

        Ok(Self { listings })
    }

    /// Listings in storage order.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
