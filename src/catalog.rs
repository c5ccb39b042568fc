//! Client for the external product catalog (OpenFoodFacts).
//!
//! Products exist only transiently in memory for the duration of a search
//! and selection session; nothing from the catalog is persisted except the
//! fields copied into a ledger entry on add.

use serde::Deserialize;

/// Product search over the catalog's HTTP API.
pub mod search;

/// Product image fetching and decoding.
pub mod image;

pub use image::{ImageError, ProductImage};
pub use search::{CatalogError, search};

/// Display name used when a catalog record has no product name.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown product";

/// One product record returned by a catalog search.
///
/// Every field except the identifier is optional; catalog data is sparse and
/// absent fields are expected, not an error.
#[derive(Debug, Clone, Default)]
pub struct Product {
    /// Catalog identifier (barcode for OpenFoodFacts records).
    pub id: String,
    pub product_name: Option<String>,
    pub ingredients_text: Option<String>,
    /// Free-text portion descriptor, e.g. `"125 g"`.
    pub serving_size: Option<String>,
    pub image_front_url: Option<String>,
    pub nutriments: Nutriments,
}

impl Product {
    /// Name shown in result lists and stored in the ledger.
    pub fn display_name(&self) -> &str {
        self.product_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_PRODUCT_NAME)
    }
}

/// Nutrient values per 100 g as reported by the catalog.
///
/// The catalog serializes these inconsistently (numbers or numeric strings),
/// so deserialization is lenient; anything unreadable becomes `None`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct Nutriments {
    #[serde(
        rename = "energy-kcal_100g",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub energy_kcal_100g: Option<f64>,
    #[serde(rename = "proteins_100g", default, deserialize_with = "lenient_f64")]
    pub proteins_100g: Option<f64>,
    #[serde(rename = "fat_100g", default, deserialize_with = "lenient_f64")]
    pub fat_100g: Option<f64>,
    #[serde(
        rename = "carbohydrates_100g",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub carbohydrates_100g: Option<f64>,
}

/// Accept a number, a numeric string, or nothing for a nutrient field.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }))
}
