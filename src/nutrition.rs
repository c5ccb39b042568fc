//! Nutrition scaling for a consumed quantity of a catalog product.
//!
//! Catalog records carry nutrient values per 100 g. A consumption event is
//! either a weight in grams or a number of servings; servings are converted
//! to grams via the product's serving-size field before scaling.

use thiserror::Error;

use crate::catalog::Nutriments;

/// Serving size assumed when the catalog record has none.
pub const DEFAULT_SERVING_GRAMS: f64 = 100.0;

/// Unit the user entered the quantity in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Grams,
    Servings,
}

/// Absolute nutrient amounts for one consumption event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NutritionFacts {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// Errors for quantity input that cannot become a ledger entry.
#[derive(Debug, Error, PartialEq)]
pub enum QuantityError {
    /// The quantity field did not parse as a finite positive number.
    #[error("Quantity must be a positive number, got '{0}'")]
    InvalidQuantity(String),
    /// The product's serving-size field was unusable.
    #[error("Could not read a serving size from '{0}'")]
    UnusableServingSize(String),
}

/// Scale a product's per-100 g nutrients to an absolute weight in grams.
///
/// Missing nutrient fields contribute zero; this is expected catalog data,
/// not an error.
pub fn scale_for_grams(nutriments: &Nutriments, grams: f64) -> NutritionFacts {
    let factor = grams / 100.0;
    NutritionFacts {
        calories: nutriments.energy_kcal_100g.unwrap_or(0.0) * factor,
        protein: nutriments.proteins_100g.unwrap_or(0.0) * factor,
        fat: nutriments.fat_100g.unwrap_or(0.0) * factor,
        carbs: nutriments.carbohydrates_100g.unwrap_or(0.0) * factor,
    }
}

/// Parse the quantity the user typed; must be a finite number greater than zero.
pub fn parse_quantity(input: &str) -> Result<f64, QuantityError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(QuantityError::InvalidQuantity(trimmed.to_string())),
    }
}

/// Convert a quantity in the given unit into grams.
///
/// For [`Unit::Servings`] the product's serving-size descriptor is resolved
/// first; `serving_size` is the raw catalog field (e.g. `"125 g"`).
pub fn quantity_in_grams(
    unit: Unit,
    quantity: f64,
    serving_size: Option<&str>,
) -> Result<f64, QuantityError> {
    match unit {
        Unit::Grams => Ok(quantity),
        Unit::Servings => Ok(resolve_serving_grams(serving_size)? * quantity),
    }
}

/// Resolve one serving in grams from the catalog's serving-size field.
///
/// The field is free text; every character that is not a digit or decimal
/// point is stripped before parsing. An absent field defaults to
/// [`DEFAULT_SERVING_GRAMS`]. A field that parses to zero or holds no number
/// at all is an error, never a silent zero.
pub fn resolve_serving_grams(serving_size: Option<&str>) -> Result<f64, QuantityError> {
    let Some(raw) = serving_size else {
        return Ok(DEFAULT_SERVING_GRAMS);
    };
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(QuantityError::UnusableServingSize(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oatmeal() -> Nutriments {
        Nutriments {
            energy_kcal_100g: Some(375.0),
            proteins_100g: Some(13.5),
            fat_100g: Some(7.0),
            carbohydrates_100g: Some(58.0),
        }
    }

    #[test]
    fn scales_per_hundred_grams() {
        let facts = scale_for_grams(&oatmeal(), 50.0);
        assert_eq!(facts.calories, 187.5);
        assert_eq!(facts.protein, 6.75);
        assert_eq!(facts.fat, 3.5);
        assert_eq!(facts.carbs, 29.0);
    }

    #[test]
    fn missing_nutrients_scale_to_zero() {
        let facts = scale_for_grams(&Nutriments::default(), 150.0);
        assert_eq!(facts, NutritionFacts::default());
    }

    #[test]
    fn zero_grams_gives_zero_facts() {
        let facts = scale_for_grams(&oatmeal(), 0.0);
        assert_eq!(facts, NutritionFacts::default());
    }

    #[test]
    fn serving_size_with_unit_suffix_parses() {
        assert_eq!(resolve_serving_grams(Some("125 g")).unwrap(), 125.0);
        assert_eq!(resolve_serving_grams(Some("30g")).unwrap(), 30.0);
        // Multiple embedded numbers concatenate; garbage in, garbage out, but
        // never a crash and never a silent zero.
        assert_eq!(resolve_serving_grams(Some("approx. 45 g")).unwrap(), 0.45);
    }

    #[test]
    fn absent_serving_size_defaults_to_hundred() {
        assert_eq!(resolve_serving_grams(None).unwrap(), DEFAULT_SERVING_GRAMS);
    }

    #[test]
    fn unusable_serving_size_is_an_error() {
        assert!(matches!(
            resolve_serving_grams(Some("one bowl")),
            Err(QuantityError::UnusableServingSize(_))
        ));
        assert!(matches!(
            resolve_serving_grams(Some("0 g")),
            Err(QuantityError::UnusableServingSize(_))
        ));
    }

    #[test]
    fn servings_convert_via_serving_size() {
        let grams = quantity_in_grams(Unit::Servings, 2.0, Some("125 g")).unwrap();
        assert_eq!(grams, 250.0);
        let grams = quantity_in_grams(Unit::Servings, 2.0, Some("30g")).unwrap();
        assert_eq!(grams, 60.0);
        let grams = quantity_in_grams(Unit::Servings, 1.5, None).unwrap();
        assert_eq!(grams, 150.0);
    }

    #[test]
    fn grams_pass_through_unchanged() {
        assert_eq!(quantity_in_grams(Unit::Grams, 80.0, None).unwrap(), 80.0);
    }

    #[test]
    fn quantity_must_be_positive_and_numeric() {
        assert_eq!(parse_quantity(" 42.5 ").unwrap(), 42.5);
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("-10").is_err());
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("NaN").is_err());
    }
}
