//! Helpers to convert domain data into egui-facing view structs.

use crate::catalog::{Nutriments, Product};
use crate::egui_app::state::{FactRowView, ProductRowView};
use crate::ledger::DailyTotal;
use crate::nutrition::NutritionFacts;

/// Convert a catalog product into a result-list row.
pub fn product_row(product: &Product) -> ProductRowView {
    ProductRowView {
        name: product.display_name().to_string(),
        has_nutrition: has_any_nutrient(&product.nutriments),
    }
}

/// Build the per-100 g nutrition-facts rows for the detail panel.
///
/// Absent values render as a dash rather than zero so sparse catalog records
/// are not mistaken for zero-calorie products.
pub fn fact_rows(nutriments: &Nutriments) -> Vec<FactRowView> {
    let row = |label: &str, value: Option<f64>, suffix: &str| FactRowView {
        label: label.to_string(),
        amount: match value {
            Some(value) => format!("{value:.1}{suffix}"),
            None => "-".to_string(),
        },
    };
    vec![
        row("Energy", nutriments.energy_kcal_100g, " kcal"),
        row("Protein", nutriments.proteins_100g, " g"),
        row("Fat", nutriments.fat_100g, " g"),
        row("Carbohydrates", nutriments.carbohydrates_100g, " g"),
    ]
}

/// Format the running daily total for the totals panel.
pub fn totals_line(total: DailyTotal) -> String {
    format!(
        "Today: {:.0} kcal, {:.1} g protein",
        total.calories, total.protein
    )
}

/// Format the result line shown after a successful add.
pub fn added_line(name: &str, grams: f64, facts: &NutritionFacts) -> String {
    format!(
        "Added {name} ({grams:.0} g): {:.0} kcal, {:.1} g protein",
        facts.calories, facts.protein
    )
}

fn has_any_nutrient(nutriments: &Nutriments) -> bool {
    nutriments.energy_kcal_100g.is_some()
        || nutriments.proteins_100g.is_some()
        || nutriments.fat_100g.is_some()
        || nutriments.carbohydrates_100g.is_some()
}
