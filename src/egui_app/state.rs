//! Shared state types for the egui UI.
//!
//! Everything here is plain data the renderer reads each frame; all mutation
//! goes through the controller.

use crate::catalog::ProductImage;
use crate::nutrition::Unit;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub search: SearchBoxState,
    pub results: ResultListState,
    pub detail: DetailPanelState,
    pub intake: IntakeState,
    pub totals: TotalsState,
    pub status: StatusBarState,
}

/// Search box and the in-flight marker for the current request.
#[derive(Clone, Debug, Default)]
pub struct SearchBoxState {
    pub query: String,
    /// True while a search worker is running; newer searches supersede it.
    pub in_flight: bool,
}

/// Scrollable list of ranked search results.
#[derive(Clone, Debug, Default)]
pub struct ResultListState {
    pub rows: Vec<ProductRowView>,
    pub selected: Option<usize>,
}

/// One selectable row in the result list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductRowView {
    pub name: String,
    /// True when the record carries at least one per-100 g nutrient value.
    pub has_nutrition: bool,
}

/// Detail panel for the currently selected product.
#[derive(Clone, Debug, Default)]
pub struct DetailPanelState {
    pub name: String,
    pub facts: Vec<FactRowView>,
    pub serving_size: Option<String>,
    pub image: Option<ProductImage>,
    /// Result panel line shown after a successful add.
    pub last_added: Option<String>,
}

/// One nutrition-facts row (per 100 g).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactRowView {
    pub label: String,
    pub amount: String,
}

/// Unit selector and quantity input.
#[derive(Clone, Debug, Default)]
pub struct IntakeState {
    pub unit: Unit,
    pub quantity: String,
}

/// Running totals for today, re-read from the ledger after every add.
#[derive(Clone, Debug, Default)]
pub struct TotalsState {
    pub line: String,
}

/// Tone of the status bar badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StatusTone {
    #[default]
    Idle,
    Info,
    Error,
}

/// Status text shown in the footer.
#[derive(Clone, Debug)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self {
            text: "Search the catalog to get started".into(),
            tone: StatusTone::Idle,
        }
    }
}
