//! Maintains app state and bridges the domain modules to the egui UI.
//!
//! The interaction is strictly linear: no selection, then a selected product,
//! then a recorded entry; selecting a new product resets to selected. Adding
//! with no selection is a no-op.

mod jobs;

use thiserror::Error;

use crate::catalog::Product;
use crate::config::{AppConfig, ConfigError, Theme};
use crate::egui_app::state::{StatusTone, UiState};
use crate::egui_app::view_model;
use crate::ledger::{self, Ledger, LedgerError, NewEntry};
use crate::nutrition;
use crate::ranking;

use jobs::{ControllerJobs, JobMessage};

/// Errors that prevent the controller from starting at all.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Could not open ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Owns the ledger, the current search results and all UI state.
pub struct EguiController {
    pub ui: UiState,
    config: AppConfig,
    ledger: Ledger,
    results: Vec<Product>,
    jobs: ControllerJobs,
    image_revision: u64,
}

impl EguiController {
    /// Open the ledger configured in `config` and prime the totals display.
    pub fn new(config: AppConfig) -> Result<Self, ControllerError> {
        let ledger = Ledger::open(config.database_path()?)?;
        let mut controller = Self {
            ui: UiState::default(),
            config,
            ledger,
            results: Vec::new(),
            jobs: ControllerJobs::new(),
            image_revision: 0,
        };
        controller.refresh_totals();
        Ok(controller)
    }

    /// Theme the UI should apply at startup.
    pub fn theme(&self) -> Theme {
        self.config.theme
    }

    /// Bumped whenever a new detail image arrives, so the renderer knows to
    /// re-upload its texture.
    pub fn image_revision(&self) -> u64 {
        self.image_revision
    }

    /// Kick off a catalog search for the current query text.
    pub fn submit_search(&mut self) {
        let query = self.ui.search.query.trim().to_string();
        if query.is_empty() {
            self.set_status("Enter a search term first", StatusTone::Error);
            return;
        }
        let base_url = match self.config.catalog_base_url() {
            Ok(url) => url,
            Err(err) => {
                self.set_status(err.to_string(), StatusTone::Error);
                return;
            }
        };
        let seq = self.jobs.spawn_search(base_url, query.clone());
        self.ui.search.in_flight = true;
        tracing::info!(seq, query, "search started");
        self.set_status(format!("Searching for '{query}'..."), StatusTone::Info);
    }

    /// True while a search worker has not reported back yet.
    pub fn search_in_flight(&self) -> bool {
        self.ui.search.in_flight
    }

    /// Drain finished worker messages and fold them into the UI state.
    ///
    /// Results tagged older than the latest issued request are spurious and
    /// dropped without touching the UI.
    pub fn poll_background_jobs(&mut self) {
        while let Ok(message) = self.jobs.try_recv() {
            match message {
                JobMessage::SearchFinished { seq, query, result } => {
                    if seq != self.jobs.latest_search() {
                        tracing::debug!(seq, "discarding stale search result");
                        continue;
                    }
                    self.ui.search.in_flight = false;
                    match result {
                        Ok(products) => self.apply_search_results(&query, products),
                        Err(err) => {
                            // Previous result list stays untouched on failure.
                            tracing::warn!(%err, "search failed");
                            self.set_status(format!("Search failed: {err}"), StatusTone::Error);
                        }
                    }
                }
                JobMessage::ImageLoaded { seq, result } => {
                    if seq != self.jobs.latest_image() {
                        continue;
                    }
                    match result {
                        Ok(img) => {
                            self.ui.detail.image = Some(img);
                            self.image_revision += 1;
                        }
                        Err(err) => tracing::warn!(%err, "product image unavailable"),
                    }
                }
            }
        }
    }

    /// Select a result row and populate the detail panel.
    pub fn select_product(&mut self, index: usize) {
        let Some(product) = self.results.get(index).cloned() else {
            return;
        };
        self.ui.results.selected = Some(index);
        self.ui.detail.name = product.display_name().to_string();
        self.ui.detail.facts = view_model::fact_rows(&product.nutriments);
        self.ui.detail.serving_size = product.serving_size.clone();
        self.ui.detail.image = None;
        self.ui.detail.last_added = None;
        match &product.image_front_url {
            Some(url) => {
                self.jobs
                    .spawn_image_fetch(url.clone(), self.config.catalog.image_edge);
            }
            // A pending fetch for the previous selection must not attach here.
            None => self.jobs.invalidate_image(),
        }
    }

    /// Record the entered quantity of the selected product in the ledger.
    ///
    /// With no product selected this is a no-op. Input errors surface in the
    /// status bar and record nothing; a failed save keeps the selection and
    /// the typed quantity so the user can retry.
    pub fn add_amount(&mut self) {
        let Some(product) = self.selected_product().cloned() else {
            return;
        };
        let quantity = match nutrition::parse_quantity(&self.ui.intake.quantity) {
            Ok(quantity) => quantity,
            Err(err) => {
                self.set_status(err.to_string(), StatusTone::Error);
                return;
            }
        };
        let grams = match nutrition::quantity_in_grams(
            self.ui.intake.unit,
            quantity,
            product.serving_size.as_deref(),
        ) {
            Ok(grams) => grams,
            Err(err) => {
                self.set_status(err.to_string(), StatusTone::Error);
                return;
            }
        };
        let facts = nutrition::scale_for_grams(&product.nutriments, grams);
        let entry = NewEntry {
            product_id: product.id.clone(),
            name: product.display_name().to_string(),
            grams,
            calories: facts.calories,
            protein: facts.protein,
        };
        match self.ledger.record(&entry, ledger::today()) {
            Ok(recorded) => {
                tracing::info!(name = recorded.name, grams, "entry recorded");
                self.ui.detail.last_added =
                    Some(view_model::added_line(&recorded.name, grams, &facts));
                self.ui.intake.quantity.clear();
                self.refresh_totals();
                self.set_status(format!("Recorded {}", recorded.name), StatusTone::Info);
            }
            Err(err) => {
                tracing::error!(%err, "failed to persist entry");
                self.set_status(format!("Failed to save entry: {err}"), StatusTone::Error);
            }
        }
    }

    /// Re-read today's totals from the ledger.
    pub fn refresh_totals(&mut self) {
        match self.ledger.daily_totals(ledger::today()) {
            Ok(total) => self.ui.totals.line = view_model::totals_line(total),
            Err(err) => {
                tracing::error!(%err, "failed to read daily totals");
                self.set_status(format!("Failed to read totals: {err}"), StatusTone::Error);
            }
        }
    }

    fn apply_search_results(&mut self, query: &str, mut products: Vec<Product>) {
        ranking::rank(query, &mut products);
        self.ui.results.rows = products.iter().map(view_model::product_row).collect();
        self.ui.results.selected = None;
        self.ui.detail = Default::default();
        self.results = products;
        let status = if self.results.is_empty() {
            format!("No results for '{query}'")
        } else {
            format!("{} results for '{query}'", self.results.len())
        };
        self.set_status(status, StatusTone::Info);
    }

    fn selected_product(&self) -> Option<&Product> {
        self.results.get(self.ui.results.selected?)
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.text = text.into();
        self.ui.status.tone = tone;
    }
}
