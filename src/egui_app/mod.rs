//! egui UI for the calorie tracker: state, controller and renderer.

/// Event controller bridging domain modules to the UI state.
pub mod controller;
/// Plain view-state structs consumed by the renderer.
pub mod state;
/// egui renderer.
pub mod ui;
/// Converters from domain data to view structs.
pub mod view_model;

pub use controller::EguiController;
pub use ui::EguiApp;
