//! egui renderer for the application UI.

use std::time::Duration;

use eframe::egui::{
    self, Color32, ColorImage, Grid, Key, RichText, ScrollArea, TextureHandle, TextureOptions, Ui,
    Vec2,
};

use crate::config::{AppConfig, Theme};
use crate::egui_app::controller::EguiController;
use crate::egui_app::state::StatusTone;
use crate::nutrition::Unit;

/// Smallest window size that keeps all panels usable.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(720.0, 480.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    /// Detail-panel texture, keyed by the controller's image revision.
    detail_tex: Option<(u64, TextureHandle)>,
}

impl EguiApp {
    /// Create the app, opening the ledger configured in `config`.
    pub fn new(config: AppConfig) -> Result<Self, String> {
        let controller =
            EguiController::new(config).map_err(|err| format!("Failed to start: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
            detail_tex: None,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let visuals = match self.controller.theme() {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        };
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_search_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Search");
                let response = ui.add_sized(
                    [ui.available_width() - 80.0, 20.0],
                    egui::TextEdit::singleline(&mut self.controller.ui.search.query),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                let clicked = ui.button("Search").clicked();
                if submitted || clicked {
                    self.controller.submit_search();
                }
            });
            ui.add_space(4.0);
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status = &self.controller.ui.status;
            ui.horizontal(|ui| {
                ui.add_space(4.0);
                ui.painter().circle_filled(
                    ui.cursor().min + egui::vec2(6.0, 10.0),
                    5.0,
                    status_color(status.tone),
                );
                ui.add_space(16.0);
                ui.label(&status.text);
            });
        });
    }

    fn render_result_list(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("results")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.label(RichText::new("Results").strong());
                ui.add_space(4.0);
                ScrollArea::vertical().show(ui, |ui| {
                    let rows = self.controller.ui.results.rows.clone();
                    let selected = self.controller.ui.results.selected;
                    for (index, row) in rows.iter().enumerate() {
                        let label = if row.has_nutrition {
                            row.name.clone()
                        } else {
                            format!("{} (no nutrition data)", row.name)
                        };
                        if ui
                            .selectable_label(Some(index) == selected, label)
                            .clicked()
                        {
                            self.controller.select_product(index);
                        }
                    }
                });
            });
    }

    fn render_detail_panel(&mut self, ctx: &egui::Context) {
        self.sync_detail_texture(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.controller.ui.results.selected.is_none() {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.label("Select a product to see nutrition facts");
                });
                self.render_totals(ui);
                return;
            }

            ui.add_space(4.0);
            ui.heading(self.controller.ui.detail.name.clone());
            ui.add_space(8.0);

            if let Some((_, texture)) = &self.detail_tex {
                ui.image((texture.id(), texture.size_vec2()));
                ui.add_space(8.0);
            }

            self.render_facts(ui);
            ui.add_space(12.0);
            self.render_intake(ui);
            ui.add_space(12.0);

            if let Some(added) = self.controller.ui.detail.last_added.clone() {
                ui.label(RichText::new(added).strong());
            }
            self.render_totals(ui);
        });
    }

    fn render_facts(&mut self, ui: &mut Ui) {
        let facts = self.controller.ui.detail.facts.clone();
        Grid::new("nutrition_facts")
            .num_columns(2)
            .spacing([24.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Per 100 g").strong());
                ui.label("");
                ui.end_row();
                for fact in facts {
                    ui.label(fact.label);
                    ui.label(fact.amount);
                    ui.end_row();
                }
            });
        if let Some(serving) = self.controller.ui.detail.serving_size.clone() {
            ui.add_space(4.0);
            ui.label(format!("Serving size: {serving}"));
        }
    }

    fn render_intake(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let unit = &mut self.controller.ui.intake.unit;
            ui.radio_value(unit, Unit::Grams, "grams");
            ui.radio_value(unit, Unit::Servings, "servings");
            ui.add_sized(
                [80.0, 20.0],
                egui::TextEdit::singleline(&mut self.controller.ui.intake.quantity),
            );
            if ui.button("Add").clicked() {
                self.controller.add_amount();
            }
        });
    }

    fn render_totals(&mut self, ui: &mut Ui) {
        ui.add_space(8.0);
        ui.separator();
        ui.label(self.controller.ui.totals.line.clone());
    }

    /// Upload the detail image as a texture when a new one has arrived.
    fn sync_detail_texture(&mut self, ctx: &egui::Context) {
        let Some(image) = &self.controller.ui.detail.image else {
            self.detail_tex = None;
            return;
        };
        let revision = self.controller.image_revision();
        if self
            .detail_tex
            .as_ref()
            .is_some_and(|(tex_revision, _)| *tex_revision == revision)
        {
            return;
        }
        let color_image = ColorImage::from_rgba_unmultiplied(
            [image.width as usize, image.height as usize],
            &image.rgba,
        );
        let texture = ctx.load_texture("product_image", color_image, TextureOptions::LINEAR);
        self.detail_tex = Some((revision, texture));
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        if self.controller.search_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.render_search_bar(ctx);
        self.render_status_bar(ctx);
        self.render_result_list(ctx);
        self.render_detail_panel(ctx);
    }
}

fn status_color(tone: StatusTone) -> Color32 {
    match tone {
        StatusTone::Idle => Color32::GRAY,
        StatusTone::Info => Color32::from_rgb(80, 180, 90),
        StatusTone::Error => Color32::from_rgb(205, 70, 70),
    }
}
