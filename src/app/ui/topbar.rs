// src/app/ui/topbar.rs
use eframe::egui as eg;

impl crate::app::CinedeskApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ctx: &eg::Context) {
        eg::TopBottomPanel::top("topbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Cinedesk");
                ui.separator();

                // Local filter over the loaded rows; the snapshot itself is
                // fetched once and then only refreshed by the push channel.
                let resp = ui.add(
                    eg::TextEdit::singleline(&mut self.search_query)
                        .hint_text("Filter title…")
                        .desired_width(180.0),
                );
                if resp.changed() {
                    self.mark_dirty();
                }
                if !self.search_query.is_empty() && ui.small_button("Clear").clicked() {
                    self.search_query.clear();
                    self.mark_dirty();
                }

                ui.separator();
                if ui.checkbox(&mut self.show_posters, "Posters").changed() {
                    self.mark_dirty();
                }

                ui.separator();
                let (dot, label) = if self.push_connected {
                    (eg::Color32::from_rgb(0x43, 0xa0, 0x47), "Live")
                } else {
                    (eg::Color32::from_gray(130), "Offline")
                };
                let (rect, _) = ui.allocate_exact_size(eg::vec2(10.0, 10.0), eg::Sense::hover());
                ui.painter().circle_filled(rect.center(), 4.0, dot);
                ui.label(label);

                ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                    ui.label(format!("{} movies", self.tables.movies.rows.len()));
                });
            });
            ui.add_space(4.0);
        });
    }
}
