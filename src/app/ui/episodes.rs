// src/app/ui/episodes.rs
use eframe::egui as eg;

use crate::app::ui::toast::ConfirmAction;
use crate::app::ui::UiAction;
use crate::app::utils;

const EPISODE_THUMB: eg::Vec2 = eg::Vec2::new(32.0, 44.0);

impl crate::app::CinedeskApp {
    pub(crate) fn ui_render_episodes(&mut self, ctx: &eg::Context, actions: &mut Vec<UiAction>) {
        let Self {
            tables,
            thumbs,
            cfg,
            selected_movie,
            ..
        } = self;
        let table = &tables.episodes;

        eg::TopBottomPanel::bottom("episodes_panel")
            .resizable(true)
            .default_height(170.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.heading("Episodes");
                    if let Some(id) = selected_movie.as_ref() {
                        ui.label(eg::RichText::new(format!("movie {id}")).weak());
                    }
                    if ui.small_button("Reload").clicked() {
                        actions.push(UiAction::ReloadEpisodes);
                    }
                });
                ui.separator();

                if !table.loaded {
                    ui.label("Pick a movie row (Eps) to load its episodes.");
                    return;
                }
                if table.rows.is_empty() {
                    ui.label("No episode yet");
                    return;
                }

                let mut uploads_left = 2usize;
                eg::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                    for ep in &table.rows {
                        ui.horizontal(|ui| {
                            if !ep.image.is_empty() {
                                if let Some(thumbs) = thumbs.as_mut() {
                                    let url = utils::upload_url(&cfg.api_base_url, &ep.image);
                                    thumbs.request(&url);
                                    match thumbs.texture_for(ui.ctx(), &url, &mut uploads_left) {
                                        Some(tex) => {
                                            ui.image((tex.id(), EPISODE_THUMB));
                                        }
                                        None => {
                                            let (rect, _) = ui
                                                .allocate_exact_size(EPISODE_THUMB, eg::Sense::hover());
                                            ui.painter().rect_filled(
                                                rect,
                                                4.0,
                                                eg::Color32::from_gray(45),
                                            );
                                        }
                                    }
                                }
                            }

                            ui.label(eg::RichText::new(format!("Episode {}", ep.number)).strong());
                            ui.label(utils::status_label(ep.status));
                            ui.separator();

                            // Server badges address the quality panel with the
                            // full (movie, episode, server) triple.
                            if ep.server_details.is_empty() {
                                ui.label(eg::RichText::new("no servers").weak());
                            }
                            for server in &ep.server_details {
                                if ui.small_button(&server.title).clicked() {
                                    actions.push(UiAction::ShowQualities {
                                        movie_id: ep.movie_id.clone(),
                                        episode_id: ep.id.clone(),
                                        server_id: server.id.clone(),
                                    });
                                }
                            }

                            ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                                if ui.small_button("Delete").clicked() {
                                    actions.push(UiAction::AskDelete(ConfirmAction::DeleteEpisode {
                                        episode_id: ep.id.clone(),
                                    }));
                                }
                            });
                        });
                        ui.separator();
                    }
                });
            });
    }
}
