// src/app/ui/qualities.rs
use eframe::egui as eg;

use crate::app::editor::Seed;
use crate::app::types::{Field, FieldOwner, Quality};
use crate::app::ui::movies::editable_cell;
use crate::app::ui::toast::ConfirmAction;
use crate::app::ui::UiAction;
use crate::app::utils;

fn grade_color(grade: &str) -> eg::Color32 {
    match grade {
        "CAM" => eg::Color32::from_rgb(0x43, 0xa0, 0x47),
        "HD" => eg::Color32::from_rgb(0x29, 0x7f, 0xb8),
        "FULL HD" => eg::Color32::from_rgb(0xf2, 0x9f, 0x05),
        "2K" => eg::Color32::from_rgb(0x7b, 0x4f, 0xd8),
        "4K" => eg::Color32::from_rgb(0x37, 0x37, 0x41),
        _ => eg::Color32::GRAY,
    }
}

fn quality_owner(q: &Quality) -> FieldOwner {
    FieldOwner::Quality {
        quality_id: q.id.clone(),
        movie_id: q.movie_id.clone(),
        episode_id: q.episode_id.clone(),
        server_id: q.server_id.clone(),
    }
}

impl crate::app::CinedeskApp {
    pub(crate) fn ui_render_qualities(&mut self, ctx: &eg::Context, actions: &mut Vec<UiAction>) {
        let Self {
            tables,
            edit,
            quality_panel_width,
            prefs_dirty,
            ..
        } = self;
        let panel_state = &tables.qualities;

        let panel = eg::SidePanel::right("qualities_panel")
            .resizable(true)
            .default_width(*quality_panel_width)
            .min_width(260.0)
            .max_width(560.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.heading("Qualities");
                    if ui.small_button("Reload").clicked() {
                        actions.push(UiAction::ReloadQualities);
                    }
                });
                ui.separator();

                if !panel_state.loaded {
                    ui.label("Pick a server badge in the episodes panel.");
                    return;
                }
                if panel_state.rows.is_empty() {
                    ui.label("No quality yet");
                    return;
                }

                eg::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                    for q_row in &panel_state.rows {
                        let q = &q_row.quality;

                        eg::Frame::group(ui.style()).show(ui, |ui| {
                            ui.horizontal(|ui| {
                                // Grade badge; double-click swaps in the select.
                                let grade_active = edit
                                    .as_ref()
                                    .is_some_and(|s| s.targets(Field::QualityTitle, &quality_owner(q)));
                                if grade_active {
                                    editable_cell(
                                        ui,
                                        edit,
                                        actions,
                                        Field::QualityTitle,
                                        quality_owner(q),
                                        String::new(),
                                        Seed::Text(q.title.clone()),
                                    );
                                } else {
                                    let shown = q_row
                                        .overrides
                                        .get(&Field::QualityTitle)
                                        .cloned()
                                        .unwrap_or_else(|| q.title.clone());
                                    let badge = eg::RichText::new(&shown)
                                        .color(eg::Color32::WHITE)
                                        .background_color(grade_color(&shown))
                                        .strong();
                                    let resp =
                                        ui.add(eg::Label::new(badge).sense(eg::Sense::click()));
                                    if resp.double_clicked() {
                                        actions.push(UiAction::BeginEdit {
                                            field: Field::QualityTitle,
                                            owner: quality_owner(q),
                                            seed: Seed::Text(q.title.clone()),
                                        });
                                    }
                                }

                                ui.with_layout(
                                    eg::Layout::right_to_left(eg::Align::Center),
                                    |ui| {
                                        if ui.small_button("Delete").clicked() {
                                            actions.push(UiAction::AskDelete(
                                                ConfirmAction::DeleteQuality {
                                                    quality_id: q.id.clone(),
                                                },
                                            ));
                                        }
                                    },
                                );
                            });

                            editable_cell(
                                ui,
                                edit,
                                actions,
                                Field::QualityDescription,
                                quality_owner(q),
                                q_row
                                    .overrides
                                    .get(&Field::QualityDescription)
                                    .cloned()
                                    .unwrap_or_else(|| q.description.clone()),
                                Seed::Text(q.description.clone()),
                            );

                            editable_cell(
                                ui,
                                edit,
                                actions,
                                Field::QualityStatus,
                                quality_owner(q),
                                q_row
                                    .overrides
                                    .get(&Field::QualityStatus)
                                    .cloned()
                                    .unwrap_or_else(|| utils::status_label(q.status).to_string()),
                                Seed::Int(q.status),
                            );

                            // Video URL edits start from an explicit button,
                            // not a double-click on the player area.
                            let url_active = edit
                                .as_ref()
                                .is_some_and(|s| s.targets(Field::QualityVideoUrl, &quality_owner(q)));
                            if url_active {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::QualityVideoUrl,
                                    quality_owner(q),
                                    String::new(),
                                    Seed::Text(q.videourl.clone()),
                                );
                            } else {
                                ui.horizontal(|ui| {
                                    let shown = q_row
                                        .overrides
                                        .get(&Field::QualityVideoUrl)
                                        .cloned()
                                        .unwrap_or_else(|| q.videourl.clone());
                                    ui.label(eg::RichText::new(shown).weak().small());
                                    if ui.small_button("Edit URL").clicked() {
                                        actions.push(UiAction::BeginEdit {
                                            field: Field::QualityVideoUrl,
                                            owner: quality_owner(q),
                                            seed: Seed::Text(q.videourl.clone()),
                                        });
                                    }
                                });
                            }
                        });
                        ui.add_space(6.0);
                    }
                });
            });

        // Persist the panel width between runs.
        let actual_w = panel.response.rect.width();
        if (actual_w - *quality_panel_width).abs() > 0.5 {
            *quality_panel_width = actual_w.clamp(260.0, 560.0);
            *prefs_dirty = true;
        }
    }
}
