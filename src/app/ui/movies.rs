// src/app/ui/movies.rs
use eframe::egui as eg;
use egui_extras::{Column, TableBuilder};

use crate::app::editor::{EditSession, Seed};
use crate::app::tables::MovieRow;
use crate::app::types::{Field, FieldOwner};
use crate::app::ui::toast::ConfirmAction;
use crate::app::ui::{clicked_outside, UiAction};
use crate::app::utils;

const ROW_HEIGHT: f32 = 56.0;
const POSTER_CELL: eg::Vec2 = eg::Vec2::new(42.0, 56.0);

/// Committed cells render the raw committed text until the next rebuild.
fn cell_display(row: &MovieRow, field: Field, fallback: String) -> String {
    row.overrides.get(&field).cloned().unwrap_or(fallback)
}

/// One editable cell: paints the active session's control when this cell is
/// being edited, a double-clickable label otherwise.
pub(crate) fn editable_cell(
    ui: &mut eg::Ui,
    edit: &mut Option<EditSession>,
    actions: &mut Vec<UiAction>,
    field: Field,
    owner: FieldOwner,
    display: String,
    seed: Seed,
) {
    let is_active = edit.as_ref().is_some_and(|s| s.targets(field, &owner));
    if is_active {
        let session = edit.as_mut().expect("active session");
        let scope = ui.scope(|ui| super::edit::session_control_ui(ui, session));
        let commit_inside = scope.inner;
        let outside = session.wants_outside_commit() && clicked_outside(ui, scope.response.rect);
        if commit_inside || outside {
            actions.push(UiAction::CommitEdit);
        }
    } else {
        let resp = ui.add(eg::Label::new(display).sense(eg::Sense::click()));
        if resp.double_clicked() {
            actions.push(UiAction::BeginEdit { field, owner, seed });
        }
    }
}

fn header_titles(show_posters: bool) -> Vec<&'static str> {
    let mut titles = Vec::new();
    if show_posters {
        titles.push("Poster");
    }
    titles.extend([
        "Title", "Slug", "Status", "Quality", "Subtitles", "Categories", "Genres", "Year", "Eps",
        "Season", "Hot", "Duration", "Views", "Actions",
    ]);
    titles
}

fn joined_titles(details: &[crate::app::types::NamedRef]) -> String {
    if details.is_empty() {
        return "—".to_string();
    }
    use itertools::Itertools;
    details.iter().map(|d| d.title.as_str()).join(", ")
}

impl crate::app::CinedeskApp {
    pub(crate) fn ui_render_movies(&mut self, ctx: &eg::Context, actions: &mut Vec<UiAction>) {
        let Self {
            tables,
            edit,
            thumbs,
            cfg,
            search_query,
            show_posters,
            ..
        } = self;
        let movies = &tables.movies;

        eg::CentralPanel::default().show(ctx, |ui| {
            if !movies.loaded {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading("Loading catalog…");
                    ui.add(eg::Spinner::new().size(16.0));
                    ui.label("Waiting for the movie snapshot.");
                });
                return;
            }

            let needle = search_query.trim().to_lowercase();
            let visible: Vec<usize> = movies
                .rows
                .iter()
                .enumerate()
                .filter(|(_, r)| {
                    needle.is_empty()
                        || r.movie.title.to_lowercase().contains(&needle)
                        || r.movie.name_eng.to_lowercase().contains(&needle)
                        || r.movie.slug.to_lowercase().contains(&needle)
                })
                .map(|(i, _)| i)
                .collect();
            // Reordering with an active filter would scramble hidden rows.
            let can_reorder = needle.is_empty();
            let total_rows = movies.rows.len();
            let mut uploads_left = super::super::MAX_UPLOADS_PER_FRAME;

            if visible.is_empty() {
                ui.label("No movies match.");
                return;
            }

            eg::ScrollArea::horizontal().show(ui, |ui| {
                let mut table = TableBuilder::new(ui)
                    .striped(true)
                    .cell_layout(eg::Layout::left_to_right(eg::Align::Center));
                if *show_posters {
                    table = table.column(Column::exact(56.0));
                }
                table = table
                    .column(Column::initial(190.0).at_least(130.0))
                    .column(Column::initial(110.0))
                    .column(Column::initial(90.0))
                    .column(Column::initial(90.0))
                    .column(Column::initial(150.0))
                    .column(Column::initial(120.0))
                    .column(Column::initial(120.0))
                    .column(Column::initial(64.0))
                    .column(Column::initial(48.0))
                    .column(Column::initial(60.0))
                    .column(Column::initial(70.0))
                    .column(Column::initial(110.0))
                    .column(Column::initial(56.0))
                    .column(Column::remainder().at_least(190.0));

                table
                    .header(22.0, |mut header| {
                        for title in header_titles(*show_posters) {
                            header.col(|ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                            let idx = visible[row.index()];
                            let m_row = &movies.rows[idx];
                            let movie = &m_row.movie;
                            let owner = || FieldOwner::Movie {
                                movie_id: movie.id.clone(),
                            };

                            if *show_posters {
                                row.col(|ui| {
                                    if movie.image.is_empty() {
                                        ui.label("—");
                                        return;
                                    }
                                    if let Some(thumbs) = thumbs.as_mut() {
                                        let url =
                                            utils::upload_url(&cfg.api_base_url, &movie.image);
                                        thumbs.request(&url);
                                        match thumbs.texture_for(ui.ctx(), &url, &mut uploads_left)
                                        {
                                            Some(tex) => {
                                                ui.image((tex.id(), POSTER_CELL));
                                            }
                                            None => {
                                                let (rect, _) = ui.allocate_exact_size(
                                                    POSTER_CELL,
                                                    eg::Sense::hover(),
                                                );
                                                ui.painter().rect_filled(
                                                    rect,
                                                    4.0,
                                                    eg::Color32::from_gray(45),
                                                );
                                            }
                                        }
                                    }
                                });
                            }

                            row.col(|ui| {
                                ui.vertical(|ui| {
                                    editable_cell(
                                        ui,
                                        edit,
                                        actions,
                                        Field::Title,
                                        owner(),
                                        cell_display(m_row, Field::Title, movie.title.clone()),
                                        Seed::Text(movie.title.clone()),
                                    );
                                    editable_cell(
                                        ui,
                                        edit,
                                        actions,
                                        Field::Description,
                                        owner(),
                                        cell_display(
                                            m_row,
                                            Field::Description,
                                            movie.description.clone(),
                                        ),
                                        Seed::Text(movie.description.clone()),
                                    );
                                });
                            });

                            row.col(|ui| {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::Slug,
                                    owner(),
                                    cell_display(m_row, Field::Slug, movie.slug.clone()),
                                    Seed::Text(movie.slug.clone()),
                                );
                            });

                            row.col(|ui| {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::Status,
                                    owner(),
                                    cell_display(
                                        m_row,
                                        Field::Status,
                                        utils::status_label(movie.status).to_string(),
                                    ),
                                    Seed::Int(movie.status),
                                );
                            });

                            row.col(|ui| {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::MaxQuality,
                                    owner(),
                                    cell_display(
                                        m_row,
                                        Field::MaxQuality,
                                        utils::quality_tier_label(movie.max_quality).to_string(),
                                    ),
                                    Seed::Int(movie.max_quality),
                                );
                            });

                            row.col(|ui| {
                                // Checklist replaces the whole cell while active.
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::Sub,
                                    owner(),
                                    cell_display(m_row, Field::Sub, utils::join_set(&movie.sub)),
                                    Seed::Set(movie.sub.clone()),
                                );
                            });

                            row.col(|ui| {
                                ui.label(joined_titles(&movie.category_details));
                            });
                            row.col(|ui| {
                                ui.label(joined_titles(&movie.genre_details));
                            });

                            row.col(|ui| {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::Year,
                                    owner(),
                                    cell_display(m_row, Field::Year, movie.year.to_string()),
                                    Seed::Int(movie.year),
                                );
                            });

                            row.col(|ui| {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::Numofep,
                                    owner(),
                                    cell_display(m_row, Field::Numofep, movie.numofep.to_string()),
                                    Seed::Int(movie.numofep),
                                );
                            });

                            row.col(|ui| {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::Season,
                                    owner(),
                                    cell_display(m_row, Field::Season, movie.season.to_string()),
                                    Seed::Int(movie.season),
                                );
                            });

                            row.col(|ui| {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::Hotmovie,
                                    owner(),
                                    cell_display(
                                        m_row,
                                        Field::Hotmovie,
                                        utils::hot_label(movie.hotmovie).to_string(),
                                    ),
                                    Seed::Int(movie.hotmovie),
                                );
                            });

                            row.col(|ui| {
                                editable_cell(
                                    ui,
                                    edit,
                                    actions,
                                    Field::Duration,
                                    owner(),
                                    cell_display(m_row, Field::Duration, movie.duration.clone()),
                                    Seed::Text(movie.duration.clone()),
                                );
                            });

                            row.col(|ui| {
                                ui.label(movie.views.to_string());
                            });

                            row.col(|ui| {
                                ui.horizontal(|ui| {
                                    if ui
                                        .add_enabled(
                                            can_reorder && idx > 0,
                                            eg::Button::new("▲").small(),
                                        )
                                        .clicked()
                                    {
                                        actions.push(UiAction::MoveMovie {
                                            index: idx,
                                            delta: -1,
                                        });
                                    }
                                    if ui
                                        .add_enabled(
                                            can_reorder && idx + 1 < total_rows,
                                            eg::Button::new("▼").small(),
                                        )
                                        .clicked()
                                    {
                                        actions.push(UiAction::MoveMovie {
                                            index: idx,
                                            delta: 1,
                                        });
                                    }
                                    if ui.small_button("Eps").clicked() {
                                        actions.push(UiAction::ShowEpisodes {
                                            movie_id: movie.id.clone(),
                                        });
                                    }
                                    if ui.small_button("Delete").clicked() {
                                        actions.push(UiAction::AskDelete(
                                            ConfirmAction::DeleteMovie {
                                                movie_id: movie.id.clone(),
                                            },
                                        ));
                                    }
                                    if !movie.more_images.is_empty() {
                                        ui.menu_button("Images", |ui| {
                                            for img in &movie.more_images {
                                                if ui.button(format!("Delete {img}")).clicked() {
                                                    actions.push(UiAction::AskDelete(
                                                        ConfirmAction::DeleteImage {
                                                            movie_id: movie.id.clone(),
                                                            filename: img.clone(),
                                                        },
                                                    ));
                                                    ui.close_menu();
                                                }
                                            }
                                        });
                                    }
                                });
                            });
                        });
                    });
            });
        });
    }
}
