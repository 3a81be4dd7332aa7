// src/app/ui/toast.rs
use std::time::{Duration, Instant};

use eframe::egui as eg;

use crate::app::types::ApiJob;
use crate::app::utils::strip_object_id;

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
}

pub(crate) struct Toast {
    kind: ToastKind,
    text: String,
    born: Instant,
}

/// Transient, auto-dismissing notifications stacked top-right. Errors and
/// successes are visually distinct.
#[derive(Default)]
pub(crate) struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn success(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Error, text.into());
    }

    fn push(&mut self, kind: ToastKind, text: String) {
        self.items.push(Toast {
            kind,
            text,
            born: Instant::now(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn show(&mut self, ctx: &eg::Context) {
        self.items.retain(|t| t.born.elapsed() < TOAST_TTL);
        if self.items.is_empty() {
            return;
        }

        eg::Area::new(eg::Id::new("cinedesk_toasts"))
            .anchor(eg::Align2::RIGHT_TOP, [-12.0, 12.0])
            .order(eg::Order::Foreground)
            .show(ctx, |ui| {
                for t in &self.items {
                    let bg = match t.kind {
                        ToastKind::Success => eg::Color32::from_rgb(0x2e, 0x7d, 0x32),
                        ToastKind::Error => eg::Color32::from_rgb(0xc6, 0x28, 0x28),
                    };
                    eg::Frame::none()
                        .fill(bg)
                        .rounding(6.0)
                        .inner_margin(eg::Margin::symmetric(10.0, 6.0))
                        .show(ui, |ui| {
                            ui.label(eg::RichText::new(&t.text).color(eg::Color32::WHITE));
                        });
                    ui.add_space(4.0);
                }
            });

        // Let expired toasts disappear without waiting for other input.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

/// Destructive actions wait behind an explicit confirmation.
#[derive(Clone, Debug)]
pub(crate) enum ConfirmAction {
    DeleteMovie { movie_id: String },
    DeleteEpisode { episode_id: String },
    DeleteQuality { quality_id: String },
    DeleteImage { movie_id: String, filename: String },
}

impl ConfirmAction {
    pub fn message(&self) -> &'static str {
        match self {
            Self::DeleteMovie { .. } => "Are you sure you want to delete this movie?",
            Self::DeleteEpisode { .. } => "Are you sure you want to delete this episode?",
            Self::DeleteQuality { .. } => "Are you sure you want to delete this quality?",
            Self::DeleteImage { .. } => "Are you sure you want to delete this image?",
        }
    }

    pub fn into_job(self) -> ApiJob {
        match self {
            Self::DeleteMovie { movie_id } => ApiJob::DeleteMovie {
                movie_id: strip_object_id(&movie_id),
            },
            Self::DeleteEpisode { episode_id } => ApiJob::DeleteEpisode {
                episode_id: strip_object_id(&episode_id),
            },
            Self::DeleteQuality { quality_id } => ApiJob::DeleteQuality {
                quality_id: strip_object_id(&quality_id),
            },
            Self::DeleteImage { movie_id, filename } => ApiJob::DeleteMovieImage {
                movie_id: strip_object_id(&movie_id),
                filename,
            },
        }
    }
}

impl crate::app::CinedeskApp {
    pub(crate) fn ui_render_confirm(&mut self, ctx: &eg::Context) {
        let Some(prompt) = self.confirm.clone() else {
            return;
        };

        let mut decided = false;
        eg::Window::new("Confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(eg::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(prompt.message());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        decided = true;
                    }
                    if ui
                        .button(eg::RichText::new("Delete").color(eg::Color32::LIGHT_RED))
                        .clicked()
                    {
                        self.send_job(prompt.clone().into_job());
                        decided = true;
                    }
                });
            });

        if decided {
            self.confirm = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_jobs_normalize_ids() {
        let action = ConfirmAction::DeleteMovie {
            movie_id: r#"ObjectID("abc123")"#.into(),
        };
        match action.into_job() {
            ApiJob::DeleteMovie { movie_id } => assert_eq!(movie_id, "abc123"),
            other => panic!("unexpected job {other:?}"),
        }
    }

    #[test]
    fn image_delete_keeps_filename_verbatim() {
        let action = ConfirmAction::DeleteImage {
            movie_id: "m1".into(),
            filename: "poster 1.jpg".into(),
        };
        match action.into_job() {
            ApiJob::DeleteMovieImage { filename, .. } => assert_eq!(filename, "poster 1.jpg"),
            other => panic!("unexpected job {other:?}"),
        }
    }
}
