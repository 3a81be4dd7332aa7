// src/app/ui.rs
pub(crate) mod edit;
pub(crate) mod episodes;
pub(crate) mod movies;
pub(crate) mod qualities;
pub(crate) mod toast;
pub(crate) mod topbar;

use eframe::egui as eg;

use crate::app::editor::Seed;
use crate::app::types::{Field, FieldOwner};
use crate::app::ui::toast::ConfirmAction;

/// Interactions collected while painting. Rendering borrows the table state
/// immutably, so anything that mutates app state or talks to the worker is
/// deferred and applied after the frame's panels are drawn.
pub(crate) enum UiAction {
    BeginEdit {
        field: Field,
        owner: FieldOwner,
        seed: Seed,
    },
    /// Commit trigger fired for the active edit session.
    CommitEdit,
    ShowEpisodes {
        movie_id: String,
    },
    ShowQualities {
        movie_id: String,
        episode_id: String,
        server_id: String,
    },
    MoveMovie {
        index: usize,
        delta: isize,
    },
    AskDelete(ConfirmAction),
    ReloadEpisodes,
    ReloadQualities,
}

/// True when a primary click landed this frame outside `rect`. Scoped to the
/// edit session that asks: once the session ends, nothing checks this any
/// more, so no handler can leak across sessions.
pub(crate) fn clicked_outside(ui: &eg::Ui, rect: eg::Rect) -> bool {
    ui.input(|i| {
        i.pointer.primary_clicked()
            && i.pointer
                .interact_pos()
                .is_some_and(|pos| !rect.contains(pos))
    })
}
