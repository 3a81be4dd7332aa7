// src/app/ui/edit.rs
//
// Paints the active edit session's control in place of the cell content and
// reports whether a commit trigger fired inside the control. Outside-click
// handling (select blur, checklist close) lives with the caller, which knows
// the cell rect.

use eframe::egui as eg;

use crate::app::editor::{EditControl, EditSession};

/// Render the control; returns true when committing was requested from
/// within the control (Enter, blur, or a selection change).
pub(crate) fn session_control_ui(ui: &mut eg::Ui, session: &mut EditSession) -> bool {
    let grab_focus = session.take_focus();
    match &mut session.control {
        EditControl::Text(buffer) => {
            let resp = ui.add(eg::TextEdit::singleline(buffer).desired_width(180.0));
            if grab_focus {
                resp.request_focus();
            }
            // lost_focus covers both Enter and clicking away.
            resp.lost_focus()
        }
        EditControl::MultiText(buffer) => {
            let resp = ui.add(
                eg::TextEdit::multiline(buffer)
                    .desired_rows(3)
                    .desired_width(220.0),
            );
            if grab_focus {
                resp.request_focus();
            }
            let enter = ui.input(|i| i.key_pressed(eg::Key::Enter));
            resp.lost_focus() || (resp.has_focus() && enter)
        }
        EditControl::Select { options, selected } => {
            let mut changed = false;
            let current = options
                .iter()
                .find(|o| o.value == *selected)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| selected.to_string());
            eg::ComboBox::from_id_source("active_edit_select")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for opt in options.iter() {
                        if ui.selectable_value(selected, opt.value, &opt.label).clicked() {
                            changed = true;
                        }
                    }
                });
            changed
        }
        EditControl::GradeSelect { selected } => {
            let mut changed = false;
            eg::ComboBox::from_id_source("active_edit_grade")
                .selected_text(selected.clone())
                .show_ui(ui, |ui| {
                    for grade in EditSession::grade_options() {
                        if ui
                            .selectable_value(selected, grade.to_string(), *grade)
                            .clicked()
                        {
                            changed = true;
                        }
                    }
                });
            changed
        }
        EditControl::Checklist { choices } => {
            ui.vertical(|ui| {
                for (lang, checked) in choices.iter_mut() {
                    ui.checkbox(checked, lang.as_str());
                }
            });
            // Commit key works from anywhere inside the checklist; the
            // outside-click path is the caller's.
            ui.input(|i| i.key_pressed(eg::Key::Enter))
        }
    }
}

impl EditSession {
    /// Controls whose blur is approximated by a click outside the cell.
    /// Text controls rely on real focus loss instead.
    pub(crate) fn wants_outside_commit(&self) -> bool {
        matches!(
            self.control,
            EditControl::Select { .. } | EditControl::GradeSelect { .. } | EditControl::Checklist { .. }
        )
    }
}
