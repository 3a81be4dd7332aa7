// src/app/editor.rs
//
// The inline field editor. One `EditSession` exists at a time; it is created
// when the user double-clicks an editable cell, owns whatever transient
// control state the field needs, and is destroyed on every exit path
// (successful commit, rejected commit left open for another attempt, or
// table rebuild). The commit guard makes Enter-then-blur fire the dispatch
// path exactly once.

use crate::app::types::{CommitValue, Field, FieldOwner, QUALITY_GRADES, SUB_LANGUAGES};
use crate::app::utils;

#[derive(Clone, Debug)]
pub struct SelectOption {
    pub value: i64,
    pub label: String,
}

#[derive(Clone, Debug)]
pub enum EditControl {
    /// Single-line text (title, slug).
    Text(String),
    /// Multi-line text (description, duration, video URL).
    MultiText(String),
    /// Closed numeric enumeration; `selected` compares numerically, never as
    /// a string, against the seeded current value.
    Select {
        options: Vec<SelectOption>,
        selected: i64,
    },
    /// Quality grade select (string-valued options).
    GradeSelect { selected: String },
    /// Whole-set replacement checklist (subtitles); takes over the cell.
    Checklist { choices: Vec<(String, bool)> },
}

/// Current value of the cell the edit starts from, pre-read from the record.
#[derive(Clone, Debug)]
pub enum Seed {
    Text(String),
    Int(i64),
    Set(Vec<String>),
}

pub struct EditSession {
    pub field: Field,
    pub owner: FieldOwner,
    pub control: EditControl,
    focus_requested: bool,
    committed: bool,
}

impl EditSession {
    /// Editor factory: build the control appropriate to `field`, populated
    /// from the current value.
    pub fn begin(field: Field, owner: FieldOwner, seed: Seed) -> Self {
        let control = match field {
            Field::Title | Field::Slug => EditControl::Text(seed.into_text()),
            Field::Description
            | Field::Duration
            | Field::QualityDescription
            | Field::QualityVideoUrl => EditControl::MultiText(seed.into_text()),
            Field::Status | Field::QualityStatus => {
                Self::select(&[(1, "Presently"), (2, "Hidden")], seed.into_int())
            }
            Field::Hotmovie => Self::select(&[(1, "Hot"), (2, "Normal")], seed.into_int()),
            Field::MaxQuality => Self::select(
                &[(1, "Cam"), (720, "HD"), (1080, "Full HD"), (1440, "2K"), (2160, "4K")],
                seed.into_int(),
            ),
            Field::Year => Self::numeric_select(utils::year_options(), seed.into_int()),
            Field::Numofep | Field::Season => {
                Self::numeric_select((1..=30).collect(), seed.into_int())
            }
            Field::QualityTitle => EditControl::GradeSelect {
                selected: seed.into_text(),
            },
            Field::Sub => {
                let current = seed.into_set();
                EditControl::Checklist {
                    choices: SUB_LANGUAGES
                        .iter()
                        .map(|lang| (lang.to_string(), current.iter().any(|s| s == lang)))
                        .collect(),
                }
            }
        };

        Self {
            field,
            owner,
            control,
            focus_requested: false,
            committed: false,
        }
    }

    fn select(pairs: &[(i64, &str)], current: i64) -> EditControl {
        EditControl::Select {
            options: pairs
                .iter()
                .map(|&(value, label)| SelectOption {
                    value,
                    label: label.to_string(),
                })
                .collect(),
            selected: current,
        }
    }

    fn numeric_select(values: Vec<i64>, current: i64) -> EditControl {
        EditControl::Select {
            options: values
                .into_iter()
                .map(|value| SelectOption {
                    value,
                    label: value.to_string(),
                })
                .collect(),
            selected: current,
        }
    }

    /// The control grabs input focus exactly once, on its first frame.
    pub fn take_focus(&mut self) -> bool {
        if self.focus_requested {
            return false;
        }
        self.focus_requested = true;
        true
    }

    /// Raw text for the validator. Select/checklist fields have none.
    pub fn raw_text(&self) -> Option<&str> {
        match &self.control {
            EditControl::Text(s) | EditControl::MultiText(s) => Some(s),
            _ => None,
        }
    }

    /// Value as it would be committed right now.
    pub fn value(&self) -> CommitValue {
        match &self.control {
            EditControl::Text(s) | EditControl::MultiText(s) => CommitValue::Text(s.clone()),
            // Mirrors a DOM select: the value crosses the boundary as text;
            // the dispatcher decides which fields coerce to integers.
            EditControl::Select { selected, .. } => CommitValue::Text(selected.to_string()),
            EditControl::GradeSelect { selected } => CommitValue::Text(selected.clone()),
            EditControl::Checklist { choices } => CommitValue::Set(
                choices
                    .iter()
                    .filter(|(_, checked)| *checked)
                    .map(|(lang, _)| lang.clone())
                    .collect(),
            ),
        }
    }

    /// Arm the commit. Returns `None` when this logical commit already fired
    /// (Enter immediately followed by the blur it causes, or a second blur
    /// while the request is in flight).
    pub fn try_commit(&mut self) -> Option<CommitValue> {
        if self.committed {
            return None;
        }
        self.committed = true;
        Some(self.value())
    }

    /// A failed commit leaves the control open and editable; re-arm it so
    /// the user can try again.
    pub fn reopen(&mut self) {
        self.committed = false;
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn is_checklist(&self) -> bool {
        matches!(self.control, EditControl::Checklist { .. })
    }

    /// True when this session edits the given cell.
    pub fn targets(&self, field: Field, owner: &FieldOwner) -> bool {
        self.field == field && &self.owner == owner
    }

    pub fn grade_options() -> &'static [&'static str] {
        &QUALITY_GRADES
    }
}

impl Seed {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Set(items) => utils::join_set(&items),
        }
    }

    fn into_int(self) -> i64 {
        match self {
            Self::Int(n) => n,
            Self::Text(s) => s.trim().parse().unwrap_or(0),
            Self::Set(_) => 0,
        }
    }

    fn into_set(self) -> Vec<String> {
        match self {
            Self::Set(items) => items,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_owner() -> FieldOwner {
        FieldOwner::Movie {
            movie_id: "m1".to_string(),
        }
    }

    #[test]
    fn commit_fires_once_per_session() {
        let mut s = EditSession::begin(Field::Title, movie_owner(), Seed::Text("Old Title".into()));
        assert!(s.try_commit().is_some());
        // The blur that follows Enter must not dispatch again.
        assert!(s.try_commit().is_none());
    }

    #[test]
    fn reopen_rearms_after_failure() {
        let mut s = EditSession::begin(Field::Slug, movie_owner(), Seed::Text("old-slug".into()));
        assert!(s.try_commit().is_some());
        s.reopen();
        assert!(s.try_commit().is_some());
    }

    #[test]
    fn select_preselects_numerically() {
        let s = EditSession::begin(Field::MaxQuality, movie_owner(), Seed::Int(720));
        match &s.control {
            EditControl::Select { selected, options } => {
                assert_eq!(*selected, 720);
                assert!(options.iter().any(|o| o.value == 2160 && o.label == "4K"));
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn select_value_crosses_as_text() {
        let s = EditSession::begin(Field::MaxQuality, movie_owner(), Seed::Int(1080));
        assert_eq!(s.value(), CommitValue::Text("1080".into()));
    }

    #[test]
    fn year_select_covers_range() {
        let s = EditSession::begin(Field::Year, movie_owner(), Seed::Int(2016));
        match &s.control {
            EditControl::Select { options, selected } => {
                assert_eq!(*selected, 2016);
                assert_eq!(options.first().map(|o| o.value), Some(2000));
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn checklist_seeds_membership() {
        let s = EditSession::begin(
            Field::Sub,
            movie_owner(),
            Seed::Set(vec!["English".into(), "Korean".into()]),
        );
        match &s.control {
            EditControl::Checklist { choices } => {
                let checked: Vec<&str> = choices
                    .iter()
                    .filter(|(_, c)| *c)
                    .map(|(l, _)| l.as_str())
                    .collect();
                assert_eq!(checked, ["English", "Korean"]);
                assert_eq!(choices.len(), SUB_LANGUAGES.len());
            }
            other => panic!("expected checklist, got {other:?}"),
        }
    }

    #[test]
    fn checklist_commits_whole_set() {
        let mut s = EditSession::begin(Field::Sub, movie_owner(), Seed::Set(vec!["English".into()]));
        if let EditControl::Checklist { choices } = &mut s.control {
            for (lang, checked) in choices.iter_mut() {
                *checked = lang == "Japanese" || lang == "Korean";
            }
        }
        assert_eq!(
            s.try_commit(),
            Some(CommitValue::Set(vec!["Japanese".into(), "Korean".into()]))
        );
    }

    #[test]
    fn grade_select_seeds_from_current_title() {
        let owner = FieldOwner::Quality {
            quality_id: "q1".into(),
            movie_id: "m1".into(),
            episode_id: "e1".into(),
            server_id: "s1".into(),
        };
        let s = EditSession::begin(Field::QualityTitle, owner, Seed::Text("FULL HD".into()));
        match &s.control {
            EditControl::GradeSelect { selected } => assert_eq!(selected, "FULL HD"),
            other => panic!("expected grade select, got {other:?}"),
        }
    }

    #[test]
    fn focus_is_requested_once() {
        let mut s = EditSession::begin(Field::Title, movie_owner(), Seed::Text(String::new()));
        assert!(s.take_focus());
        assert!(!s.take_focus());
    }
}
