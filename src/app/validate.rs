// src/app/validate.rs
//
// Pure pre-dispatch validation. A rejection blocks the commit entirely; the
// message goes straight into an error toast. Select and checklist fields are
// constrained by their controls and carry no validator.

use crate::app::types::Field;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed length 3..=100.
    Title,
    /// Trimmed length 3..=250 (descriptions, durations, video URLs).
    LongText,
    /// Non-empty after trim.
    Slug,
    /// Constrained by the control; always valid.
    Choice,
}

impl Field {
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Title => FieldKind::Title,
            Self::Description | Self::Duration | Self::QualityDescription | Self::QualityVideoUrl => {
                FieldKind::LongText
            }
            Self::Slug => FieldKind::Slug,
            Self::Status
            | Self::MaxQuality
            | Self::Hotmovie
            | Self::Year
            | Self::Numofep
            | Self::Season
            | Self::Sub
            | Self::QualityTitle
            | Self::QualityStatus => FieldKind::Choice,
        }
    }
}

pub fn validate(kind: FieldKind, raw: &str) -> Result<(), String> {
    let len = raw.trim().chars().count();
    match kind {
        FieldKind::Title => {
            if (3..=100).contains(&len) {
                Ok(())
            } else {
                Err("Title must be between 3 and 100 characters!".to_string())
            }
        }
        FieldKind::LongText => {
            if (3..=250).contains(&len) {
                Ok(())
            } else {
                Err("Text must be between 3 and 250 characters!".to_string())
            }
        }
        FieldKind::Slug => {
            if len > 0 {
                Ok(())
            } else {
                Err("Slug is required!".to_string())
            }
        }
        FieldKind::Choice => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate(FieldKind::Title, "Hi").is_err());
        assert!(validate(FieldKind::Title, "  Hi  ").is_err());
        assert!(validate(FieldKind::Title, "Her").is_ok());
        assert!(validate(FieldKind::Title, &"x".repeat(100)).is_ok());
        assert!(validate(FieldKind::Title, &"x".repeat(101)).is_err());
    }

    #[test]
    fn long_text_bounds() {
        assert!(validate(FieldKind::LongText, "ab").is_err());
        assert!(validate(FieldKind::LongText, "abc").is_ok());
        assert!(validate(FieldKind::LongText, &"y".repeat(250)).is_ok());
        assert!(validate(FieldKind::LongText, &"y".repeat(251)).is_err());
    }

    #[test]
    fn slug_requires_content() {
        assert!(validate(FieldKind::Slug, "   ").is_err());
        assert!(validate(FieldKind::Slug, "spirited-away").is_ok());
    }

    #[test]
    fn trimming_happens_before_length_check() {
        // 3 meaningful chars padded by whitespace passes.
        assert!(validate(FieldKind::Title, "  abc  ").is_ok());
    }

    #[test]
    fn choice_is_implicitly_valid() {
        assert!(validate(FieldKind::Choice, "").is_ok());
    }

    #[test]
    fn field_kind_mapping() {
        assert_eq!(Field::Title.kind(), FieldKind::Title);
        assert_eq!(Field::QualityVideoUrl.kind(), FieldKind::LongText);
        assert_eq!(Field::Duration.kind(), FieldKind::LongText);
        assert_eq!(Field::Sub.kind(), FieldKind::Choice);
        assert_eq!(Field::QualityTitle.kind(), FieldKind::Choice);
    }
}
