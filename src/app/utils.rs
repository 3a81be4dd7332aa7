// src/app/utils.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// Identifiers lifted from server-rendered values sometimes arrive as the
/// stringified driver type, `ObjectID("<hex>")`. Strip the wrapper before
/// the id goes anywhere near a URL path or request body.
pub(crate) fn strip_object_id(raw: &str) -> String {
    static WRAPPED: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"^ObjectID\("(.*)"\)$"#).expect("object id pattern"));
    let trimmed = raw.trim();
    match WRAPPED.captures(trimmed) {
        Some(caps) => caps[1].to_string(),
        None => trimmed.to_string(),
    }
}

/// Human label for the movie `maxquality` tier.
pub(crate) const fn quality_tier_label(tier: i64) -> &'static str {
    match tier {
        1 => "Cam",
        720 => "HD",
        1080 => "Full HD",
        1440 => "2K",
        2160 => "4K",
        _ => "—",
    }
}

pub(crate) const fn status_label(status: i64) -> &'static str {
    match status {
        1 => "Presently",
        2 => "Hidden",
        _ => "—",
    }
}

pub(crate) const fn hot_label(flag: i64) -> &'static str {
    match flag {
        1 => "Hot",
        2 => "Normal",
        _ => "—",
    }
}

/// Comma-joined rendering for set-valued cells (subtitles, server lists).
pub(crate) fn join_set(items: &[String]) -> String {
    use itertools::Itertools;
    items.iter().join(", ")
}

/// Year options for the year select: 2000 up to the current year.
pub(crate) fn year_options() -> Vec<i64> {
    use chrono::Datelike;
    let now = chrono::Local::now().year() as i64;
    (2000..=now.max(2000)).collect()
}

/// Uploaded artwork URL for a stored filename. Filenames are operator
/// supplied and may contain spaces, so percent-encode them.
pub(crate) fn upload_url(base: &str, filename: &str) -> String {
    format!("{}/uploads/images/{}", base, urlencoding::encode(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_wrapped_object_id() {
        assert_eq!(strip_object_id(r#"ObjectID("abc123")"#), "abc123");
    }

    #[test]
    fn passes_bare_id_through() {
        assert_eq!(strip_object_id("662f1a"), "662f1a");
        assert_eq!(strip_object_id("  662f1a "), "662f1a");
    }

    #[test]
    fn does_not_strip_partial_wrapper() {
        // A value that merely mentions the wrapper is left alone.
        assert_eq!(strip_object_id(r#"xObjectID("a")"#), r#"xObjectID("a")"#);
    }

    #[test]
    fn tier_labels() {
        assert_eq!(quality_tier_label(1), "Cam");
        assert_eq!(quality_tier_label(1080), "Full HD");
        assert_eq!(quality_tier_label(2160), "4K");
        assert_eq!(quality_tier_label(42), "—");
    }

    #[test]
    fn joins_sets_in_order() {
        let items = ["English".to_string(), "Korean".to_string()];
        assert_eq!(join_set(&items), "English, Korean");
        assert_eq!(join_set(&[]), "");
    }

    #[test]
    fn year_options_span_to_current_year() {
        let years = year_options();
        assert_eq!(years[0], 2000);
        assert!(years.len() >= 25);
        assert_eq!(years.windows(2).filter(|w| w[1] != w[0] + 1).count(), 0);
    }

    #[test]
    fn upload_url_encodes_filename() {
        assert_eq!(
            upload_url("http://h:1", "a poster.jpg"),
            "http://h:1/uploads/images/a%20poster.jpg"
        );
    }
}
