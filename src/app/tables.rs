// src/app/tables.rs
//
// Record state behind the three synced views. Tables are rebuilt wholesale
// from snapshots (initial fetch or push channel); inline commits mutate the
// matching record in place and leave a raw-text cell override that survives
// until the next full rebuild. Rendering reads this state; nothing here
// touches the UI.

use std::collections::HashMap;

use tracing::debug;

use crate::app::types::{
    CommitValue, Episode, Field, FieldOwner, Movie, PositionEntry, Quality,
};
use crate::app::utils::strip_object_id;

#[derive(Debug, Default)]
pub struct MovieRow {
    pub movie: Movie,
    /// Cells whose display was reconciled from a commit: raw committed text,
    /// not the human label. Cleared on every rebuild.
    pub overrides: HashMap<Field, String>,
}

#[derive(Debug, Default)]
pub struct MovieTable {
    pub rows: Vec<MovieRow>,
    /// A snapshot has been applied at least once (an empty catalog counts).
    pub loaded: bool,
    load_requested: bool,
}

impl MovieTable {
    /// Guard for the initial snapshot fetch: true exactly once per app
    /// session, no matter how often it is invoked. Later snapshots arrive
    /// only via the push channel.
    pub fn begin_initial_load(&mut self) -> bool {
        if self.load_requested {
            return false;
        }
        self.load_requested = true;
        true
    }

    /// Full rebuild: drop every row and every cell override.
    pub fn apply_snapshot(&mut self, movies: Vec<Movie>) {
        debug!("movie table rebuild: {} rows", movies.len());
        self.loaded = true;
        self.rows = movies
            .into_iter()
            .map(|movie| MovieRow {
                movie,
                overrides: HashMap::new(),
            })
            .collect();
    }

    pub fn row_mut_by_id(&mut self, movie_id: &str) -> Option<&mut MovieRow> {
        let wanted = strip_object_id(movie_id);
        self.rows
            .iter_mut()
            .find(|r| strip_object_id(&r.movie.id) == wanted)
    }

    /// Swap a row one step up or down. Returns false when the move falls
    /// off either end.
    pub fn move_row(&mut self, index: usize, delta: isize) -> bool {
        let Some(target) = index.checked_add_signed(delta) else {
            return false;
        };
        if index >= self.rows.len() || target >= self.rows.len() {
            return false;
        }
        self.rows.swap(index, target);
        true
    }

    /// The complete reorder payload: one entry per row, ranks dense 1..=N in
    /// current display order, ids normalized.
    pub fn position_payload(&self) -> Vec<PositionEntry> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| PositionEntry {
                id: strip_object_id(&row.movie.id),
                position: (i + 1) as i64,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct EpisodeTable {
    /// Movie whose episodes are currently shown.
    pub movie_id: Option<String>,
    pub rows: Vec<Episode>,
    /// Distinguishes "not fetched yet" from "fetched, none exist".
    pub loaded: bool,
}

impl EpisodeTable {
    pub fn apply_snapshot(&mut self, movie_id: String, episodes: Vec<Episode>) {
        self.movie_id = Some(strip_object_id(&movie_id));
        self.rows = episodes;
        self.loaded = true;
    }
}

#[derive(Debug, Default)]
pub struct QualityRow {
    pub quality: Quality,
    pub overrides: HashMap<Field, String>,
}

#[derive(Debug, Default)]
pub struct QualityPanel {
    /// (movie, episode, server) triple currently shown.
    pub key: Option<(String, String, String)>,
    pub rows: Vec<QualityRow>,
    pub loaded: bool,
}

impl QualityPanel {
    pub fn apply_snapshot(
        &mut self,
        movie_id: String,
        episode_id: String,
        server_id: String,
        qualities: Vec<Quality>,
    ) {
        self.key = Some((
            strip_object_id(&movie_id),
            strip_object_id(&episode_id),
            strip_object_id(&server_id),
        ));
        self.rows = qualities
            .into_iter()
            .map(|quality| QualityRow {
                quality,
                overrides: HashMap::new(),
            })
            .collect();
        self.loaded = true;
    }

    pub fn row_mut_by_id(&mut self, quality_id: &str) -> Option<&mut QualityRow> {
        let wanted = strip_object_id(quality_id);
        self.rows
            .iter_mut()
            .find(|r| strip_object_id(&r.quality.id) == wanted)
    }
}

#[derive(Debug, Default)]
pub struct Tables {
    pub movies: MovieTable,
    pub episodes: EpisodeTable,
    pub qualities: QualityPanel,
}

impl Tables {
    /// Reconcile a successful commit: mutate the owning record so later edit
    /// sessions seed from the committed value, and record the raw-text cell
    /// override the next rebuild will clear.
    pub fn apply_commit(&mut self, field: Field, owner: &FieldOwner, value: &CommitValue) {
        match owner {
            FieldOwner::Movie { movie_id } => {
                if let Some(row) = self.movies.row_mut_by_id(movie_id) {
                    apply_movie_value(&mut row.movie, field, value);
                    row.overrides.insert(field, value.rendered());
                }
            }
            FieldOwner::Quality { quality_id, .. } => {
                if let Some(row) = self.qualities.row_mut_by_id(quality_id) {
                    apply_quality_value(&mut row.quality, field, value);
                    row.overrides.insert(field, value.rendered());
                }
            }
        }
    }
}

fn parse_int(value: &CommitValue) -> i64 {
    match value {
        CommitValue::Text(s) => s.trim().parse().unwrap_or(0),
        CommitValue::Set(_) => 0,
    }
}

fn apply_movie_value(movie: &mut Movie, field: Field, value: &CommitValue) {
    match (field, value) {
        (Field::Title, CommitValue::Text(s)) => movie.title = s.clone(),
        (Field::Description, CommitValue::Text(s)) => movie.description = s.clone(),
        (Field::Duration, CommitValue::Text(s)) => movie.duration = s.clone(),
        (Field::Slug, CommitValue::Text(s)) => movie.slug = s.clone(),
        (Field::Status, _) => movie.status = parse_int(value),
        (Field::MaxQuality, _) => movie.max_quality = parse_int(value),
        (Field::Hotmovie, _) => movie.hotmovie = parse_int(value),
        (Field::Year, _) => movie.year = parse_int(value),
        (Field::Numofep, _) => movie.numofep = parse_int(value),
        (Field::Season, _) => movie.season = parse_int(value),
        (Field::Sub, CommitValue::Set(items)) => movie.sub = items.clone(),
        _ => {}
    }
}

fn apply_quality_value(quality: &mut Quality, field: Field, value: &CommitValue) {
    match (field, value) {
        (Field::QualityTitle, CommitValue::Text(s)) => quality.title = s.clone(),
        (Field::QualityDescription, CommitValue::Text(s)) => quality.description = s.clone(),
        (Field::QualityStatus, _) => quality.status = parse_int(value),
        (Field::QualityVideoUrl, CommitValue::Text(s)) => quality.videourl = s.clone(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            max_quality: 720,
            ..Default::default()
        }
    }

    fn table_with(ids: &[&str]) -> MovieTable {
        let mut t = MovieTable::default();
        t.apply_snapshot(ids.iter().map(|id| movie(id, "t")).collect());
        t
    }

    #[test]
    fn initial_load_happens_at_most_once() {
        let mut t = MovieTable::default();
        assert!(t.begin_initial_load());
        assert!(!t.begin_initial_load());
        assert!(!t.begin_initial_load());
    }

    #[test]
    fn rebuild_drops_overrides() {
        let mut tables = Tables::default();
        tables.movies.apply_snapshot(vec![movie("m1", "Old Title")]);
        tables.apply_commit(
            Field::Title,
            &FieldOwner::Movie {
                movie_id: "m1".into(),
            },
            &CommitValue::Text("New Title".into()),
        );
        assert!(!tables.movies.rows[0].overrides.is_empty());

        tables.movies.apply_snapshot(vec![movie("m1", "New Title")]);
        assert!(tables.movies.rows[0].overrides.is_empty());
    }

    #[test]
    fn reorder_payload_is_dense_and_complete() {
        let mut t = table_with(&["a", "b", "c", "d"]);
        assert!(t.move_row(2, -1));
        let payload = t.position_payload();
        assert_eq!(payload.len(), 4);
        let ids: Vec<&str> = payload.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b", "d"]);
        let positions: Vec<i64> = payload.iter().map(|p| p.position).collect();
        assert_eq!(positions, [1, 2, 3, 4]);
    }

    #[test]
    fn move_row_rejects_out_of_range() {
        let mut t = table_with(&["a", "b"]);
        assert!(!t.move_row(0, -1));
        assert!(!t.move_row(1, 1));
        assert!(!t.move_row(5, 1));
        assert_eq!(t.position_payload().len(), 2);
    }

    #[test]
    fn reorder_payload_normalizes_wrapped_ids() {
        let mut t = MovieTable::default();
        t.apply_snapshot(vec![movie(r#"ObjectID("abc123")"#, "t")]);
        assert_eq!(t.position_payload()[0].id, "abc123");
    }

    #[test]
    fn quality_tier_commit_reconciles_raw_value() {
        let mut tables = Tables::default();
        tables.movies.apply_snapshot(vec![movie("m1", "t")]);
        let owner = FieldOwner::Movie {
            movie_id: "m1".into(),
        };
        tables.apply_commit(Field::MaxQuality, &owner, &CommitValue::Text("1080".into()));

        let row = &tables.movies.rows[0];
        assert_eq!(row.movie.max_quality, 1080);
        // Reconciled cell shows the raw committed value, not "Full HD".
        assert_eq!(row.overrides.get(&Field::MaxQuality).unwrap(), "1080");
    }

    #[test]
    fn subtitle_commit_replaces_whole_set() {
        let mut tables = Tables::default();
        let mut m = movie("m1", "t");
        m.sub = vec!["English".into()];
        tables.movies.apply_snapshot(vec![m]);

        let owner = FieldOwner::Movie {
            movie_id: "m1".into(),
        };
        let value = CommitValue::Set(vec!["Japanese".into(), "Korean".into()]);
        tables.apply_commit(Field::Sub, &owner, &value);

        let row = &tables.movies.rows[0];
        assert_eq!(row.movie.sub, vec!["Japanese".to_string(), "Korean".to_string()]);
        assert_eq!(row.overrides.get(&Field::Sub).unwrap(), "Japanese, Korean");
    }

    #[test]
    fn commit_matches_wrapped_owner_id() {
        let mut tables = Tables::default();
        tables.movies.apply_snapshot(vec![movie("abc123", "Old")]);
        let owner = FieldOwner::Movie {
            movie_id: r#"ObjectID("abc123")"#.into(),
        };
        tables.apply_commit(Field::Title, &owner, &CommitValue::Text("New".into()));
        assert_eq!(tables.movies.rows[0].movie.title, "New");
    }

    #[test]
    fn episode_snapshot_marks_loaded_even_when_empty() {
        let mut t = EpisodeTable::default();
        assert!(!t.loaded);
        t.apply_snapshot("m1".into(), Vec::new());
        assert!(t.loaded);
        assert!(t.rows.is_empty());
        assert_eq!(t.movie_id.as_deref(), Some("m1"));
    }

    #[test]
    fn quality_commit_updates_record_and_override() {
        let mut tables = Tables::default();
        tables.qualities.apply_snapshot(
            "m1".into(),
            "e1".into(),
            "s1".into(),
            vec![Quality {
                id: "q1".into(),
                title: "HD".into(),
                status: 1,
                ..Default::default()
            }],
        );
        let owner = FieldOwner::Quality {
            quality_id: "q1".into(),
            movie_id: "m1".into(),
            episode_id: "e1".into(),
            server_id: "s1".into(),
        };
        tables.apply_commit(Field::QualityStatus, &owner, &CommitValue::Text("2".into()));
        let row = &tables.qualities.rows[0];
        assert_eq!(row.quality.status, 2);
        assert_eq!(row.overrides.get(&Field::QualityStatus).unwrap(), "2");
    }
}
