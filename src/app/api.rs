// src/app/api.rs
//
// HTTP side of the admin client: one shared blocking client, one dispatch
// worker thread draining jobs in FIFO order. Field commits therefore queue
// rather than race; see DESIGN.md.

use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::app::types::{
    ApiEvent, ApiJob, CommitValue, Episode, Field, FieldOwner, Movie, PositionEntry, Quality,
};
use crate::app::utils::strip_object_id;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response; carries the server-supplied message when present.
    #[error("{0}")]
    Server(String),

    /// Network-level failure (connect, read, TLS).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx response whose body did not parse as the expected JSON.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub struct AdminApi {
    base: String,
    client: Client,
}

impl AdminApi {
    pub fn new(base: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("cinedesk/admin")
            .pool_max_idle_per_host(8)
            .build()
            .unwrap_or_default();
        Self {
            base: base.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Commit one field update to the owning record's endpoint.
    pub fn commit_field(
        &self,
        field: Field,
        value: &CommitValue,
        owner: &FieldOwner,
    ) -> Result<(), ApiError> {
        let payload = commit_payload(field, value, owner);
        let url = self.url(&field_update_path(owner));
        debug!("commit {} -> {url}", field.wire_name());
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()?;
        read_body(resp).map(|_| ())
    }

    pub fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        #[derive(Deserialize)]
        struct MoviesResponse {
            #[serde(default)]
            movies: Vec<Movie>,
        }
        let resp = self.client.get(self.url(&format!("/admin/movies{query}"))).send()?;
        let body = read_body(resp)?;
        let parsed: MoviesResponse = serde_json::from_str(&body)?;
        Ok(parsed.movies)
    }

    /// `episodes` is null when the movie has none yet.
    pub fn fetch_episodes(&self, movie_id: &str) -> Result<Vec<Episode>, ApiError> {
        #[derive(Deserialize)]
        struct EpisodesResponse {
            episodes: Option<Vec<Episode>>,
        }
        let id = strip_object_id(movie_id);
        let resp = self
            .client
            .get(self.url(&format!("/admin/movies/{id}/episodes")))
            .send()?;
        let body = read_body(resp)?;
        let parsed: EpisodesResponse = serde_json::from_str(&body)?;
        Ok(parsed.episodes.unwrap_or_default())
    }

    pub fn fetch_qualities(
        &self,
        movie_id: &str,
        episode_id: &str,
        server_id: &str,
    ) -> Result<Vec<Quality>, ApiError> {
        #[derive(Deserialize)]
        struct QualitiesResponse {
            qualities: Option<Vec<Quality>>,
        }
        let (m, e, s) = (
            strip_object_id(movie_id),
            strip_object_id(episode_id),
            strip_object_id(server_id),
        );
        let resp = self
            .client
            .get(self.url(&format!("/admin/movies/{m}/episodes/{e}/server/{s}/qualities")))
            .send()?;
        let body = read_body(resp)?;
        let parsed: QualitiesResponse = serde_json::from_str(&body)?;
        Ok(parsed.qualities.unwrap_or_default())
    }

    /// Submit the complete ordered list; the server re-ranks every sibling.
    pub fn update_positions(&self, entries: &[PositionEntry]) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url("/admin/movie-update-position"))
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(entries)?)
            .send()?;
        let body = read_body(resp)?;
        // 2xx can still carry an application error here.
        if let Ok(value) = serde_json::from_str::<Value>(&body) {
            if let Some(err) = value.get("error").and_then(Value::as_str) {
                if !err.is_empty() {
                    return Err(ApiError::Server(err.to_string()));
                }
            }
        }
        Ok(())
    }

    pub fn delete_movie(&self, movie_id: &str) -> Result<(), ApiError> {
        let id = strip_object_id(movie_id);
        let resp = self
            .client
            .delete(self.url(&format!("/admin/delete-movie/{id}")))
            .send()?;
        read_body(resp).map(|_| ())
    }

    pub fn delete_episode(&self, episode_id: &str) -> Result<(), ApiError> {
        let id = strip_object_id(episode_id);
        let resp = self
            .client
            .delete(self.url(&format!("/admin/delete-episode/{id}")))
            .send()?;
        read_body(resp).map(|_| ())
    }

    pub fn delete_quality(&self, quality_id: &str) -> Result<(), ApiError> {
        let id = strip_object_id(quality_id);
        let resp = self
            .client
            .delete(self.url(&format!("/admin/delete-quality/{id}")))
            .send()?;
        read_body(resp).map(|_| ())
    }

    /// The image delete endpoint is form-encoded, not JSON.
    pub fn delete_movie_image(&self, movie_id: &str, filename: &str) -> Result<(), ApiError> {
        let id = strip_object_id(movie_id);
        let resp = self
            .client
            .post(self.url("/admin/delete-movie-image"))
            .form(&[("id", id.as_str()), ("filename", filename)])
            .send()?;
        read_body(resp).map(|_| ())
    }
}

/// Path the field update POSTs to; the record's own id always sits in the
/// path, normalized first.
pub(crate) fn field_update_path(owner: &FieldOwner) -> String {
    match owner {
        FieldOwner::Movie { movie_id } => {
            format!("/admin/update-movie-field/{}", strip_object_id(movie_id))
        }
        FieldOwner::Quality { quality_id, .. } => {
            // Endpoint spelling is the server's; reproduced verbatim.
            format!("/admin/update-qulity-field/{}", strip_object_id(quality_id))
        }
    }
}

/// Request body for a field commit. Movie updates carry `{field, value}`;
/// quality updates duplicate the full owner tuple into the body.
pub(crate) fn commit_payload(field: Field, value: &CommitValue, owner: &FieldOwner) -> Value {
    let wire = wire_value(field, value);
    match owner {
        FieldOwner::Movie { .. } => json!({
            "field": field.wire_name(),
            "value": wire,
        }),
        FieldOwner::Quality {
            quality_id,
            movie_id,
            episode_id,
            server_id,
        } => json!({
            "field": field.wire_name(),
            "value": wire,
            "qualityId": strip_object_id(quality_id),
            "movieId": strip_object_id(movie_id),
            "episodeId": strip_object_id(episode_id),
            "serverId": strip_object_id(server_id),
        }),
    }
}

fn wire_value(field: Field, value: &CommitValue) -> Value {
    match value {
        CommitValue::Set(items) => json!(items),
        CommitValue::Text(s) => {
            if field.coerces_numeric() {
                // Select-sourced; a non-numeric string here is a programming
                // error upstream, so fall back to sending it verbatim.
                match s.trim().parse::<i64>() {
                    Ok(n) => json!(n),
                    Err(_) => json!(s),
                }
            } else {
                json!(s)
            }
        }
    }
}

fn read_body(resp: reqwest::blocking::Response) -> Result<String, ApiError> {
    let status = resp.status();
    let text = resp.text()?;
    if status.is_success() {
        Ok(text)
    } else {
        Err(ApiError::Server(extract_message(&text)))
    }
}

/// Pull the server's `message`/`error` string out of an error body, with
/// the UI's generic fallback otherwise.
pub(crate) fn extract_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Something went wrong!".to_string())
}

/// Dispatch worker: drains jobs one at a time so two commits against the
/// same field cannot race each other.
pub fn spawn_worker(
    api: AdminApi,
    jobs: Receiver<ApiJob>,
    events: Sender<ApiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(job) = jobs.recv() {
            let event = run_job(&api, job);
            if events.send(event).is_err() {
                break;
            }
        }
        debug!("api worker shutting down");
    })
}

fn run_job(api: &AdminApi, job: ApiJob) -> ApiEvent {
    match job {
        ApiJob::Commit { field, owner, value } => match api.commit_field(field, &value, &owner) {
            Ok(()) => ApiEvent::CommitOk { field, owner, value },
            Err(e) => {
                warn!("field commit failed: {e}");
                ApiEvent::CommitFailed {
                    field,
                    owner,
                    error: e.to_string(),
                }
            }
        },
        ApiJob::FetchMovies { query } => match api.fetch_movies(&query) {
            Ok(movies) => ApiEvent::Movies(movies),
            Err(e) => failed("fetch movies", e),
        },
        ApiJob::FetchEpisodes { movie_id } => match api.fetch_episodes(&movie_id) {
            Ok(episodes) => ApiEvent::Episodes { movie_id, episodes },
            Err(e) => failed("fetch episodes", e),
        },
        ApiJob::FetchQualities {
            movie_id,
            episode_id,
            server_id,
        } => match api.fetch_qualities(&movie_id, &episode_id, &server_id) {
            Ok(qualities) => ApiEvent::Qualities {
                movie_id,
                episode_id,
                server_id,
                qualities,
            },
            Err(e) => failed("fetch qualities", e),
        },
        ApiJob::UpdatePositions(entries) => match api.update_positions(&entries) {
            Ok(()) => ApiEvent::PositionsUpdated,
            Err(e) => failed("update positions", e),
        },
        ApiJob::DeleteMovie { movie_id } => match api.delete_movie(&movie_id) {
            Ok(()) => ApiEvent::Deleted { what: "Movie" },
            Err(e) => failed("delete movie", e),
        },
        ApiJob::DeleteEpisode { episode_id } => match api.delete_episode(&episode_id) {
            Ok(()) => ApiEvent::Deleted { what: "Episode" },
            Err(e) => failed("delete episode", e),
        },
        ApiJob::DeleteQuality { quality_id } => match api.delete_quality(&quality_id) {
            Ok(()) => ApiEvent::Deleted { what: "Quality" },
            Err(e) => failed("delete quality", e),
        },
        ApiJob::DeleteMovieImage { movie_id, filename } => {
            match api.delete_movie_image(&movie_id, &filename) {
                Ok(()) => ApiEvent::Deleted { what: "Image" },
                Err(e) => failed("delete image", e),
            }
        }
    }
}

fn failed(action: &'static str, e: ApiError) -> ApiEvent {
    warn!("{action} failed: {e}");
    ApiEvent::Failed {
        action,
        error: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality_owner() -> FieldOwner {
        FieldOwner::Quality {
            quality_id: r#"ObjectID("q1")"#.to_string(),
            movie_id: "m1".to_string(),
            episode_id: "e1".to_string(),
            server_id: "s1".to_string(),
        }
    }

    #[test]
    fn movie_numeric_fields_serialize_as_integers() {
        let owner = FieldOwner::Movie {
            movie_id: "m1".into(),
        };
        let payload = commit_payload(Field::MaxQuality, &CommitValue::Text("1080".into()), &owner);
        assert_eq!(payload["field"], "maxquality");
        assert_eq!(payload["value"], json!(1080));
        assert!(payload["value"].is_i64());
    }

    #[test]
    fn movie_text_fields_stay_strings() {
        let owner = FieldOwner::Movie {
            movie_id: "m1".into(),
        };
        let payload = commit_payload(Field::Title, &CommitValue::Text("Stalker".into()), &owner);
        assert_eq!(payload, json!({"field": "title", "value": "Stalker"}));
    }

    #[test]
    fn subtitle_set_serializes_as_array() {
        let owner = FieldOwner::Movie {
            movie_id: "m1".into(),
        };
        let value = CommitValue::Set(vec!["English".into(), "Korean".into()]);
        let payload = commit_payload(Field::Sub, &value, &owner);
        assert_eq!(payload["value"], json!(["English", "Korean"]));
    }

    #[test]
    fn quality_payload_carries_full_owner_tuple() {
        let payload = commit_payload(
            Field::QualityStatus,
            &CommitValue::Text("2".into()),
            &quality_owner(),
        );
        assert_eq!(payload["qualityId"], "q1"); // wrapper stripped
        assert_eq!(payload["movieId"], "m1");
        assert_eq!(payload["episodeId"], "e1");
        assert_eq!(payload["serverId"], "s1");
        // The quality endpoint takes select values as strings.
        assert_eq!(payload["value"], json!("2"));
    }

    #[test]
    fn update_paths_normalize_ids() {
        let movie = FieldOwner::Movie {
            movie_id: r#"ObjectID("abc123")"#.into(),
        };
        assert_eq!(field_update_path(&movie), "/admin/update-movie-field/abc123");
        assert_eq!(
            field_update_path(&quality_owner()),
            "/admin/update-qulity-field/q1"
        );
    }

    #[test]
    fn position_entries_serialize_with_server_casing() {
        let entries = vec![
            PositionEntry {
                id: "a".into(),
                position: 1,
            },
            PositionEntry {
                id: "b".into(),
                position: 2,
            },
        ];
        assert_eq!(
            serde_json::to_value(&entries).unwrap(),
            json!([{"ID": "a", "Position": 1}, {"ID": "b", "Position": 2}])
        );
    }

    #[test]
    fn extract_message_prefers_server_text() {
        assert_eq!(extract_message(r#"{"message":"Invalid movie ID"}"#), "Invalid movie ID");
        assert_eq!(extract_message(r#"{"error":"nope"}"#), "nope");
        assert_eq!(extract_message("<html>502</html>"), "Something went wrong!");
        assert_eq!(extract_message(""), "Something went wrong!");
    }
}
