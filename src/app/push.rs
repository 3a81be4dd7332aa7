// src/app/push.rs
//
// Push-channel listener. The backend broadcasts JSON text frames of the
// shape `{"type": "movie" | "episode" | "quality", ...}`; each kind names
// the coarse identifiers of what changed. The listener runs a
// single-threaded tokio runtime on its own thread and forwards typed
// events to the UI over a std channel; a malformed frame is logged and
// skipped so later frames still go through.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::app::types::Movie;

/// All push message kinds the backend emits. Closed set; an unknown `type`
/// is a parse error the listener logs and drops.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PushMessage {
    /// Movie collection changed; carries the full refreshed snapshot.
    Movie {
        #[serde(default)]
        movies: Vec<Movie>,
    },
    /// Episodes of one movie changed; refetch that movie's episode list.
    Episode {
        #[serde(rename = "movieID", default)]
        movie_id: String,
    },
    /// Qualities of one (movie, episode, server) triple changed.
    Quality {
        #[serde(rename = "movieID", default)]
        movie_id: String,
        #[serde(rename = "episodeID", default)]
        episode_id: String,
        #[serde(rename = "serverID", default)]
        server_id: String,
    },
}

#[derive(Debug)]
pub enum PushEvent {
    Connected,
    Disconnected { error: String },
    Message(PushMessage),
}

pub fn parse_message(text: &str) -> Result<PushMessage, serde_json::Error> {
    serde_json::from_str(text)
}

pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Next reconnect delay: double, clamped to [`MAX_BACKOFF`].
pub(crate) fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Spawn the listener thread. It reconnects forever with backoff and stops
/// only when the UI side of the channel is gone.
pub fn spawn_listener(ws_url: String, tx: Sender<PushEvent>) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("push-listener".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("push listener: failed to build runtime: {e}");
                    return;
                }
            };
            rt.block_on(listen(ws_url, tx));
            debug!("push listener shutting down");
        })
        .expect("spawn push listener thread")
}

async fn listen(ws_url: String, tx: Sender<PushEvent>) {
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match connect_async(ws_url.as_str()).await {
            Ok((mut stream, _response)) => {
                info!("push channel connected at {ws_url}");
                backoff = INITIAL_BACKOFF;
                if tx.send(PushEvent::Connected).is_err() {
                    return;
                }

                while let Some(frame) = stream.next().await {
                    match frame {
                        Ok(Message::Text(text)) => match parse_message(&text) {
                            Ok(msg) => {
                                if tx.send(PushEvent::Message(msg)).is_err() {
                                    return;
                                }
                            }
                            Err(e) => {
                                // Keep the listener alive; the next frame
                                // must still be processed.
                                warn!("push channel: skipping malformed message: {e}");
                            }
                        },
                        Ok(Message::Ping(_) | Message::Pong(_)) => {
                            // Handled by tungstenite.
                        }
                        Ok(Message::Binary(_) | Message::Frame(_)) => {}
                        Ok(Message::Close(frame)) => {
                            info!("push channel closed by server: {frame:?}");
                            break;
                        }
                        Err(e) => {
                            warn!("push channel receive error: {e}");
                            break;
                        }
                    }
                }

                if tx
                    .send(PushEvent::Disconnected {
                        error: "connection lost".to_string(),
                    })
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => {
                debug!("push connect to {ws_url} failed: {e}");
                if tx
                    .send(PushEvent::Disconnected {
                        error: e.to_string(),
                    })
                    .is_err()
                {
                    return;
                }
            }
        }

        tokio::time::sleep(backoff).await;
        backoff = next_backoff(backoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_movie_snapshot() {
        let json = r#"{"type":"movie","message":"A new movie or update detected!",
            "movies":[{"ID":"abc","Title":"Solaris","MaxQuality":1080,"Status":1,
            "Sub":["English"],"Year":1972}]}"#;
        match parse_message(json).unwrap() {
            PushMessage::Movie { movies } => {
                assert_eq!(movies.len(), 1);
                assert_eq!(movies[0].id, "abc");
                assert_eq!(movies[0].title, "Solaris");
                assert_eq!(movies[0].max_quality, 1080);
            }
            other => panic!("expected movie, got {other:?}"),
        }
    }

    #[test]
    fn parse_episode_notification() {
        let json = r#"{"type":"episode","message":"A new episode was updated!","movieID":"m42"}"#;
        match parse_message(json).unwrap() {
            PushMessage::Episode { movie_id } => assert_eq!(movie_id, "m42"),
            other => panic!("expected episode, got {other:?}"),
        }
    }

    #[test]
    fn parse_quality_notification() {
        let json = r#"{"type":"quality","message":"An quality was updated!",
            "movieID":"m1","episodeID":"e2","serverID":"s3"}"#;
        match parse_message(json).unwrap() {
            PushMessage::Quality {
                movie_id,
                episode_id,
                server_id,
            } => {
                assert_eq!(movie_id, "m1");
                assert_eq!(episode_id, "e2");
                assert_eq!(server_id, "s3");
            }
            other => panic!("expected quality, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(parse_message(r#"{"type":"server","serverID":"s1"}"#).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_message("not json at all").is_err());
        assert!(parse_message("{\"type\":").is_err());
    }

    #[test]
    fn malformed_then_wellformed_sequence() {
        // The listener drops bad frames and keeps going; parsing is
        // stateless so a good frame after a bad one still succeeds.
        assert!(parse_message("garbage").is_err());
        assert!(parse_message(r#"{"type":"episode","movieID":"m1"}"#).is_ok());
    }

    #[test]
    fn backoff_doubles_and_clamps() {
        let mut d = INITIAL_BACKOFF;
        let expected = [1u64, 2, 4, 8, 16, 30, 30];
        for &secs in &expected {
            assert_eq!(d.as_secs(), secs);
            d = next_backoff(d);
        }
    }
}
