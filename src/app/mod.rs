// src/app/mod.rs — admin client shell: boot, channel polling, panel layout

// ---- Standard lib imports ----
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Instant;

// ---- Crates ----
use eframe::egui as eg;
use tracing::{debug, info, warn};

// ---- Local modules ----
pub mod api;
pub mod editor;
pub mod push;
pub mod tables;
pub mod thumbs;
pub mod types;
pub mod validate;
pub(crate) mod prefs;
pub(crate) mod ui;
pub(crate) mod utils;

use crate::config::{load_config, AppConfig};
use api::AdminApi;
use editor::EditSession;
use push::{PushEvent, PushMessage};
use tables::Tables;
use thumbs::ThumbCache;
use types::{ApiEvent, ApiJob, FieldOwner};
use ui::toast::{ConfirmAction, Toasts};
use ui::UiAction;

// ---- Tunables ----
pub(crate) const MAX_UPLOADS_PER_FRAME: usize = 4;
const MAX_EVENTS_PER_FRAME: usize = 32;

pub struct CinedeskApp {
    // config & boot
    cfg: AppConfig,
    did_init: bool,

    // record state behind the three synced views
    pub(crate) tables: Tables,

    // the single active inline-edit session, if any
    pub(crate) edit: Option<EditSession>,

    // selection context for episode loading
    pub(crate) selected_movie: Option<String>,

    // worker plumbing
    api_tx: Option<Sender<ApiJob>>,
    api_rx: Option<Receiver<ApiEvent>>,
    push_rx: Option<Receiver<PushEvent>>,
    pub(crate) push_connected: bool,

    // artwork
    pub(crate) thumbs: Option<ThumbCache>,

    // notifications
    pub(crate) toasts: Toasts,
    pub(crate) confirm: Option<ConfirmAction>,

    // ui prefs
    pub(crate) search_query: String,
    pub(crate) show_posters: bool,
    pub(crate) quality_panel_width: f32,
    pub(crate) prefs_dirty: bool,
    pub(crate) prefs_last_write: Instant,
}

impl Default for CinedeskApp {
    fn default() -> Self {
        Self {
            cfg: AppConfig::default(),
            did_init: false,

            tables: Tables::default(),
            edit: None,
            selected_movie: None,

            api_tx: None,
            api_rx: None,
            push_rx: None,
            push_connected: false,

            thumbs: None,

            toasts: Toasts::default(),
            confirm: None,

            search_query: String::new(),
            show_posters: true,
            quality_panel_width: 340.0,
            prefs_dirty: false,
            prefs_last_write: Instant::now(),
        }
    }
}

// ---------- methods ----------
impl CinedeskApp {
    /// First-frame setup: config, prefs, workers, push listener, and the
    /// one-shot initial movies fetch.
    fn ensure_init(&mut self) {
        if self.did_init {
            return;
        }
        self.did_init = true;

        self.cfg = load_config();
        self.load_prefs();

        let (job_tx, job_rx) = mpsc::channel::<ApiJob>();
        let (evt_tx, evt_rx) = mpsc::channel::<ApiEvent>();
        let _ = api::spawn_worker(AdminApi::new(self.cfg.api_base_url.clone()), job_rx, evt_tx);
        self.api_tx = Some(job_tx);
        self.api_rx = Some(evt_rx);

        let (push_tx, push_rx) = mpsc::channel::<PushEvent>();
        let _ = push::spawn_listener(self.cfg.ws_url.clone(), push_tx);
        self.push_rx = Some(push_rx);

        self.thumbs = Some(ThumbCache::new(self.cfg.poster_workers));

        // Initial snapshot fetch happens at most once per app session; the
        // guard holds even if init were re-entered.
        if self.tables.movies.begin_initial_load() {
            self.send_job(ApiJob::FetchMovies {
                query: self.cfg.movies_query.clone(),
            });
        }

        info!("cinedesk initialised against {}", self.cfg.api_base_url);
    }

    pub(crate) fn send_job(&self, job: ApiJob) {
        if let Some(tx) = &self.api_tx {
            if tx.send(job).is_err() {
                warn!("api worker is gone; dropping job");
            }
        }
    }

    /// Validate-then-dispatch for the active session. Rejection blocks the
    /// commit entirely (no request) and leaves the control editable.
    fn commit_active_edit(&mut self) {
        let Some(session) = self.edit.as_mut() else {
            return;
        };

        if let Some(raw) = session.raw_text() {
            if let Err(msg) = validate::validate(session.field.kind(), raw) {
                if !session.is_committed() {
                    self.toasts.error(msg);
                }
                return;
            }
        }

        let field = session.field;
        let owner = session.owner.clone();
        let Some(value) = session.try_commit() else {
            // Second trigger of the same logical commit (Enter then blur).
            return;
        };
        self.send_job(ApiJob::Commit { field, owner, value });
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::BeginEdit { field, owner, seed } => {
                self.edit = Some(EditSession::begin(field, owner, seed));
            }
            UiAction::CommitEdit => self.commit_active_edit(),
            UiAction::ShowEpisodes { movie_id } => {
                let id = utils::strip_object_id(&movie_id);
                self.selected_movie = Some(id.clone());
                self.send_job(ApiJob::FetchEpisodes { movie_id: id });
            }
            UiAction::ShowQualities {
                movie_id,
                episode_id,
                server_id,
            } => {
                self.send_job(ApiJob::FetchQualities {
                    movie_id,
                    episode_id,
                    server_id,
                });
            }
            UiAction::MoveMovie { index, delta } => {
                if self.tables.movies.move_row(index, delta) {
                    // Every sibling is re-ranked and the whole list goes up
                    // in one request.
                    let payload = self.tables.movies.position_payload();
                    self.send_job(ApiJob::UpdatePositions(payload));
                }
            }
            UiAction::AskDelete(action) => {
                self.confirm = Some(action);
            }
            UiAction::ReloadEpisodes => match self.selected_movie.clone() {
                Some(movie_id) => self.send_job(ApiJob::FetchEpisodes { movie_id }),
                None => self
                    .toasts
                    .error("No movie selected. Pick a movie row before loading episodes!"),
            },
            UiAction::ReloadQualities => match self.tables.qualities.key.clone() {
                Some((movie_id, episode_id, server_id)) => self.send_job(ApiJob::FetchQualities {
                    movie_id,
                    episode_id,
                    server_id,
                }),
                None => self
                    .toasts
                    .error("Server not selected. Pick a server badge before loading qualities!"),
            },
        }
    }

    /// Drop the active session when its table was rebuilt underneath it.
    fn drop_edit_for_rebuilt(&mut self, movie_table: bool) {
        let drop = self.edit.as_ref().is_some_and(|s| {
            matches!(
                (&s.owner, movie_table),
                (FieldOwner::Movie { .. }, true) | (FieldOwner::Quality { .. }, false)
            )
        });
        if drop {
            self.edit = None;
        }
    }

    fn poll_api_events(&mut self, ctx: &eg::Context) {
        let Some(rx) = self.api_rx.take() else {
            return;
        };
        let mut seen = 0usize;

        loop {
            if seen >= MAX_EVENTS_PER_FRAME {
                break;
            }
            match rx.try_recv() {
                Ok(event) => {
                    seen += 1;
                    self.handle_api_event(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("api worker channel closed");
                    break;
                }
            }
        }

        self.api_rx = Some(rx);
        if seen > 0 {
            ctx.request_repaint();
        }
    }

    fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::CommitOk { field, owner, value } => {
                self.tables.apply_commit(field, &owner, &value);
                if self.edit.as_ref().is_some_and(|s| s.targets(field, &owner)) {
                    self.edit = None;
                }
                let noun = match owner {
                    FieldOwner::Movie { .. } => "Movie",
                    FieldOwner::Quality { .. } => "Quality",
                };
                self.toasts.success(format!("{noun} updated successfully!"));
            }
            ApiEvent::CommitFailed { field, owner, error } => {
                // The control stays open; only a toast reports the failure.
                if let Some(session) = self.edit.as_mut() {
                    if session.targets(field, &owner) {
                        session.reopen();
                    }
                }
                self.toasts.error(error);
            }
            ApiEvent::Movies(movies) => {
                self.tables.movies.apply_snapshot(movies);
                self.drop_edit_for_rebuilt(true);
            }
            ApiEvent::Episodes { movie_id, episodes } => {
                self.tables.episodes.apply_snapshot(movie_id, episodes);
            }
            ApiEvent::Qualities {
                movie_id,
                episode_id,
                server_id,
                qualities,
            } => {
                self.tables
                    .qualities
                    .apply_snapshot(movie_id, episode_id, server_id, qualities);
                self.drop_edit_for_rebuilt(false);
            }
            ApiEvent::PositionsUpdated => {
                self.toasts.success("Position updated successfully!");
            }
            ApiEvent::Deleted { what } => {
                self.toasts.success(format!("{what} deleted successfully!"));
            }
            ApiEvent::Failed { action, error } => {
                self.toasts.error(format!("{action}: {error}"));
            }
        }
    }

    fn poll_push_events(&mut self, ctx: &eg::Context) {
        let Some(rx) = self.push_rx.take() else {
            return;
        };
        let mut seen = 0usize;

        loop {
            if seen >= MAX_EVENTS_PER_FRAME {
                break;
            }
            match rx.try_recv() {
                Ok(event) => {
                    seen += 1;
                    self.handle_push_event(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.push_connected = false;
                    break;
                }
            }
        }

        self.push_rx = Some(rx);
        if seen > 0 {
            ctx.request_repaint();
        }
    }

    fn handle_push_event(&mut self, event: PushEvent) {
        match event {
            PushEvent::Connected => {
                self.push_connected = true;
            }
            PushEvent::Disconnected { error } => {
                if self.push_connected {
                    debug!("push channel dropped: {error}");
                }
                self.push_connected = false;
            }
            PushEvent::Message(PushMessage::Movie { movies }) => {
                // The movie push carries the full snapshot; rebuild in place.
                self.tables.movies.apply_snapshot(movies);
                self.drop_edit_for_rebuilt(true);
            }
            PushEvent::Message(PushMessage::Episode { movie_id }) => {
                self.send_job(ApiJob::FetchEpisodes {
                    movie_id: utils::strip_object_id(&movie_id),
                });
            }
            PushEvent::Message(PushMessage::Quality {
                movie_id,
                episode_id,
                server_id,
            }) => {
                self.send_job(ApiJob::FetchQualities {
                    movie_id,
                    episode_id,
                    server_id,
                });
            }
        }
    }
}

// ========== App impl ==========
impl eframe::App for CinedeskApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        // Keep frames moving so channel polling never stalls.
        ctx.request_repaint();

        self.ensure_init();
        self.poll_api_events(ctx);
        self.poll_push_events(ctx);
        if let Some(thumbs) = self.thumbs.as_mut() {
            if thumbs.poll() > 0 {
                ctx.request_repaint();
            }
        }

        // Paint; interactions queue up and apply after the frame's panels.
        let mut actions: Vec<UiAction> = Vec::new();
        self.ui_render_topbar(ctx);
        self.ui_render_episodes(ctx, &mut actions);
        self.ui_render_qualities(ctx, &mut actions);
        self.ui_render_movies(ctx, &mut actions);
        for action in actions {
            self.apply_action(action);
        }

        self.ui_render_confirm(ctx);
        self.toasts.show(ctx);
        self.maybe_save_prefs();
    }
}
