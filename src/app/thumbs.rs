// src/app/thumbs.rs
//
// Artwork thumbnails for the admin tables. Poster files live on the backend
// under /uploads/images/; we fetch them once, shrink them to list size and
// keep them on disk keyed by md5(url). Downloads run on a small worker pool
// so the UI thread never blocks; textures are uploaded lazily with a
// per-frame budget.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, Once, OnceLock};
use std::time::{Duration, SystemTime};

use eframe::egui::{self as eg, TextureHandle};
use image::ImageFormat;
use reqwest::blocking::Client;
use tracing::{debug, warn};

const THUMB_MAX_W: u32 = 96;
const THUMB_MAX_H: u32 = 144;
const RETENTION_DAYS: u64 = 30;
const RETENTION_SECS: u64 = RETENTION_DAYS * 24 * 60 * 60;

static CACHE_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static THUMB_PRUNE_ONCE: Once = Once::new();

pub fn cache_dir() -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let cfg = crate::config::load_config();
            let path = PathBuf::from(cfg.cache_dir.unwrap_or_else(|| ".cinedesk_cache".to_string()));
            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create cache dir {}: {e}", path.display());
            }
            path
        })
        .clone()
}

fn thumb_dir() -> PathBuf {
    let dir = cache_dir().join("thumbs");
    if let Err(e) = fs::create_dir_all(&dir) {
        warn!("failed to create thumb dir {}: {e}", dir.display());
    }
    THUMB_PRUNE_ONCE.call_once({
        let dir = dir.clone();
        move || match prune_thumbs_in_dir(&dir) {
            Ok(0) => {}
            Ok(n) => debug!("pruned {n} stale thumbnails"),
            Err(e) => warn!("thumb prune failed: {e}"),
        }
    });
    dir
}

/// Drop cached thumbnails older than the retention window.
fn prune_thumbs_in_dir(dir: &Path) -> std::io::Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(RETENTION_SECS))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let modified = entry.metadata()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if modified < cutoff {
            let _ = fs::remove_file(entry.path());
            removed += 1;
        }
    }
    Ok(removed)
}

pub(crate) fn thumb_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

pub(crate) fn thumb_file_name(key: &str) -> String {
    format!("{key}.jpg")
}

fn find_cached(key: &str) -> Option<PathBuf> {
    let p = thumb_dir().join(thumb_file_name(key));
    p.exists().then_some(p)
}

/// Fetch, shrink, re-encode as JPEG, write tmp-then-rename.
fn download_and_store(client: &Client, url: &str, key: &str) -> Result<PathBuf, String> {
    let resp = client.get(url).send().map_err(|e| format!("GET {url}: {e}"))?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {} for {url}", resp.status()));
    }
    let body = resp.bytes().map_err(|e| format!("read body: {e}"))?;

    let img = image::load_from_memory(&body).map_err(|e| format!("decode {url}: {e}"))?;
    let small = img.thumbnail(THUMB_MAX_W, THUMB_MAX_H);

    let out = thumb_dir().join(thumb_file_name(key));
    let tmp = out.with_extension("tmp");
    let mut jpeg: Vec<u8> = Vec::new();
    small
        .to_rgb8()
        .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|e| format!("encode jpeg: {e}"))?;
    let mut f = fs::File::create(&tmp).map_err(|e| format!("create {}: {e}", tmp.display()))?;
    f.write_all(&jpeg).map_err(|e| format!("write {}: {e}", tmp.display()))?;
    drop(f);
    fs::rename(&tmp, &out).map_err(|e| format!("rename {}: {e}", out.display()))?;
    Ok(out)
}

struct ThumbDone {
    key: String,
    result: Result<PathBuf, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ThumbState {
    Pending,
    Failed,
}

pub struct ThumbCache {
    work_tx: Sender<(String, String)>, // (key, url)
    done_rx: Receiver<ThumbDone>,
    paths: HashMap<String, PathBuf>,
    textures: HashMap<String, TextureHandle>,
    states: HashMap<String, ThumbState>,
}

impl ThumbCache {
    pub fn new(workers: usize) -> Self {
        let (work_tx, work_rx) = mpsc::channel::<(String, String)>();
        let (done_tx, done_rx) = mpsc::channel::<ThumbDone>();
        let work_rx = Arc::new(Mutex::new(work_rx));

        // One shared client across the pool (connection pooling, keep-alive).
        let client = Arc::new(
            Client::builder()
                .user_agent("cinedesk/thumbs")
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_default(),
        );

        for _ in 0..workers.max(1) {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);
            std::thread::spawn(move || loop {
                let job = {
                    let rx = work_rx.lock().expect("thumb work queue poisoned");
                    rx.recv()
                };
                let (key, url) = match job {
                    Ok(t) => t,
                    Err(_) => break,
                };
                let result = download_and_store(&client, &url, &key);
                if done_tx.send(ThumbDone { key, result }).is_err() {
                    break;
                }
            });
        }

        Self {
            work_tx,
            done_rx,
            paths: HashMap::new(),
            textures: HashMap::new(),
            states: HashMap::new(),
        }
    }

    /// Queue a fetch for this url unless it is already known. Cheap enough
    /// to call for every visible row every frame.
    pub fn request(&mut self, url: &str) {
        let key = thumb_key(url);
        if self.paths.contains_key(&key) || self.states.contains_key(&key) {
            return;
        }
        if let Some(p) = find_cached(&key) {
            self.paths.insert(key, p);
            return;
        }
        self.states.insert(key.clone(), ThumbState::Pending);
        let _ = self.work_tx.send((key, url.to_string()));
    }

    /// Drain worker completions. Returns how many arrived (callers repaint
    /// when nonzero).
    pub fn poll(&mut self) -> usize {
        let mut drained = 0usize;
        loop {
            match self.done_rx.try_recv() {
                Ok(done) => {
                    drained += 1;
                    match done.result {
                        Ok(path) => {
                            self.states.remove(&done.key);
                            self.paths.insert(done.key, path);
                        }
                        Err(e) => {
                            debug!("thumb fetch failed: {e}");
                            self.states.insert(done.key, ThumbState::Failed);
                        }
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }

    /// Texture for a fetched thumbnail. Uploads at most `uploads_left`
    /// textures per frame across all calls; returns None while the file is
    /// still in flight.
    pub fn texture_for(
        &mut self,
        ctx: &eg::Context,
        url: &str,
        uploads_left: &mut usize,
    ) -> Option<TextureHandle> {
        let key = thumb_key(url);
        if let Some(tex) = self.textures.get(&key) {
            return Some(tex.clone());
        }
        if *uploads_left == 0 {
            return None;
        }
        let path = self.paths.get(&key)?;
        match load_color_image(path) {
            Ok(img) => {
                let tex = ctx.load_texture(key.clone(), img, eg::TextureOptions::LINEAR);
                self.textures.insert(key, tex.clone());
                *uploads_left -= 1;
                Some(tex)
            }
            Err(e) => {
                warn!("thumb decode failed for {}: {e}", path.display());
                self.paths.remove(&key);
                self.states.insert(key, ThumbState::Failed);
                None
            }
        }
    }
}

fn load_color_image(path: &Path) -> Result<eg::ColorImage, String> {
    let img = image::open(path).map_err(|e| format!("open {}: {e}", path.display()))?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(eg::ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        rgba.as_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_md5_hex() {
        let k = thumb_key("http://h/uploads/images/a.jpg");
        assert_eq!(k.len(), 32);
        assert!(k.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(k, thumb_key("http://h/uploads/images/a.jpg"));
        assert_ne!(k, thumb_key("http://h/uploads/images/b.jpg"));
    }

    #[test]
    fn file_name_uses_jpeg_extension() {
        assert_eq!(thumb_file_name("deadbeef"), "deadbeef.jpg");
    }

    #[test]
    fn prune_keeps_fresh_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("fresh.jpg");
        fs::write(&file, b"x").unwrap();
        let removed = prune_thumbs_in_dir(dir.path()).unwrap();
        assert_eq!(removed, 0);
        assert!(file.exists());
    }
}
