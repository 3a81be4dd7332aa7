// src/app/prefs.rs
use std::path::PathBuf;
use std::time::Duration;
use std::{fs, io};

impl crate::app::CinedeskApp {
    // ---- tiny flags ----
    pub(crate) fn mark_dirty(&mut self) {
        self.prefs_dirty = true;
    }

    pub(crate) fn maybe_save_prefs(&mut self) {
        // debounce a bit to avoid writing every frame
        if self.prefs_dirty && self.prefs_last_write.elapsed() >= Duration::from_millis(300) {
            if let Err(e) = self.save_prefs() {
                tracing::warn!("failed to save ui prefs: {e}");
            }
            self.prefs_dirty = false;
            self.prefs_last_write = std::time::Instant::now();
        }
    }

    // ---- load/save prefs ----
    pub(crate) fn load_prefs(&mut self) {
        let path = prefs_path();
        let Ok(txt) = fs::read_to_string(&path) else {
            return;
        };

        for line in txt.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else {
                continue;
            };
            let k = k.trim();
            let v = v.trim();

            match k {
                "search" => self.search_query = v.to_string(),
                "show_posters" => self.show_posters = matches!(v, "1" | "true" | "yes"),
                "quality_panel_w" => {
                    if let Ok(n) = v.parse::<f32>() {
                        self.quality_panel_width = n.clamp(260.0, 560.0);
                    }
                }
                _ => {}
            }
        }
    }

    pub(crate) fn save_prefs(&self) -> io::Result<()> {
        let path = prefs_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let txt = format!(
            "# cinedesk ui prefs\n\
             search={}\n\
             show_posters={}\n\
             quality_panel_w={:.1}\n",
            self.search_query,
            if self.show_posters { "1" } else { "0" },
            self.quality_panel_width,
        );

        fs::write(path, txt)
    }
}

pub fn prefs_path() -> PathBuf {
    crate::app::thumbs::cache_dir().join("ui_prefs.txt")
}
