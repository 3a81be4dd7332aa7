// src/main.rs
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn pick_renderer() -> eframe::Renderer {
    match env::var("CINEDESK_RENDERER").as_deref() {
        Ok("glow") => eframe::Renderer::Glow,
        Ok("wgpu") => eframe::Renderer::Wgpu,
        _ => {
            // Default: Windows = WGPU (DX12), Others = Glow (GL)
            #[cfg(target_os = "windows")]
            { eframe::Renderer::Wgpu }
            #[cfg(not(target_os = "windows"))]
            { eframe::Renderer::Glow }
        }
    }
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    info!("cinedesk starting (pid {})", std::process::id());

    let options = eframe::NativeOptions {
        renderer: pick_renderer(),
        multisampling: 0,
        ..Default::default()
    };

    match eframe::run_native(
        "Cinedesk Catalog Admin",
        options,
        Box::new(|_cc| Ok(Box::new(cinedesk::app::CinedeskApp::default()))),
    ) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: try CINEDESK_RENDERER=wgpu or glow if the default backend fails.");
            Err(e)
        }
    }
}
