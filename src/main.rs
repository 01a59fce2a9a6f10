use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

mod browser;
mod config;
mod constants;
mod driver;
mod error;
mod pairs;
mod rasterizer;
mod state;
mod stop;
#[cfg(test)]
mod testing;
mod viewer;

use crate::browser::ChromeSession;
use crate::config::{Profile, SlideshowConfig};
use crate::driver::{RunSummary, SlideshowDriver};
use crate::pairs::pair_up;
use crate::rasterizer::PageRasterizer;
use crate::stop::{AnyStop, STOP_KEY, StopKey, StopToken};
use crate::viewer::{ViewerBridge, resolve_viewer_path};

/// Shows a PDF two pages at a time in a browser window.
#[derive(Parser, Debug)]
#[command(name = "pdf-slideshow", version, about, long_about = None)]
struct Cli {
    /// PDF to display
    #[arg(long, value_name = "FILE", default_value = constants::PDF_PATH)]
    pdf: PathBuf,

    /// Directory the rendered pages are written to
    #[arg(long, value_name = "DIR", default_value = constants::OUTPUT_FOLDER)]
    output: PathBuf,

    /// Window placement and default interval
    #[arg(long, value_enum, default_value_t = Profile::SecondaryMonitor)]
    profile: Profile,

    /// Seconds each pair stays on screen (overrides the profile)
    #[arg(long, value_name = "SECS")]
    display_secs: Option<u64>,

    /// Viewer HTML file name, looked up next to the executable then in the working directory
    #[arg(long, value_name = "FILE", default_value = constants::VIEWER_FILE)]
    viewer: String,

    /// Chrome/Chromium binary (auto-detected if omitted)
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Render scale, 1.0 = 72 dpi
    #[arg(long, default_value_t = constants::RENDER_SCALE)]
    scale: f32,
}

impl Cli {
    fn into_config(self) -> SlideshowConfig {
        let mut config = SlideshowConfig::for_profile(self.profile);
        config.pdf_path = self.pdf;
        config.raster.output_dir = self.output;
        config.raster.scale = self.scale;
        config.viewer.viewer_file = self.viewer;
        config.browser.chrome_path = self.chrome;
        if let Some(secs) = self.display_secs {
            config.display_time = Duration::from_secs(secs);
        }
        config
    }
}

fn stop_signal() -> Result<AnyStop> {
    let token = StopToken::new();
    token.stop_on_ctrlc().context("Failed to install Ctrl-C handler")?;

    let mut stop = AnyStop::new().with(token);
    match StopKey::new(STOP_KEY) {
        Some(key) => stop = stop.with(key),
        None => log::warn!("Keyboard state unavailable, use Ctrl-C to stop"),
    }
    Ok(stop)
}

fn run(config: SlideshowConfig) -> Result<RunSummary> {
    let images = PageRasterizer::new(config.raster.clone())
        .rasterize(&config.pdf_path)
        .with_context(|| format!("Failed to rasterize {}", config.pdf_path.display()))?;
    let pairs = pair_up(&images);
    log::info!("{} pages, {} pairs", images.len(), pairs.len());

    let viewer_path = resolve_viewer_path(&config.viewer.viewer_file)?;
    let stop = stop_signal()?;

    let session = ChromeSession::launch(&config.browser, config.browser_idle_timeout())?;
    let bridge = ViewerBridge::connect(session, &viewer_path, config.viewer.clone())?;

    log::info!(
        "Slideshow started, {:?} per pair. Press '{:?}' or Ctrl-C to stop.",
        config.display_time,
        STOP_KEY
    );
    let summary = SlideshowDriver::new(bridge, stop, config.display_time).run(&pairs)?;
    Ok(summary)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();

    match run(config) {
        Ok(summary) => {
            log::info!(
                "Finished displaying images ({} full passes, {} updates)",
                summary.passes,
                summary.updates
            );
        }
        Err(e) => {
            log::error!("{e:#}");
            process::exit(1);
        }
    }
}
