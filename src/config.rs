use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::constants::*;
use crate::rasterizer::RasterConfig;

/// Deployment variants of the same slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Profile {
    /// Fixed-size window moved onto a second display, long interval
    #[default]
    SecondaryMonitor,
    /// Maximized window on the current display, short interval
    Maximized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowLayout {
    Fixed { width: u32, height: u32, x: i32, y: i32 },
    Maximized,
}

impl WindowLayout {
    /// Chrome command-line flags placing the window.
    pub fn browser_args(&self) -> Vec<String> {
        match self {
            WindowLayout::Fixed { width, height, x, y } => vec![
                format!("--window-size={width},{height}"),
                format!("--window-position={x},{y}"),
            ],
            WindowLayout::Maximized => vec!["--start-maximized".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub layout: WindowLayout,
    pub chrome_path: Option<PathBuf>, // auto-detected when None
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub viewer_file: String,
    pub load_element_id: String,
    pub update_function: String,
    pub load_timeout: Duration,
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewer_file: VIEWER_FILE.to_string(),
            load_element_id: LOAD_ELEMENT_ID.to_string(),
            update_function: UPDATE_FUNCTION.to_string(),
            load_timeout: LOAD_TIMEOUT,
            ready_timeout: READY_TIMEOUT,
            poll_interval: POLL_INTERVAL,
        }
    }
}

/// Everything the slideshow needs, passed in at construction.
#[derive(Debug, Clone)]
pub struct SlideshowConfig {
    pub pdf_path: PathBuf,
    pub raster: RasterConfig,
    pub browser: BrowserConfig,
    pub viewer: ViewerConfig,
    pub display_time: Duration,
}

impl SlideshowConfig {
    pub fn for_profile(profile: Profile) -> Self {
        let (layout, display_time) = match profile {
            Profile::SecondaryMonitor => (
                WindowLayout::Fixed {
                    width: WINDOW_WIDTH,
                    height: WINDOW_HEIGHT,
                    x: WINDOW_X,
                    y: WINDOW_Y,
                },
                SECONDARY_DISPLAY_TIME,
            ),
            Profile::Maximized => (WindowLayout::Maximized, MAXIMIZED_DISPLAY_TIME),
        };

        Self {
            pdf_path: PathBuf::from(PDF_PATH),
            raster: RasterConfig::default(),
            browser: BrowserConfig { layout, chrome_path: None },
            viewer: ViewerConfig::default(),
            display_time,
        }
    }

    /// Longest silence the browser connection must tolerate: one display
    /// interval plus a readiness wait, with headroom.
    pub fn browser_idle_timeout(&self) -> Duration {
        self.display_time + self.viewer.ready_timeout + Duration::from_secs(30)
    }
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}
