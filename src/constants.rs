use std::time::Duration;

pub const PDF_PATH: &str = "document.pdf";          // Source document, relative to the working directory
pub const OUTPUT_FOLDER: &str = "pdf_pages";        // Where rendered pages are written
pub const VIEWER_FILE: &str = "viewer.html";        // Local HTML viewer resource
pub const RESOURCE_DIR_ENV: &str = "SLIDESHOW_RESOURCE_DIR"; // Overrides the bundled resource base

pub const PAGE_FILE_PREFIX: &str = "page_";         // page_1.png, page_2.png, ...
pub const PAGE_FILE_EXTENSION: &str = "png";
pub const RENDER_SCALE: f32 = 1.0;                  // 1.0 = one pixel per PDF point (72 dpi)

pub const LOAD_ELEMENT_ID: &str = "pdf-image1";     // Element whose presence confirms the page loaded
pub const UPDATE_FUNCTION: &str = "updateImages";   // Page-side update entry point

pub const LOAD_TIMEOUT: Duration = Duration::from_secs(10);
pub const READY_TIMEOUT: Duration = Duration::from_secs(10);
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

// Secondary monitor profile
pub const WINDOW_WIDTH: u32 = 1024;
pub const WINDOW_HEIGHT: u32 = 768;
pub const WINDOW_X: i32 = 1920;                     // Pushes the window onto a display right of a 1080p primary
pub const WINDOW_Y: i32 = 0;
pub const SECONDARY_DISPLAY_TIME: Duration = Duration::from_secs(60);

// Maximized profile
pub const MAXIMIZED_DISPLAY_TIME: Duration = Duration::from_secs(10);
