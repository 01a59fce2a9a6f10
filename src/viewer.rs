use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use url::Url;

use crate::config::ViewerConfig;
use crate::constants::*;
use crate::error::{Result, SlideshowError};
use crate::pairs::Pair;

/// A loaded browser page the bridge can drive.
pub trait PageSession {
    fn navigate(&mut self, url: &str) -> Result<()>;
    /// Evaluates a boolean expression in the page.
    fn evaluate_bool(&mut self, expression: &str) -> Result<bool>;
    /// Calls a global page function with string arguments.
    fn call(&mut self, function: &str, args: &[String]) -> Result<()>;
    fn close(&mut self);
}

/// Absolute, percent-encoded `file:///` URI; empty for an empty path.
pub fn file_uri(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        return String::new();
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    // Url percent-encodes '#', '?' and '%' and uses forward slashes on Windows too
    match Url::from_file_path(&absolute) {
        Ok(url) => url.into(),
        Err(()) => {
            let normalized = absolute.to_string_lossy().replace('\\', "/");
            format!("file:///{}", normalized.trim_start_matches('/'))
        }
    }
}

/// Directories probed for the viewer, bundled resources first.
fn viewer_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(base) = std::env::var_os(RESOURCE_DIR_ENV) {
        dirs.push(PathBuf::from(base));
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir.join("assets"));
        dirs.push(exe_dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join("assets"));
        dirs.push(cwd);
    }
    dirs
}

pub fn resolve_viewer_path(name: &str) -> Result<PathBuf> {
    find_in(name, &viewer_search_dirs())
}

fn find_in(name: &str, dirs: &[PathBuf]) -> Result<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(name);
        if candidate.is_file() { // first hit wins, bundled copy before working directory
            return Ok(std::path::absolute(&candidate)?);
        }
        log::debug!("viewer not at {}", candidate.display());
    }
    Err(SlideshowError::ViewerMissing {
        name: name.to_string(),
        searched: dirs.to_vec(),
    })
}

/// Re-runs `probe` until it returns true or `timeout` elapses.
/// Probe errors count as "not yet".
pub fn poll_until(timeout: Duration, interval: Duration, mut probe: impl FnMut() -> Result<bool>) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        match probe() {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => log::debug!("probe failed: {e}"), // page may still be navigating
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(interval.min(deadline - now)); // never sleep past the deadline
    }
}

/// Owns the browser session and speaks the two-image update protocol.
/// The session is closed exactly once, at the latest when the bridge is dropped.
pub struct ViewerBridge<S: PageSession> {
    session: S,
    config: ViewerConfig,
    closed: bool,
}

impl<S: PageSession> ViewerBridge<S> {
    /// Navigates to the viewer and waits for the load-confirmation element.
    pub fn connect(session: S, viewer_path: &Path, config: ViewerConfig) -> Result<Self> {
        let mut bridge = Self { session, config, closed: false };

        log::info!("Loading viewer from {}", viewer_path.display());
        bridge.session.navigate(&file_uri(viewer_path))?; // on error the bridge drops and closes the browser
        bridge.confirm_loaded()?;
        log::info!("Viewer loaded");

        Ok(bridge)
    }

    fn confirm_loaded(&mut self) -> Result<()> {
        let expression = format!(
            "document.getElementById({}) !== null",
            serde_json::Value::from(self.config.load_element_id.as_str())
        );
        let (timeout, interval) = (self.config.load_timeout, self.config.poll_interval);
        let session = &mut self.session;

        if poll_until(timeout, interval, || session.evaluate_bool(&expression)) {
            Ok(())
        } else {
            self.close();
            Err(SlideshowError::LoadTimeout {
                element: self.config.load_element_id.clone(),
                timeout,
            })
        }
    }

    fn wait_until_ready(&mut self) -> Result<()> {
        let expression = format!("typeof {} === 'function'", self.config.update_function);
        let (timeout, interval) = (self.config.ready_timeout, self.config.poll_interval);
        let session = &mut self.session;

        if poll_until(timeout, interval, || session.evaluate_bool(&expression)) {
            Ok(())
        } else {
            self.close(); // fatal, release the browser before reporting
            Err(SlideshowError::UpdateFunctionTimeout {
                function: self.config.update_function.clone(),
                timeout,
            })
        }
    }

    /// Puts `pair` on screen once the update function is callable.
    pub fn show(&mut self, pair: &Pair) -> Result<()> {
        self.wait_until_ready()?;

        let (first, second) = (pair.first_uri(), pair.second_uri());
        log::info!("Displaying: {} and {}", first, second);
        self.session.call(&self.config.update_function, &[first, second])
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.session.close();
            log::info!("Browser closed");
        }
    }
}

impl<S: PageSession> Drop for ViewerBridge<S> {
    fn drop(&mut self) {
        self.close();
    }
}
