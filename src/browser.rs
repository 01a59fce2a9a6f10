use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::protocol::cdp::Runtime;
use headless_chrome::{Browser, LaunchOptions, Tab};

use crate::config::BrowserConfig;
use crate::error::{Result, SlideshowError};
use crate::viewer::PageSession;

static KIOSK_ARGS: [&str; 2] = ["--disable-infobars", "--disable-dev-shm-usage"];

/// A visible Chrome window driven over the DevTools protocol.
pub struct ChromeSession {
    tab: Option<Arc<Tab>>,
    browser: Option<Browser>,
}

impl ChromeSession {
    /// `idle_timeout` must outlast the longest gap between two page calls,
    /// otherwise the DevTools connection is dropped mid-slideshow.
    pub fn launch(config: &BrowserConfig, idle_timeout: Duration) -> Result<Self> {
        let layout_args = config.layout.browser_args();
        let args: Vec<&OsStr> = KIOSK_ARGS
            .iter()
            .map(OsStr::new)
            .chain(layout_args.iter().map(OsStr::new))
            .collect();

        let options = LaunchOptions::default_builder()
            .headless(false) // the window is the slideshow
            .sandbox(false)  // --no-sandbox
            .path(config.chrome_path.clone())
            .idle_browser_timeout(idle_timeout)
            .args(args)
            .build()
            .map_err(|e| SlideshowError::Launch(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| SlideshowError::Launch(e.to_string()))?;
        let tab = browser.new_tab().map_err(|e| SlideshowError::Launch(e.to_string()))?; // the viewer is loaded here later
        log::info!("Browser launched");

        Ok(Self { tab: Some(tab), browser: Some(browser) })
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| SlideshowError::Script("browser already closed".to_string()))
    }
}

/// `name("a", "b")` with each argument as a JSON string literal.
fn call_expression(function: &str, args: &[String]) -> String {
    let literals: Vec<String> = args
        .iter()
        .map(|a| serde_json::Value::from(a.as_str()).to_string())
        .collect();
    format!("{}({})", function, literals.join(", "))
}

/// Page value of an evaluation, or the thrown exception as an error.
fn evaluation_value(returned: Runtime::EvaluateReturnObject) -> Result<Option<serde_json::Value>> {
    match returned.exception_details {
        Some(details) => {
            // description carries "ReferenceError: ..." with the stack, text is only "Uncaught"
            let message = details
                .exception
                .and_then(|e| e.description)
                .unwrap_or(details.text);
            Err(SlideshowError::Script(message))
        }
        None => Ok(returned.result.value),
    }
}

impl ChromeSession {
    /// Runtime.evaluate keeping the exception details that `Tab::evaluate` drops.
    fn evaluate(&self, expression: &str) -> Result<Option<serde_json::Value>> {
        // unset optional fields stay None
        let method: Runtime::Evaluate = serde_json::from_value(serde_json::json!({ "expression": expression }))
            .map_err(|e| SlideshowError::Script(e.to_string()))?;
        let returned = self
            .tab()?
            .call_method(method)
            .map_err(|e| SlideshowError::Script(e.to_string()))?;
        evaluation_value(returned)
    }
}

impl PageSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| SlideshowError::Script(format!("navigation to {url} failed: {e}")))?;
        Ok(())
    }

    fn evaluate_bool(&mut self, expression: &str) -> Result<bool> {
        let value = self.evaluate(expression)?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false)) // anything but `true` means not yet
    }

    fn call(&mut self, function: &str, args: &[String]) -> Result<()> {
        self.evaluate(&call_expression(function, args))?; // return value ignored, only exceptions matter
        Ok(())
    }

    fn close(&mut self) {
        self.tab = None;
        // Dropping the browser kills the Chrome process.
        self.browser = None;
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.close();
    }
}
