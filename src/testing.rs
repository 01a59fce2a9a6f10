//! Browser and stop-signal stand-ins shared by unit tests.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::config::ViewerConfig;
use crate::error::{Result, SlideshowError};
use crate::stop::StopSignal;
use crate::viewer::PageSession;

#[derive(Debug, Default)]
pub struct PageLog {
    pub navigations: Vec<String>,
    pub updates: Vec<(String, String)>,
    pub closes: usize,
    pub stop_checks: usize,
}

#[derive(Clone)]
pub struct StubPage {
    log: Rc<RefCell<PageLog>>,
    loads: bool,
    has_update_function: bool,
    fail_on_update: Option<usize>,
}

impl StubPage {
    pub fn ready() -> Self {
        Self {
            log: Rc::default(),
            loads: true,
            has_update_function: true,
            fail_on_update: None,
        }
    }

    pub fn never_loads() -> Self {
        Self { loads: false, ..Self::ready() }
    }

    pub fn without_update_function() -> Self {
        Self { has_update_function: false, ..Self::ready() }
    }

    /// Script call number `n` (0-based) fails as if the browser went away.
    pub fn failing_update(n: usize) -> Self {
        Self { fail_on_update: Some(n), ..Self::ready() }
    }

    pub fn log(&self) -> Ref<'_, PageLog> {
        self.log.borrow()
    }

    /// Stop signal that trips once `updates` update calls have been made.
    pub fn stop_after(&self, updates: usize) -> StopAfter {
        StopAfter { log: Rc::clone(&self.log), updates }
    }
}

impl PageSession for StubPage {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.log.borrow_mut().navigations.push(url.to_string());
        Ok(())
    }

    fn evaluate_bool(&mut self, expression: &str) -> Result<bool> {
        if expression.starts_with("document.getElementById") {
            Ok(self.loads)
        } else if expression.starts_with("typeof") {
            Ok(self.has_update_function)
        } else {
            Err(SlideshowError::Script(format!("unexpected expression: {expression}")))
        }
    }

    fn call(&mut self, _function: &str, args: &[String]) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if self.fail_on_update == Some(log.updates.len()) {
            return Err(SlideshowError::Script("target closed".into()));
        }
        log.updates.push((args[0].clone(), args[1].clone()));
        Ok(())
    }

    fn close(&mut self) {
        self.log.borrow_mut().closes += 1;
    }
}

pub struct StopAfter {
    log: Rc<RefCell<PageLog>>,
    updates: usize,
}

impl StopSignal for StopAfter {
    fn is_stopped(&self) -> bool {
        let mut log = self.log.borrow_mut();
        log.stop_checks += 1;
        log.updates.len() >= self.updates
    }
}

pub fn quick_viewer_config() -> ViewerConfig {
    ViewerConfig {
        load_timeout: Duration::from_millis(20),
        ready_timeout: Duration::from_millis(20),
        poll_interval: Duration::from_millis(2),
        ..ViewerConfig::default()
    }
}
