use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use device_query::{DeviceQuery, DeviceState, Keycode};

pub const STOP_KEY: Keycode = Keycode::C;
const INTERRUPT_EXIT_CODE: i32 = 130; // 128 + SIGINT

/// Polled by the driver before each pass and after each pair.
pub trait StopSignal {
    fn is_stopped(&self) -> bool;
}

/// Cancellation token shared with signal handlers.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token stopped; true if it already was.
    pub fn interrupt(&self) -> bool {
        self.stopped.swap(true, Ordering::SeqCst)
    }

    /// First Ctrl-C stops the slideshow after the current pair, a second one
    /// exits at once (a hung script call or readiness wait never returns).
    pub fn stop_on_ctrlc(&self) -> Result<(), ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            if token.interrupt() {
                log::warn!("Second interrupt, exiting now");
                process::exit(INTERRUPT_EXIT_CODE);
            }
            log::info!("Interrupt received, stopping after the current pair (Ctrl-C again to force)");
        })
    }
}

impl StopSignal for StopToken {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// True while the stop key is held down.
pub struct StopKey {
    device: DeviceState,
    key: Keycode,
}

impl StopKey {
    /// None when no keyboard state is reachable, e.g. without an X display.
    pub fn new(key: Keycode) -> Option<Self> {
        DeviceState::checked_new().map(|device| Self { device, key })
    }
}

impl StopSignal for StopKey {
    fn is_stopped(&self) -> bool {
        self.device.get_keys().contains(&self.key)
    }
}

/// Stops as soon as any of its signals does.
#[derive(Default)]
pub struct AnyStop {
    signals: Vec<Box<dyn StopSignal>>,
}

impl AnyStop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, signal: impl StopSignal + 'static) -> Self {
        self.signals.push(Box::new(signal));
        self
    }
}

impl StopSignal for AnyStop {
    fn is_stopped(&self) -> bool {
        self.signals.iter().any(|s| s.is_stopped())
    }
}
