use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::pairs::Pair;
use crate::state::SlideshowState;
use crate::stop::StopSignal;
use crate::viewer::{PageSession, ViewerBridge};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: usize,  // complete passes over all pairs
    pub updates: usize, // update calls sent to the viewer
}

pub struct SlideshowDriver<S: PageSession, T: StopSignal> {
    bridge: ViewerBridge<S>,
    stop: T,
    display_time: Duration,
    state: SlideshowState,
}

impl<S: PageSession, T: StopSignal> SlideshowDriver<S, T> {
    pub fn new(bridge: ViewerBridge<S>, stop: T, display_time: Duration) -> Self {
        Self {
            bridge,
            stop,
            display_time,
            state: SlideshowState::Running,
        }
    }

    /// Loops over `pairs` until the stop signal is seen, then closes the browser.
    pub fn run(mut self, pairs: &[Pair]) -> Result<RunSummary> {
        let result = self.run_loop(pairs);
        self.bridge.close();
        result
    }

    fn run_loop(&mut self, pairs: &[Pair]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        if pairs.is_empty() {
            log::warn!("No pages to display");
            self.state = SlideshowState::Stopped;
            return Ok(summary);
        }

        while self.state == SlideshowState::Running {
            // Checked once before every pass over the document
            if self.stop.is_stopped() {
                self.state = SlideshowState::Stopped;
                break;
            }

            let mut shown = 0;
            for pair in pairs {
                self.bridge.show(pair)?; // waits for updateImages() first
                shown += 1;
                summary.updates += 1;
                log::debug!("pair {}/{}", shown, pairs.len());

                thread::sleep(self.display_time); // stop key is not seen while sleeping

                // Checked again after each pair so we can leave mid-pass
                if self.stop.is_stopped() {
                    self.state = SlideshowState::Stopped;
                    break;
                }
            }

            // A pass cut short by the stop signal does not count
            if shown == pairs.len() {
                summary.passes += 1;
            }
        }

        log::info!("Slideshow stopped after {} updates", summary.updates);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlideshowError;
    use crate::pairs::pair_up;
    use crate::rasterizer::page_file_name;
    use crate::stop::StopToken;
    use crate::testing::{StubPage, quick_viewer_config};
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use std::time::Instant;

    fn rendered(n: usize) -> Vec<PathBuf> {
        (1..=n).map(|i| Path::new("/srv/pdf_pages").join(page_file_name(i))).collect()
    }

    fn driver<T: StopSignal>(page: &StubPage, stop: T) -> SlideshowDriver<StubPage, T> {
        timed_driver(page, stop, Duration::ZERO)
    }

    fn timed_driver<T: StopSignal>(page: &StubPage, stop: T, display_time: Duration) -> SlideshowDriver<StubPage, T> {
        let bridge = ViewerBridge::connect(page.clone(), Path::new("/srv/viewer.html"), quick_viewer_config()).unwrap();
        SlideshowDriver::new(bridge, stop, display_time)
    }

    /// Records when it was asked, stops on the `stop_on`-th check.
    struct StopClock {
        checks: Rc<RefCell<Vec<Instant>>>,
        stop_on: usize,
    }

    impl StopSignal for StopClock {
        fn is_stopped(&self) -> bool {
            let mut checks = self.checks.borrow_mut();
            checks.push(Instant::now());
            checks.len() >= self.stop_on
        }
    }

    fn uri(n: usize) -> String {
        format!("file:///srv/pdf_pages/page_{n}.png")
    }

    #[test]
    fn four_pages_show_two_updates_per_pass() {
        let page = StubPage::ready();
        let pairs = pair_up(&rendered(4));
        assert_eq!(pairs.len(), 2);

        // Third update is pair 1 again, then stop.
        let summary = driver(&page, page.stop_after(3)).run(&pairs).unwrap();

        assert_eq!(summary, RunSummary { passes: 1, updates: 3 });
        assert_eq!(
            page.log().updates,
            vec![(uri(1), uri(2)), (uri(3), uri(4)), (uri(1), uri(2))]
        );
    }

    #[test]
    fn five_pages_send_empty_second_uri_last() {
        let page = StubPage::ready();
        let pairs = pair_up(&rendered(5));

        let summary = driver(&page, page.stop_after(3)).run(&pairs).unwrap();

        assert_eq!(summary, RunSummary { passes: 1, updates: 3 });
        assert_eq!(
            page.log().updates,
            vec![(uri(1), uri(2)), (uri(3), uri(4)), (uri(5), String::new())]
        );
    }

    #[test]
    fn stop_mid_pass_sends_no_further_updates() {
        let page = StubPage::ready();
        let pairs = pair_up(&rendered(6));

        let summary = driver(&page, page.stop_after(1)).run(&pairs).unwrap();

        assert_eq!(summary, RunSummary { passes: 0, updates: 1 });
        assert_eq!(page.log().updates.len(), 1);
        assert_eq!(page.log().closes, 1);
    }

    #[test]
    fn stop_before_first_pass_shows_nothing() {
        let page = StubPage::ready();
        let token = StopToken::new();
        token.interrupt();

        let summary = driver(&page, token).run(&pair_up(&rendered(4))).unwrap();

        assert_eq!(summary.updates, 0);
        assert!(page.log().updates.is_empty());
        assert_eq!(page.log().closes, 1);
    }

    #[test]
    fn stop_is_checked_before_each_pass_and_after_each_pair() {
        let page = StubPage::ready();
        let pairs = pair_up(&rendered(4));

        driver(&page, page.stop_after(4)).run(&pairs).unwrap();

        // pass 1: before + 2 pairs, pass 2: before + 2 pairs
        assert_eq!(page.log().stop_checks, 6);
    }

    #[test]
    fn stop_is_checked_after_the_display_wait() {
        let page = StubPage::ready();
        let checks = Rc::new(RefCell::new(Vec::new()));
        let stop = StopClock { checks: Rc::clone(&checks), stop_on: 3 };
        let display_time = Duration::from_millis(40);

        let started = Instant::now();
        let summary = timed_driver(&page, stop, display_time).run(&pair_up(&rendered(4))).unwrap();

        assert_eq!(summary.updates, 2);
        let checks = checks.borrow();
        assert_eq!(checks.len(), 3);
        // before the pass: no sleep yet
        assert!(checks[0] - started < display_time);
        // after each pair: a full display interval since the previous check
        assert!(checks[1] - checks[0] >= display_time);
        assert!(checks[2] - checks[1] >= display_time);
    }

    #[test]
    fn session_closed_once_after_normal_stop() {
        let page = StubPage::ready();
        driver(&page, page.stop_after(2)).run(&pair_up(&rendered(3))).unwrap();
        assert_eq!(page.log().closes, 1);
    }

    #[test]
    fn missing_update_function_aborts_and_closes() {
        let page = StubPage::without_update_function();
        let err = driver(&page, page.stop_after(10)).run(&pair_up(&rendered(2))).unwrap_err();

        assert!(matches!(err, SlideshowError::UpdateFunctionTimeout { .. }));
        assert!(page.log().updates.is_empty());
        assert_eq!(page.log().closes, 1);
    }

    #[test]
    fn script_failure_propagates_and_closes() {
        let page = StubPage::failing_update(1);
        let err = driver(&page, page.stop_after(10)).run(&pair_up(&rendered(4))).unwrap_err();

        assert!(matches!(err, SlideshowError::Script(_)));
        assert_eq!(page.log().updates.len(), 1);
        assert_eq!(page.log().closes, 1);
    }

    #[test]
    fn empty_document_stops_immediately() {
        let page = StubPage::ready();
        let summary = driver(&page, page.stop_after(1)).run(&[]).unwrap();
        assert_eq!(summary, RunSummary::default());
        assert_eq!(page.log().closes, 1);
    }
}
