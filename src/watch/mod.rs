//! Change dispatch: extension filtering and per-path debouncing
//!
//! Editors fire several filesystem notifications for a single save. The
//! dispatcher collapses that noise to at most one analysis trigger per
//! meaningful edit: events for non-watched extensions are discarded, and a
//! second event for the same path inside the debounce window is dropped.
//!
//! The debounce table is owned by the dispatcher's task alone; nothing else
//! reads or writes it. State for one path never affects another.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct ChangeDispatcher {
    last_accepted: HashMap<PathBuf, Instant>,
    interval: Duration,
    extensions: HashSet<String>,
}

impl ChangeDispatcher {
    pub fn new(extensions: impl IntoIterator<Item = String>, interval: Duration) -> Self {
        Self {
            last_accepted: HashMap::new(),
            interval,
            extensions: extensions.into_iter().collect(),
        }
    }

    /// Decide whether an event for `path` observed now triggers analysis
    pub fn accept(&mut self, path: &Path) -> bool {
        self.accept_at(path, Instant::now())
    }

    /// Decision point with an injected clock.
    ///
    /// Accepting updates the debounce table; rejecting leaves it untouched,
    /// so a burst of saves only extends the window from its first accepted
    /// event.
    pub fn accept_at(&mut self, path: &Path, now: Instant) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !self.extensions.contains(ext) {
            return false;
        }

        if let Some(last) = self.last_accepted.get(path) {
            if now.duration_since(*last) <= self.interval {
                return false;
            }
        }
        self.last_accepted.insert(path.to_path_buf(), now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> ChangeDispatcher {
        ChangeDispatcher::new(
            ["py".to_string(), "rs".to_string()],
            Duration::from_millis(1000),
        )
    }

    #[test]
    fn unlisted_extensions_are_discarded() {
        let mut d = dispatcher();
        assert!(!d.accept_at(Path::new("/w/notes.md"), Instant::now()));
        assert!(!d.accept_at(Path::new("/w/Makefile"), Instant::now()));
        assert!(d.accept_at(Path::new("/w/main.py"), Instant::now()));
    }

    #[test]
    fn second_event_inside_window_is_dropped() {
        let mut d = dispatcher();
        let t0 = Instant::now();
        assert!(d.accept_at(Path::new("/w/a.py"), t0));
        assert!(!d.accept_at(Path::new("/w/a.py"), t0 + Duration::from_millis(300)));
        assert!(!d.accept_at(Path::new("/w/a.py"), t0 + Duration::from_millis(1000)));
    }

    #[test]
    fn event_after_window_is_accepted() {
        let mut d = dispatcher();
        let t0 = Instant::now();
        assert!(d.accept_at(Path::new("/w/a.py"), t0));
        assert!(d.accept_at(Path::new("/w/a.py"), t0 + Duration::from_millis(1001)));
    }

    #[test]
    fn paths_debounce_independently() {
        let mut d = dispatcher();
        let t0 = Instant::now();
        assert!(d.accept_at(Path::new("/w/a.py"), t0));
        // Different file inside a's window still dispatches.
        assert!(d.accept_at(Path::new("/w/b.rs"), t0 + Duration::from_millis(10)));
        assert!(!d.accept_at(Path::new("/w/a.py"), t0 + Duration::from_millis(20)));
    }

    #[test]
    fn rejected_events_do_not_extend_the_window() {
        let mut d = dispatcher();
        let t0 = Instant::now();
        assert!(d.accept_at(Path::new("/w/a.py"), t0));
        assert!(!d.accept_at(Path::new("/w/a.py"), t0 + Duration::from_millis(900)));
        // Window is measured from t0, not from the rejected event.
        assert!(d.accept_at(Path::new("/w/a.py"), t0 + Duration::from_millis(1100)));
    }
}
