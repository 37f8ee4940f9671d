//! Collecting reporter
//!
//! Appends every event behind a mutex, stamped with the time since the log
//! was created.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use super::{Event, Reporter};

/// Event with its arrival offset
#[derive(Clone, Debug)]
pub struct LoggedEvent {
    pub at: Duration,
    pub event: Event,
}

/// Append-only event log safe to share between concurrent test cases
#[derive(Debug)]
pub struct EventLog {
    origin: Instant,
    events: Mutex<Vec<LoggedEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            events: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LoggedEvent>> {
        // Poisoning is ignored: entries are only ever appended.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every event logged so far
    pub fn snapshot(&self) -> Vec<LoggedEvent> {
        self.lock().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().iter().map(|e| e.event.clone()).collect()
    }

    /// Output lines in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match &e.event {
                Event::TestOutput { line, .. } => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Arrival offset of the first event matching `predicate`
    pub fn first_at(&self, predicate: impl Fn(&Event) -> bool) -> Option<Duration> {
        self.lock()
            .iter()
            .find(|e| predicate(&e.event))
            .map(|e| e.at)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for EventLog {
    fn on_event(&self, event: &Event) {
        let at = self.origin.elapsed();
        self.lock().push(LoggedEvent {
            at,
            event: event.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_events_are_stamped() {
        let log = EventLog::new();
        log.on_event(&Event::TestStarted {
            test: "Test 1".to_string(),
        });
        tokio::time::sleep(Duration::from_millis(40)).await;
        log.on_event(&Event::TestOutput {
            test: Some("Test 1".to_string()),
            line: "[END] Test 1".to_string(),
        });

        let events = log.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].at.as_millis(), 0);
        assert_eq!(events[1].at.as_millis(), 40);
        assert_eq!(log.lines(), vec!["[END] Test 1".to_string()]);
    }

    #[test]
    fn test_concurrent_appends() {
        let log = std::sync::Arc::new(EventLog::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = log.clone();
                std::thread::spawn(move || {
                    log.on_event(&Event::TestStarted {
                        test: format!("Test {i}"),
                    })
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.len(), 8);
        log.clear();
        assert!(log.is_empty());
    }
}
