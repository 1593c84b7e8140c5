use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

/// Progress of a reveal, tagged with the cycle that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    Started { cycle: u64 },
    Progress { cycle: u64, shown: String },
    Committed { cycle: u64, text: String },
}

impl RevealEvent {
    pub fn cycle(&self) -> u64 {
        match self {
            RevealEvent::Started { cycle }
            | RevealEvent::Progress { cycle, .. }
            | RevealEvent::Committed { cycle, .. } => *cycle,
        }
    }
}

#[derive(Default)]
struct Active {
    cycle: u64,
    task: Option<JoinHandle<()>>,
}

/// Reveals a string one character per tick on a background task.
///
/// Only one reveal runs at a time: starting a new one aborts the previous
/// task before it can commit. Dropping the scheduler aborts the active task.
pub struct RevealScheduler {
    events: UnboundedSender<RevealEvent>,
    interval: Duration,
    active: Mutex<Active>,
}

impl RevealScheduler {
    pub fn new(events: UnboundedSender<RevealEvent>, interval: Duration) -> RevealScheduler {
        RevealScheduler {
            events,
            interval,
            active: Mutex::new(Active::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts revealing `text` and returns the new cycle id, or `None` when
    /// `text` is empty. Must be called from within a tokio runtime.
    pub fn start(&self, text: String) -> Option<u64> {
        if text.is_empty() {
            return None;
        }

        let mut active = self.lock();
        if let Some(task) = active.task.take() {
            task.abort();
            debug!(cycle = active.cycle, "reveal superseded");
        }
        active.cycle += 1;
        let cycle = active.cycle;

        if self.events.send(RevealEvent::Started { cycle }).is_err() {
            debug!(cycle, "reveal receiver closed, not starting");
            return None;
        }
        debug!(cycle, chars = text.chars().count(), "reveal started");
        active.task = Some(tokio::spawn(reveal(
            cycle,
            text,
            self.interval,
            self.events.clone(),
        )));
        Some(cycle)
    }

    pub fn is_revealing(&self) -> bool {
        self.lock()
            .task
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Active> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.lock().task.take() {
            task.abort();
        }
    }
}

async fn reveal(
    cycle: u64,
    text: String,
    interval: Duration,
    events: UnboundedSender<RevealEvent>,
) {
    let mut shown = String::with_capacity(text.len());
    for ch in text.chars() {
        tokio::time::sleep(interval).await;
        shown.push(ch);
        let progress = RevealEvent::Progress {
            cycle,
            shown: shown.clone(),
        };
        if events.send(progress).is_err() {
            return;
        }
    }

    // the full text stays on screen for one more tick before it is committed
    tokio::time::sleep(interval).await;
    debug!(cycle, "reveal committed");
    let _ = events.send(RevealEvent::Committed { cycle, text });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{error::TryRecvError, unbounded_channel, UnboundedReceiver};
    use tokio::time::Instant;

    async fn drain_until_commit(rx: &mut UnboundedReceiver<RevealEvent>) -> Vec<RevealEvent> {
        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = matches!(event, RevealEvent::Committed { .. });
            seen.push(event);
            if done {
                break;
            }
        }
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn reveals_one_character_per_tick_then_commits() {
        let (tx, mut rx) = unbounded_channel();
        let scheduler = RevealScheduler::new(tx, DEFAULT_INTERVAL);
        let started_at = Instant::now();

        let cycle = scheduler.start("hi".to_string()).unwrap();
        let events = drain_until_commit(&mut rx).await;

        assert_eq!(
            events,
            vec![
                RevealEvent::Started { cycle },
                RevealEvent::Progress { cycle, shown: "h".into() },
                RevealEvent::Progress { cycle, shown: "hi".into() },
                RevealEvent::Committed { cycle, text: "hi".into() },
            ]
        );
        assert!(started_at.elapsed() >= DEFAULT_INTERVAL * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_character_waits_one_interval() {
        let (tx, mut rx) = unbounded_channel();
        let scheduler = RevealScheduler::new(tx, Duration::from_millis(80));
        let started_at = Instant::now();

        scheduler.start("x".to_string()).unwrap();
        assert!(matches!(rx.recv().await, Some(RevealEvent::Started { .. })));
        assert!(matches!(rx.recv().await, Some(RevealEvent::Progress { .. })));
        assert!(started_at.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test(start_paused = true)]
    async fn multibyte_text_reveals_whole_characters() {
        let (tx, mut rx) = unbounded_channel();
        let scheduler = RevealScheduler::new(tx, DEFAULT_INTERVAL);

        scheduler.start("سلام".to_string()).unwrap();
        let shown: Vec<String> = drain_until_commit(&mut rx)
            .await
            .into_iter()
            .filter_map(|event| match event {
                RevealEvent::Progress { shown, .. } => Some(shown),
                _ => None,
            })
            .collect();

        assert_eq!(shown, ["س", "سل", "سلا", "سلام"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_is_ignored() {
        let (tx, mut rx) = unbounded_channel();
        let scheduler = RevealScheduler::new(tx, DEFAULT_INTERVAL);

        assert_eq!(scheduler.start(String::new()), None);
        assert!(!scheduler.is_revealing());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_supersedes_previous_cycle() {
        let (tx, mut rx) = unbounded_channel();
        let scheduler = RevealScheduler::new(tx, DEFAULT_INTERVAL);

        let first = scheduler.start("abcdef".to_string()).unwrap();
        assert_eq!(rx.recv().await, Some(RevealEvent::Started { cycle: first }));
        assert_eq!(
            rx.recv().await,
            Some(RevealEvent::Progress { cycle: first, shown: "a".into() })
        );

        let second = scheduler.start("xy".to_string()).unwrap();
        assert!(second > first);
        let events = drain_until_commit(&mut rx).await;

        let commits: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, RevealEvent::Committed { .. }))
            .collect();
        assert_eq!(
            commits,
            [&RevealEvent::Committed { cycle: second, text: "xy".into() }]
        );
        assert!(events.iter().all(|event| event.cycle() == second));

        tokio::time::sleep(DEFAULT_INTERVAL * 20).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(!scheduler.is_revealing());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_scheduler_aborts_reveal() {
        let (tx, mut rx) = unbounded_channel();
        let scheduler = RevealScheduler::new(tx, DEFAULT_INTERVAL);

        let cycle = scheduler.start("hello".to_string()).unwrap();
        drop(scheduler);

        assert_eq!(rx.recv().await, Some(RevealEvent::Started { cycle }));
        assert_eq!(rx.recv().await, None);
    }
}
