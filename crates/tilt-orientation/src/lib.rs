pub mod source;
pub mod store;
pub mod types;

use source::SensorSource;
use store::OrientationStore;
use tokio::sync::{mpsc, watch};
use types::OrientationState;

/// Commands sent to the tracking task.
enum TrackerCommand {
    ResetBaseline,
}

/// Live orientation tracking.
///
/// Drives a [`SensorSource`] into an [`OrientationStore`] on a background
/// task and publishes every state through a watch channel.
pub struct OrientationTracker {
    state_rx: watch::Receiver<OrientationState>,
    command_tx: mpsc::UnboundedSender<TrackerCommand>,
    supported: bool,
    _task: Option<tokio::task::JoinHandle<()>>,
    /// Held only on unsupported hosts so receivers stay open.
    _idle_tx: Option<watch::Sender<OrientationState>>,
}

impl OrientationTracker {
    /// Start tracking `source`.
    ///
    /// If the source reports no orientation support, no task is started and
    /// the published state stays at zero for the tracker's lifetime.
    pub fn spawn<S>(source: S) -> Self
    where
        S: SensorSource + 'static,
    {
        let (state_tx, state_rx) = watch::channel(OrientationState::default());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let supported = source.is_supported();

        let (task, idle_tx) = if supported {
            tracing::info!("Orientation tracking started");
            let task = tokio::spawn(tracking_loop(source, state_tx, command_rx));
            (Some(task), None)
        } else {
            tracing::warn!("Orientation sensing not supported, readings will stay at zero");
            (None, Some(state_tx))
        };

        Self {
            state_rx,
            command_tx,
            supported,
            _task: task,
            _idle_tx: idle_tx,
        }
    }

    /// Latest published state (non-blocking).
    pub fn state(&self) -> OrientationState {
        *self.state_rx.borrow()
    }

    /// Receiver that holds the current state and is notified on every update.
    pub fn subscribe(&self) -> watch::Receiver<OrientationState> {
        self.state_rx.clone()
    }

    /// Use the latest absolute reading as the new baseline.
    ///
    /// Applied before any event that arrives after this call.
    pub fn reset_baseline(&self) {
        let _ = self.command_tx.send(TrackerCommand::ResetBaseline);
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }
}

/// Background task: pull events, update the store, publish.
async fn tracking_loop<S: SensorSource>(
    mut source: S,
    state_tx: watch::Sender<OrientationState>,
    mut command_rx: mpsc::UnboundedReceiver<TrackerCommand>,
) {
    let mut store = OrientationStore::new(true);
    // The channel is already seeded with the initial state; skip the replay.
    let mut replayed = false;
    store.subscribe(Box::new(move |state| {
        if !std::mem::replace(&mut replayed, true) {
            return;
        }
        state_tx.send_replace(*state);
    }));
    let mut event_count: u64 = 0;

    loop {
        tokio::select! {
            // Commands first so a reset issued before an event applies to it.
            biased;

            cmd = command_rx.recv() => match cmd {
                Some(TrackerCommand::ResetBaseline) => store.reset_baseline(),
                None => {
                    tracing::debug!(event_count, "Tracker dropped, stopping");
                    break;
                }
            },
            event = source.next_event() => match event {
                Some(event) => {
                    store.handle_event(&event);
                    event_count += 1;
                    if event_count % 1000 == 0 {
                        tracing::debug!(event_count, "Orientation events processed");
                    }
                }
                None => {
                    tracing::info!(event_count, "Sensor source closed");
                    break;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, SweepSource, UnsupportedSource};
    use crate::types::{OrientationReading, SensorEvent};
    use std::time::Duration;

    async fn next_state(rx: &mut watch::Receiver<OrientationState>) -> OrientationState {
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("timed out waiting for state")
            .expect("tracker stopped");
        *rx.borrow_and_update()
    }

    #[tokio::test]
    async fn publishes_default_before_events() {
        let (_tx, source) = ChannelSource::new();
        let tracker = OrientationTracker::spawn(source);
        assert_eq!(tracker.state(), OrientationState::default());
        assert_eq!(*tracker.subscribe().borrow(), OrientationState::default());
    }

    #[tokio::test]
    async fn publishes_events_and_honours_reset() {
        let (tx, source) = ChannelSource::new();
        let tracker = OrientationTracker::spawn(source);
        let mut rx = tracker.subscribe();

        tx.send(SensorEvent::new(30.0, 10.0, 5.0)).unwrap();
        let state = next_state(&mut rx).await;
        assert_eq!(state.absolute, OrientationReading::new(30.0, 10.0, 5.0));
        assert_eq!(state.relative, OrientationReading::new(30.0, 10.0, 5.0));

        tracker.reset_baseline();
        tx.send(SensorEvent::new(40.0, 10.0, 5.0)).unwrap();
        let state = next_state(&mut rx).await;
        assert_eq!(state.relative, OrientationReading::new(10.0, 0.0, 0.0));
        assert_eq!(tracker.state(), state);
    }

    #[tokio::test]
    async fn late_subscriber_sees_current_state() {
        let (tx, source) = ChannelSource::new();
        let tracker = OrientationTracker::spawn(source);
        let mut early = tracker.subscribe();

        tx.send(SensorEvent::new(5.0, 6.0, 7.0)).unwrap();
        next_state(&mut early).await;

        let late = tracker.subscribe();
        assert_eq!(late.borrow().absolute, OrientationReading::new(5.0, 6.0, 7.0));
    }

    #[tokio::test]
    async fn unsupported_host_stays_at_default() {
        let tracker = OrientationTracker::spawn(UnsupportedSource);
        assert!(!tracker.is_supported());

        let mut rx = tracker.subscribe();
        tracker.reset_baseline();
        let waited = tokio::time::timeout(Duration::from_millis(50), rx.changed()).await;
        assert!(waited.is_err(), "unsupported tracker published an update");
        assert_eq!(*rx.borrow(), OrientationState::default());
    }

    #[tokio::test]
    async fn dropping_tracker_stops_publishing() {
        let tracker = OrientationTracker::spawn(SweepSource::new(Duration::from_millis(1), 10.0));
        let mut rx = tracker.subscribe();
        next_state(&mut rx).await;
        drop(tracker);

        let closed = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok(), "tracking task kept publishing after drop");
    }

    #[tokio::test]
    async fn dropping_tracker_closes_idle_source() {
        let (tx, source) = ChannelSource::new();
        let tracker = OrientationTracker::spawn(source);
        let mut rx = tracker.subscribe();
        drop(tracker);

        let changed = tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("tracking task still running");
        assert!(changed.is_err());
        assert!(tx.send(SensorEvent::new(1.0, 2.0, 3.0)).is_err());
    }
}
