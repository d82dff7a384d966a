use crate::types::SensorEvent;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Where orientation events come from.
///
/// On a real host this wraps the platform's orientation callback. Tests and
/// the demo binary use [`ChannelSource`] or [`SweepSource`].
#[async_trait]
pub trait SensorSource: Send {
    /// Whether the host exposes orientation sensing at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Wait for the next event. `None` means the source is closed.
    async fn next_event(&mut self) -> Option<SensorEvent>;
}

/// Events pushed in from elsewhere through a channel.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<SensorEvent>,
}

impl ChannelSource {
    /// Create the source and the sender that feeds it.
    pub fn new() -> (mpsc::UnboundedSender<SensorEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[async_trait]
impl SensorSource for ChannelSource {
    async fn next_event(&mut self) -> Option<SensorEvent> {
        self.rx.recv().await
    }
}

/// A host with no orientation capability. Never yields anything.
#[derive(Debug, Default)]
pub struct UnsupportedSource;

#[async_trait]
impl SensorSource for UnsupportedSource {
    fn is_supported(&self) -> bool {
        false
    }

    async fn next_event(&mut self) -> Option<SensorEvent> {
        None
    }
}

/// Simulated device that slowly sweeps through a range of angles.
///
/// alpha turns continuously, beta and gamma oscillate with the given
/// amplitude. Useful for development without a sensor attached.
pub struct SweepSource {
    interval: tokio::time::Interval,
    amplitude: f64,
    tick: u64,
}

impl SweepSource {
    pub fn new(period: Duration, amplitude: f64) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        Self {
            interval,
            amplitude,
            tick: 0,
        }
    }

    fn sample(&self) -> SensorEvent {
        let t = self.tick as f64 * 0.05;
        SensorEvent::new(
            (self.tick as f64 * 2.0) % 360.0,
            self.amplitude * t.sin(),
            self.amplitude * (t * 0.5).cos(),
        )
    }
}

#[async_trait]
impl SensorSource for SweepSource {
    async fn next_event(&mut self) -> Option<SensorEvent> {
        self.interval.tick().await;
        let event = self.sample();
        self.tick += 1;
        Some(event)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Empty event line")]
    Empty,
    #[error("Malformed sensor event: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse one JSON sensor event, e.g. `{"alpha": 30, "beta": 10}`.
pub fn parse_event_line(line: &str) -> Result<SensorEvent, SourceError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(serde_json::from_str(line)?)
}
