use crate::types::{OrientationReading, OrientationState, SensorEvent, TrackingPhase};

/// Callback invoked with every published state.
pub type Listener = Box<dyn FnMut(&OrientationState) + Send>;

/// Handle returned by [`OrientationStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Current orientation plus the baseline it is measured against.
///
/// Single writer: whoever owns the store feeds it events and resets. Listeners
/// run synchronously inside [`handle_event`](Self::handle_event), in
/// subscription order.
pub struct OrientationStore {
    state: OrientationState,
    /// Reference reading for "set zero". Only replaced wholesale.
    baseline: OrientationReading,
    phase: TrackingPhase,
    /// Whether the host can deliver orientation events at all.
    supported: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl OrientationStore {
    pub fn new(supported: bool) -> Self {
        Self {
            state: OrientationState::default(),
            baseline: OrientationReading::ZERO,
            phase: TrackingPhase::Uninitialized,
            supported,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Process one sensor event and publish the resulting state.
    pub fn handle_event(&mut self, event: &SensorEvent) -> OrientationState {
        let absolute = OrientationReading::from_event(event);
        let relative = absolute - self.baseline;
        self.state = OrientationState { absolute, relative };

        if self.phase == TrackingPhase::Uninitialized {
            self.phase = TrackingPhase::Tracking;
            tracing::info!(
                alpha = absolute.alpha,
                beta = absolute.beta,
                gamma = absolute.gamma,
                "First orientation event received"
            );
        }

        let state = self.state;
        for (_, listener) in &mut self.listeners {
            listener(&state);
        }
        state
    }

    /// Use the currently stored absolute reading as the new baseline.
    ///
    /// This copies the last reading the store saw, not a fresh sample, so a
    /// reset before the first event captures zeros. Ignored on hosts without
    /// orientation support. Nothing is republished until the next event.
    pub fn reset_baseline(&mut self) {
        if !self.supported {
            tracing::debug!("Baseline reset ignored: orientation not supported");
            return;
        }
        self.baseline = self.state.absolute;
        tracing::info!(
            alpha = self.baseline.alpha,
            beta = self.baseline.beta,
            gamma = self.baseline.gamma,
            "Baseline reset"
        );
    }

    /// Register a listener. It is called right away with the current state
    /// and again after every event until unsubscribed.
    pub fn subscribe(&mut self, mut listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        listener(&self.state);
        self.listeners.push((id, listener));
        id
    }

    /// Stop delivering to `id`. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn current_state(&self) -> OrientationState {
        self.state
    }

    pub fn baseline(&self) -> OrientationReading {
        self.baseline
    }

    pub fn phase(&self) -> TrackingPhase {
        self.phase
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for OrientationStore {
    fn default() -> Self {
        Self::new(true)
    }
}
