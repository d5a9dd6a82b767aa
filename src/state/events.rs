use super::StoreFailure;
use crate::constants::DEFAULT_EVENT_CHANNEL_CAPACITY;
use tokio::sync::broadcast;

/// Change applied to the observable state slice
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    CurrentTestChanged { test_id: Option<String> },
    TestListChanged { count: usize },
    LoadingChanged(bool),
    ErrorRaised(StoreFailure),
    ErrorCleared,
}

/// Broadcast publisher for state changes
#[derive(Debug, Clone)]
pub struct StatePublisher {
    sender: broadcast::Sender<StateChange>,
}

impl StatePublisher {
    /// Create a new publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, change: StateChange) {
        // send() only fails when nobody is subscribed, which is fine
        let _ = self.sender.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for StatePublisher {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}
