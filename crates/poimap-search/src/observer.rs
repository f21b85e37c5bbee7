//! UI observer contract.
//!
//! Observers are called on the orchestrator's task, in registration order,
//! never from the worker that performs the network call.

use poimap_core::ErrorKind;
use tokio::sync::mpsc;

use crate::store::{Snapshot, StoreChange};

/// Receives session notifications. All methods default to no-ops so an
/// observer only implements what it renders.
pub trait SearchObserver: Send {
    fn on_loading_changed(&mut self, _loading: bool) {}

    fn on_results_updated(&mut self, _snapshot: &Snapshot, _change: StoreChange) {}

    fn on_error(&mut self, _kind: ErrorKind, _message: &str) {}
}

/// Token returned by [`ObserverRegistry::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Box<dyn SearchObserver>)>,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("registered", &self.observers.len())
            .finish()
    }
}

impl ObserverRegistry {
    pub fn register(&mut self, observer: Box<dyn SearchObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn loading_changed(&mut self, loading: bool) {
        for (_, observer) in &mut self.observers {
            observer.on_loading_changed(loading);
        }
    }

    pub(crate) fn results_updated(&mut self, snapshot: &Snapshot, change: StoreChange) {
        for (_, observer) in &mut self.observers {
            observer.on_results_updated(snapshot, change);
        }
    }

    pub(crate) fn error(&mut self, kind: ErrorKind, message: &str) {
        for (_, observer) in &mut self.observers {
            observer.on_error(kind, message);
        }
    }
}

/// Observer notifications as values, for consumers that prefer a stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    LoadingChanged(bool),
    ResultsUpdated {
        snapshot: Snapshot,
        change: StoreChange,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

/// Forwards every notification into an unbounded channel.
///
/// Events are dropped silently once the receiver is gone.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<SearchEvent>,
}

impl ChannelObserver {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: SearchEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("search event receiver dropped");
        }
    }
}

impl SearchObserver for ChannelObserver {
    fn on_loading_changed(&mut self, loading: bool) {
        self.forward(SearchEvent::LoadingChanged(loading));
    }

    fn on_results_updated(&mut self, snapshot: &Snapshot, change: StoreChange) {
        self.forward(SearchEvent::ResultsUpdated {
            snapshot: Snapshot::clone(snapshot),
            change,
        });
    }

    fn on_error(&mut self, kind: ErrorKind, message: &str) {
        self.forward(SearchEvent::Error {
            kind,
            message: message.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn registry_notifies_in_registration_order() {
        let mut registry = ObserverRegistry::default();
        let (first, mut first_rx) = ChannelObserver::new();
        let (second, mut second_rx) = ChannelObserver::new();
        registry.register(Box::new(first));
        registry.register(Box::new(second));

        registry.loading_changed(true);
        registry.error(ErrorKind::Network, "offline");

        assert_eq!(first_rx.try_recv().unwrap(), SearchEvent::LoadingChanged(true));
        assert_eq!(second_rx.try_recv().unwrap(), SearchEvent::LoadingChanged(true));
        assert_eq!(
            first_rx.try_recv().unwrap(),
            SearchEvent::Error {
                kind: ErrorKind::Network,
                message: "offline".to_owned()
            }
        );
    }

    #[test]
    fn unregister_stops_delivery() {
        let mut registry = ObserverRegistry::default();
        let (observer, mut rx) = ChannelObserver::new();
        let id = registry.register(Box::new(observer));

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.is_empty());

        registry.results_updated(&Arc::new(Vec::new()), StoreChange::Reset);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn ids_are_unique_after_unregister() {
        let mut registry = ObserverRegistry::default();
        let (a, _rx_a) = ChannelObserver::new();
        let (b, _rx_b) = ChannelObserver::new();
        let first = registry.register(Box::new(a));
        registry.unregister(first);
        let second = registry.register(Box::new(b));
        assert_ne!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn channel_observer_ignores_dropped_receiver() {
        let (mut observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_loading_changed(false);
    }
}
