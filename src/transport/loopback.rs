//! In-process connection
//!
//! Delivers each sent packet synchronously, on the sending thread, to every
//! matching subscription. Useful for tests and for wiring a sender and a
//! receiver inside one process.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{ChannelError, ChannelResult};
use crate::transport::{Connection, PacketCallback, SubscriptionId};

struct Subscription {
    id: SubscriptionId,
    prefix: String,
    callback: Arc<dyn Fn(&str, &[u8]) + Send + Sync>,
}

pub struct LoopbackConnection {
    open: AtomicBool,
    next_id: AtomicU64,
    subscriptions: Mutex<Vec<Subscription>>,
    sent: Mutex<Vec<(String, Vec<u8>)>>,
}

impl LoopbackConnection {
    pub fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            subscriptions: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Mark the connection unusable; later sends fail.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// Every packet sent so far, in order
    pub fn sent_packets(&self) -> Vec<(String, Vec<u8>)> {
        self.sent.lock().clone()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }
}

impl Default for LoopbackConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for LoopbackConnection {
    fn is_valid(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn send(&self, address: &str, payload: &[u8]) -> ChannelResult<()> {
        if !self.is_valid() {
            return Err(ChannelError::InvalidConnection);
        }

        self.sent.lock().push((address.to_string(), payload.to_vec()));

        // Callbacks may subscribe or unsubscribe, so never call them under the lock
        let targets: Vec<_> = self
            .subscriptions
            .lock()
            .iter()
            .filter(|s| address.starts_with(&s.prefix))
            .map(|s| s.callback.clone())
            .collect();

        for callback in targets {
            callback(address, payload);
        }
        Ok(())
    }

    fn subscribe(&self, address_prefix: &str, callback: PacketCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.lock().push(Subscription {
            id,
            prefix: address_prefix.to_string(),
            callback: Arc::from(callback),
        });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.lock().retain(|s| s.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivers_to_matching_prefix_in_order() {
        let connection = LoopbackConnection::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        connection.subscribe(
            "/MessageHandler/",
            Box::new(move |address, payload| sink.lock().push((address.to_string(), payload.to_vec()))),
        );

        connection.send("/MessageHandler/OnKeyDown", &[1]).unwrap();
        connection.send("/Other/OnKeyDown", &[2]).unwrap();
        connection.send("/MessageHandler/OnKeyUp", &[3]).unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                ("/MessageHandler/OnKeyDown".to_string(), vec![1]),
                ("/MessageHandler/OnKeyUp".to_string(), vec![3]),
            ]
        );
        assert_eq!(connection.sent_packets().len(), 3);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let connection = LoopbackConnection::new();
        let count = Arc::new(AtomicU64::new(0));
        let counter = count.clone();
        let id = connection.subscribe(
            "/",
            Box::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        connection.send("/a", &[]).unwrap();
        connection.unsubscribe(id);
        connection.send("/a", &[]).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(connection.subscription_count(), 0);
    }

    #[test]
    fn test_closed_connection_rejects_sends() {
        let connection = LoopbackConnection::new();
        connection.close();
        assert!(!connection.is_valid());
        assert!(matches!(
            connection.send("/a", &[]),
            Err(ChannelError::InvalidConnection)
        ));
        assert!(connection.sent_packets().is_empty());
    }
}
