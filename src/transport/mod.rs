//! Message transport boundary
//!
//! The core only needs an address-routed connection that sends named byte
//! payloads and delivers inbound packets to prefix subscriptions, in send
//! order per subscription. Framing, reliability and threading belong to the
//! implementation.

pub mod loopback;

pub use loopback::LoopbackConnection;

use serde::{Deserialize, Serialize};

use crate::error::ChannelResult;

/// Called with `(address, payload)` for each inbound packet.
/// May run on a transport thread.
pub type PacketCallback = Box<dyn Fn(&str, &[u8]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

pub trait Connection: Send + Sync {
    /// Whether the connection can still carry packets
    fn is_valid(&self) -> bool;

    fn send(&self, address: &str, payload: &[u8]) -> ChannelResult<()>;

    /// Deliver every inbound packet whose address starts with `address_prefix`.
    fn subscribe(&self, address_prefix: &str, callback: PacketCallback) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}
