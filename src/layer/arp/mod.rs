//! Receiving and sending ARP messages.
//!
//! The [`Endpoint`] implements the three operations of the resolution engine:
//! deciding the destination hardware address of an outgoing packet
//! (`resolve`), emitting requests and replies (`send`), and the inbound
//! pipeline that answers requests addressed to us and learns mappings from
//! replies (`receive`).
//!
//! As noted in RFC 826, arp assumes that the identities of the own host are
//! fully known to the resolver; they are provided by the device. All mutable
//! shared state — the neighbour mapping, the routing table, the queue of
//! packets awaiting resolution — belongs to collaborators handed in by the
//! host stack, so the endpoint itself can be invoked reentrantly.
//!
//! [`Endpoint`]: struct.Endpoint.html
mod endpoint;
mod neighbor;
#[cfg(test)]
mod tests;

pub use endpoint::{Endpoint, Message, PendingQueue, Router};

pub use neighbor::NeighborMapping;

#[cfg(feature = "std")]
pub use neighbor::Cache as NeighborCache;
