//! An address resolution engine for user-space network stacks.
//!
//! This library implements the protocol core of ARP: building and parsing the
//! variable-length wire format, answering resolution requests from peers, and
//! learning hardware addresses from observed replies. Everything around it is
//! deliberately kept behind narrow trait seams so that the engine can be
//! embedded into different stacks: buffer allocation, device drivers, routing
//! and the neighbour storage are collaborators provided by the host
//! environment, not part of this crate.
//!
//! ## Structure
//!
//! * [`wire`](wire/index.html) contains the packet representations. The
//!   central type is the [`arp`] byte wrapper with offset-checked accessors
//!   for the four variable-length address fields, together with a borrowed
//!   high-level [`Repr`].
//! * [`layer`](layer/index.html) contains the processing logic. The
//!   [`arp::Endpoint`](layer/arp/struct.Endpoint.html) drives the three
//!   operations of the engine: `resolve` for outgoing packets, `send` for
//!   explicit request or reply emission, and `receive` for the inbound
//!   pipeline.
//! * [`nic`](nic/index.html) defines the device seam: the [`Device`] trait,
//!   the buffer [`Pool`] and the link-level packet classification.
//!
//! ## Buffer ownership
//!
//! Packet buffers are moved, never shared. A buffer enters the engine by
//! value and leaves it exactly once: either consumed by the device transmit
//! path or released by dropping it. There is no code path that leaks a buffer
//! or frees it twice, the compiler checks this for us.
//!
//! [`arp`]: wire/struct.arp.html
//! [`Repr`]: wire/struct.ArpRepr.html
//! [`Device`]: nic/trait.Device.html
//! [`Pool`]: nic/trait.Pool.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

#[macro_use] mod macros;
pub mod layer;
pub mod nic;
pub mod wire;
