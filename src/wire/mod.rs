/*! Low-level packet access and construction.

The `wire` module deals with the packet *representation*. It provides two
levels of functionality.

 * First, it provides functions to extract fields from sequences of octets,
   and to insert fields into sequences of octets. This happens in the
   lowercase structures, e.g. [`arp`] or [`ethernet`]. The `check_len` method
   of a wrapper validates all field bounds up front; after it succeeded no
   accessor will panic.
 * Second, it provides a compact, high-level representation of header data
   that can be created from parsing and emitted into a sequence of octets.
   This happens through the `Repr` family of structs, e.g. [`ArpRepr`].

The underlying trait for byte containers is [`Payload`] with its mutable
counterpart [`PayloadMut`]. Packet buffers handed to the processing layer only
need to expose a consistent byte region through these traits, so the layer can
stay agnostic of the concrete buffer type of the host stack.

When parsing untrusted input it is *necessary* to use the checked
constructors; as long as the buffer is not modified afterwards no accessor
will fail. When emitting output the buffer is sized via the pure size
functions (such as [`arp::header_len`]) before any field is written.

[`arp`]: struct.arp.html
[`ethernet`]: struct.ethernet.html
[`ArpRepr`]: struct.ArpRepr.html
[`Payload`]: trait.Payload.html
[`PayloadMut`]: trait.PayloadMut.html
[`arp::header_len`]: arp/fn.header_len.html
*/
// The layout of the lowercase wrappers and the `Repr` split follows the wire
// representation design that `smoltcp` pioneered.

#![allow(missing_docs)]

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

pub mod arp;
mod error;
mod ethernet;
mod ipv4;
#[path = "payload.rs"]
mod payload_impl;

pub use self::payload_impl::{Payload, PayloadMut, Error as PayloadError, payload};

pub use self::error::{
    Error,
    Result};

pub use self::ethernet::{
    ethernet as ethernet_frame,
    EtherType,
    Address as EthernetAddress,
    Repr as EthernetRepr};

pub use self::arp::{
    arp as arp_packet,
    Hardware as ArpHardware,
    Operation as ArpOperation,
    Repr as ArpRepr};

pub use self::ipv4::Address as Ipv4Address;
