//! Encapsulates a network interface card.
//!
//! The engine does not drive hardware itself. Instead it consumes the narrow
//! [`Device`] interface for everything link-layer specific: address lengths
//! and types, header construction, frame classification and transmission.
//! Software emulations of a device, as used by the test suite, implement the
//! same trait.
//!
//! [`Device`]: trait.Device.html

use crate::layer::Result;
use crate::wire::{ArpHardware, EtherType, Ipv4Address, Payload, PayloadMut};

/// The longest hardware address the engine will handle, in octets.
///
/// Bounds the temporary copies made while turning a request into a reply.
/// Devices with longer addresses are rejected at the validation boundary.
pub const MAX_ADDR_LEN: usize = 32;

/// The delivery classification of a received frame.
///
/// Assigned by the device (or its driver) when a frame is taken off the
/// link, by inspecting the link-level destination address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Addressed to this host.
    Host,
    /// Addressed to the link broadcast address.
    Broadcast,
    /// Addressed to a multicast group.
    Multicast,
    /// Addressed to some other host.
    ///
    /// Seen on promiscuous interfaces; never processed by the engine.
    Other,
}

/// An allocator for packet buffers.
///
/// Sized allocations are requested before a packet is built; the pool either
/// provides an exclusively owned buffer of exactly the requested length or
/// `None` when its resources are exhausted. Buffers are returned to the pool
/// through their own `Drop` implementation, not through the trait.
pub trait Pool {
    /// The buffer type handed out by this pool.
    type Buffer: Payload + PayloadMut;

    /// Allocate a buffer of `length` octets.
    fn alloc(&mut self, length: usize) -> Option<Self::Buffer>;
}

/// A link-layer device as seen by the address resolution engine.
///
/// The trait bundles the device attributes the engine cross-validates packets
/// against, and the operations that are inherently specific to the link
/// framing: building a frame header, locating the destination address field
/// of a built frame, classifying a received frame, and transmission.
pub trait Device {
    /// The packet buffer type this device sends and receives.
    type Buffer: Payload + PayloadMut;

    /// The length of this device's hardware addresses in octets.
    fn addr_len(&self) -> u8;

    /// The hardware address space of this device's link, e.g. Ethernet.
    fn hardware_type(&self) -> ArpHardware;

    /// Whether address resolution may be used on this device.
    ///
    /// Point-to-point and loopback devices have no use for resolution and
    /// report `false` here; the engine then refuses to send and silently
    /// drops received resolution traffic.
    fn arp_capable(&self) -> bool;

    /// The device's own hardware address, `addr_len` octets long.
    fn hardware_addr(&self) -> &[u8];

    /// The protocol address configured on this device's interface.
    fn protocol_addr(&self) -> Ipv4Address;

    /// The length of this device's link-layer frame header.
    fn header_len(&self) -> usize;

    /// Construct the link-layer header in front of the payload.
    ///
    /// A `None` destination addresses the link broadcast address. Fails when
    /// the buffer can not hold the header or the device refuses the
    /// destination.
    fn build_header(
        &self,
        buffer: &mut Self::Buffer,
        protocol: EtherType,
        dest: Option<&[u8]>,
        source: &[u8],
    ) -> Result<()>;

    /// Borrow the destination hardware address field of a built frame.
    ///
    /// The returned slice is `addr_len` octets long.
    ///
    /// # Panics
    /// May panic if `buffer` does not hold a frame built by this device.
    fn link_destination<'p>(&self, buffer: &'p mut Self::Buffer) -> &'p mut [u8];

    /// Classify a received frame by its link-level destination.
    fn classify(&self, buffer: &Self::Buffer) -> PacketType;

    /// Queue a fully built frame for transmission.
    ///
    /// Consumes the buffer, on failure as well; the device releases it once
    /// the frame has left the queue.
    fn transmit(&mut self, buffer: Self::Buffer) -> Result<()>;
}
