use core::fmt;
use byteorder::{ByteOrder, NetworkEndian};

use crate::wire::{Error, Result};

pub use super::EtherType as Protocol;

enum_with_unknown! {
    /// ARP hardware type.
    pub enum Hardware(u16) {
        Ethernet = 1,
    }
}

enum_with_unknown! {
    /// ARP operation type.
    pub enum Operation(u16) {
        Request = 1,
        Reply = 2,
    }
}

byte_wrapper! {
    /// A byte sequence representing an ARP packet.
    ///
    /// The packet layout is a fixed part followed by four variable-length
    /// address fields whose sizes are declared *inside* the fixed part. All
    /// accessors compute offsets from the declared lengths; there is no
    /// fixed-shape overlay. After a successful [`check_len`] no accessor will
    /// read or write out of bounds, as long as the two length fields are not
    /// modified afterwards.
    ///
    /// [`check_len`]: #method.check_len
    #[derive(Debug, PartialEq, Eq)]
    pub struct arp([u8]);
}

mod field {
    #![allow(non_snake_case)]

    use crate::wire::field::*;

    pub(crate) const HTYPE: Field = 0..2;
    pub(crate) const PTYPE: Field = 2..4;
    pub(crate) const HLEN: usize = 4;
    pub(crate) const PLEN: usize = 5;
    pub(crate) const OPER: Field = 6..8;

    #[inline]
    pub(crate) fn SHA(hardware_len: u8, _protocol_len: u8) -> Field {
        let start = OPER.end;
        start..(start + hardware_len as usize)
    }

    #[inline]
    pub(crate) fn SPA(hardware_len: u8, protocol_len: u8) -> Field {
        let start = SHA(hardware_len, protocol_len).end;
        start..(start + protocol_len as usize)
    }

    #[inline]
    pub(crate) fn THA(hardware_len: u8, protocol_len: u8) -> Field {
        let start = SPA(hardware_len, protocol_len).end;
        start..(start + hardware_len as usize)
    }

    #[inline]
    pub(crate) fn TPA(hardware_len: u8, protocol_len: u8) -> Field {
        let start = THA(hardware_len, protocol_len).end;
        start..(start + protocol_len as usize)
    }
}

/// Return the total header length for a pair of declared address lengths.
///
/// This is `8 + 2*hardware_len + 2*protocol_len`: the fixed part followed by
/// two hardware and two protocol addresses. Allocators use this to size
/// buffers before a packet is emitted into them.
pub fn header_len(hardware_len: u8, protocol_len: u8) -> usize {
    field::TPA(hardware_len, protocol_len).end
}

impl arp {
    /// Imbue a raw octet buffer with ARP packet structure.
    pub fn new_unchecked(buffer: &[u8]) -> &arp {
        Self::__from_macro_new_unchecked(buffer)
    }

    /// Imbue a mutable octet buffer with ARP packet structure.
    pub fn new_unchecked_mut(buffer: &mut [u8]) -> &mut arp {
        Self::__from_macro_new_unchecked_mut(buffer)
    }

    /// Shorthand for a combination of [new_unchecked] and [check_len].
    ///
    /// [new_unchecked]: #method.new_unchecked
    /// [check_len]: #method.check_len
    pub fn new_checked(data: &[u8]) -> Result<&arp> {
        let packet = Self::new_unchecked(data);
        packet.check_len()?;
        Ok(packet)
    }

    /// Mutable variant of [new_checked].
    ///
    /// [new_checked]: #method.new_checked
    pub fn new_checked_mut(data: &mut [u8]) -> Result<&mut arp> {
        Self::new_checked(&data[..])?;
        Ok(Self::new_unchecked_mut(data))
    }

    /// Unwrap the packet as a raw byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unwrap the packet as a mutable raw byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Ensure that no accessor method will panic if called.
    /// Returns `Err(Error::Truncated)` if the buffer is too short.
    ///
    /// The check is performed in two steps: the buffer must cover the fixed
    /// part before the declared lengths can be read, then it must cover the
    /// full header as declared. The result of this check is invalidated by
    /// calling [set_hardware_len] or [set_protocol_len].
    ///
    /// [set_hardware_len]: #method.set_hardware_len
    /// [set_protocol_len]: #method.set_protocol_len
    pub fn check_len(&self) -> Result<()> {
        let len = self.0.len();
        if len < field::OPER.end {
            Err(Error::Truncated)
        } else if len < field::TPA(self.hardware_len(), self.protocol_len()).end {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Return the hardware type field.
    #[inline]
    pub fn hardware_type(&self) -> Hardware {
        let raw = NetworkEndian::read_u16(&self.0[field::HTYPE]);
        Hardware::from(raw)
    }

    /// Return the protocol type field.
    #[inline]
    pub fn protocol_type(&self) -> Protocol {
        let raw = NetworkEndian::read_u16(&self.0[field::PTYPE]);
        Protocol::from(raw)
    }

    /// Return the hardware length field.
    #[inline]
    pub fn hardware_len(&self) -> u8 {
        self.0[field::HLEN]
    }

    /// Return the protocol length field.
    #[inline]
    pub fn protocol_len(&self) -> u8 {
        self.0[field::PLEN]
    }

    /// Return the operation field.
    #[inline]
    pub fn operation(&self) -> Operation {
        let raw = NetworkEndian::read_u16(&self.0[field::OPER]);
        Operation::from(raw)
    }

    /// Return the source hardware address field.
    pub fn source_hardware_addr(&self) -> &[u8] {
        &self.0[field::SHA(self.hardware_len(), self.protocol_len())]
    }

    /// Return the source protocol address field.
    pub fn source_protocol_addr(&self) -> &[u8] {
        &self.0[field::SPA(self.hardware_len(), self.protocol_len())]
    }

    /// Return the target hardware address field.
    pub fn target_hardware_addr(&self) -> &[u8] {
        &self.0[field::THA(self.hardware_len(), self.protocol_len())]
    }

    /// Return the target protocol address field.
    pub fn target_protocol_addr(&self) -> &[u8] {
        &self.0[field::TPA(self.hardware_len(), self.protocol_len())]
    }

    /// Set the hardware type field.
    #[inline]
    pub fn set_hardware_type(&mut self, value: Hardware) {
        NetworkEndian::write_u16(&mut self.0[field::HTYPE], value.into())
    }

    /// Set the protocol type field.
    #[inline]
    pub fn set_protocol_type(&mut self, value: Protocol) {
        NetworkEndian::write_u16(&mut self.0[field::PTYPE], value.into())
    }

    /// Set the hardware length field.
    #[inline]
    pub fn set_hardware_len(&mut self, value: u8) {
        self.0[field::HLEN] = value
    }

    /// Set the protocol length field.
    #[inline]
    pub fn set_protocol_len(&mut self, value: u8) {
        self.0[field::PLEN] = value
    }

    /// Set the operation field.
    #[inline]
    pub fn set_operation(&mut self, value: Operation) {
        NetworkEndian::write_u16(&mut self.0[field::OPER], value.into())
    }

    /// Set the source hardware address field.
    ///
    /// # Panics
    /// The function panics if `value` is not `self.hardware_len()` long.
    pub fn set_source_hardware_addr(&mut self, value: &[u8]) {
        let (hardware_len, protocol_len) = (self.hardware_len(), self.protocol_len());
        self.0[field::SHA(hardware_len, protocol_len)].copy_from_slice(value)
    }

    /// Set the source protocol address field.
    ///
    /// # Panics
    /// The function panics if `value` is not `self.protocol_len()` long.
    pub fn set_source_protocol_addr(&mut self, value: &[u8]) {
        let (hardware_len, protocol_len) = (self.hardware_len(), self.protocol_len());
        self.0[field::SPA(hardware_len, protocol_len)].copy_from_slice(value)
    }

    /// Set the target hardware address field.
    ///
    /// # Panics
    /// The function panics if `value` is not `self.hardware_len()` long.
    pub fn set_target_hardware_addr(&mut self, value: &[u8]) {
        let (hardware_len, protocol_len) = (self.hardware_len(), self.protocol_len());
        self.0[field::THA(hardware_len, protocol_len)].copy_from_slice(value)
    }

    /// Fill the target hardware address field with zeroes.
    ///
    /// Used when the target hardware address is unknown, as in outgoing
    /// requests.
    pub fn zero_target_hardware_addr(&mut self) {
        let (hardware_len, protocol_len) = (self.hardware_len(), self.protocol_len());
        for byte in &mut self.0[field::THA(hardware_len, protocol_len)] {
            *byte = 0;
        }
    }

    /// Set the target protocol address field.
    ///
    /// # Panics
    /// The function panics if `value` is not `self.protocol_len()` long.
    pub fn set_target_protocol_addr(&mut self, value: &[u8]) {
        let (hardware_len, protocol_len) = (self.hardware_len(), self.protocol_len());
        self.0[field::TPA(hardware_len, protocol_len)].copy_from_slice(value)
    }
}

impl AsRef<[u8]> for arp {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for arp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

/// A borrowed high-level view of an ARP packet.
///
/// The four address fields are slices into the underlying buffer, so a `Repr`
/// never outlives the packet it was parsed from and carries no storage of its
/// own. The declared lengths are implied by the slice lengths.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr<'a> {
    /// The hardware address space identifier.
    pub hardware_type: Hardware,
    /// The protocol address space identifier.
    pub protocol_type: Protocol,
    /// The operation code.
    pub operation: Operation,
    /// The sender hardware address.
    pub source_hardware_addr: &'a [u8],
    /// The sender protocol address.
    pub source_protocol_addr: &'a [u8],
    /// The target hardware address; `None` when unknown, emitted as zeroes.
    pub target_hardware_addr: Option<&'a [u8]>,
    /// The target protocol address.
    pub target_protocol_addr: &'a [u8],
}

impl<'a> Repr<'a> {
    /// Parse an ARP packet and return a high-level view of its fields.
    ///
    /// Performs the length check itself, so it can be called on an unchecked
    /// packet. Packets declaring a zero hardware or protocol address length
    /// are rejected as `Malformed`.
    pub fn parse(packet: &'a arp) -> Result<Repr<'a>> {
        packet.check_len()?;
        if packet.hardware_len() == 0 || packet.protocol_len() == 0 {
            return Err(Error::Malformed);
        }
        Ok(Repr {
            hardware_type: packet.hardware_type(),
            protocol_type: packet.protocol_type(),
            operation: packet.operation(),
            source_hardware_addr: packet.source_hardware_addr(),
            source_protocol_addr: packet.source_protocol_addr(),
            target_hardware_addr: Some(packet.target_hardware_addr()),
            target_protocol_addr: packet.target_protocol_addr(),
        })
    }

    /// The hardware address length this view will declare when emitted.
    pub fn hardware_len(&self) -> u8 {
        self.source_hardware_addr.len() as u8
    }

    /// The protocol address length this view will declare when emitted.
    pub fn protocol_len(&self) -> u8 {
        self.source_protocol_addr.len() as u8
    }

    /// Return the length of a packet that will be emitted from this view.
    pub fn buffer_len(&self) -> usize {
        header_len(self.hardware_len(), self.protocol_len())
    }

    /// Emit this view into an ARP packet.
    ///
    /// The length fields are derived from the source address slices; the
    /// target slices, where present, must agree with them.
    ///
    /// # Panics
    /// The function panics if the buffer is shorter than [`buffer_len`], if an
    /// address slice is longer than 255 octets, or if the source and target
    /// slices of one address family differ in length. Callers on hardened
    /// paths validate the lengths before constructing the view.
    ///
    /// [`buffer_len`]: #method.buffer_len
    pub fn emit(&self, packet: &mut arp) {
        debug_assert!(self.source_hardware_addr.len() <= 255);
        debug_assert!(self.source_protocol_addr.len() <= 255);

        packet.set_hardware_type(self.hardware_type);
        packet.set_protocol_type(self.protocol_type);
        packet.set_hardware_len(self.hardware_len());
        packet.set_protocol_len(self.protocol_len());
        packet.set_operation(self.operation);
        packet.set_source_hardware_addr(self.source_hardware_addr);
        packet.set_source_protocol_addr(self.source_protocol_addr);
        match self.target_hardware_addr {
            Some(addr) => packet.set_target_hardware_addr(addr),
            None => packet.zero_target_hardware_addr(),
        }
        packet.set_target_protocol_addr(self.target_protocol_addr);
    }
}

struct Bytes<'a>(&'a [u8]);

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, byte) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ":")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ARP htype={:?} ptype={} op={:?} src={}/{} tgt=",
               self.hardware_type, self.protocol_type, self.operation,
               Bytes(self.source_hardware_addr), Bytes(self.source_protocol_addr))?;
        match self.target_hardware_addr {
            Some(addr) => write!(f, "{}", Bytes(addr))?,
            None => write!(f, "?")?,
        }
        write!(f, "/{}", Bytes(self.target_protocol_addr))
    }
}
