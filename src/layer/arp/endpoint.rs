use crate::layer::{eth, Error, Result};
use crate::nic::{Device, PacketType, Pool, MAX_ADDR_LEN};
use crate::wire::{arp, EtherType, Ipv4Address, Payload, PayloadMut};

use super::neighbor::NeighborMapping;

/// The routing collaborator of the resolver.
///
/// Maps a destination to the immediately reachable next hop and knows which
/// addresses belong to the host itself.
pub trait Router {
    /// Find the next hop towards `destination`, `None` when unreachable.
    fn lookup(&self, destination: Ipv4Address) -> Option<Ipv4Address>;

    /// Whether `addr` is one of the host's own configured addresses.
    ///
    /// The match is neither strict nor broadcast-only: loopback and any
    /// locally configured unicast address answer `true`.
    fn is_local(&self, addr: Ipv4Address) -> bool;
}

/// The queue of packets awaiting resolution.
///
/// The engine never queues packets itself; it only notifies the queue when a
/// mapping has been learned so that waiting packets can be re-driven.
pub trait PendingQueue {
    /// Release any packets that were waiting for `protocol_addr` to resolve.
    fn flush(&mut self, protocol_addr: &[u8]);
}

/// Parameters of one ARP message to be emitted.
///
/// Address slices must agree with the declared lengths; `send` validates
/// this before any resources are touched. An absent source hardware address
/// defaults to the device's own. An absent destination hardware address is
/// emitted as zeroes, marking the target as unknown as in outgoing requests.
/// The link target is the destination of the link-layer frame itself; absent
/// means link broadcast.
#[derive(Debug, Clone, Copy)]
pub struct Message<'a> {
    /// Operation code of the message.
    pub operation: arp::Operation,
    /// Protocol address space the message resolves for.
    pub protocol_type: EtherType,
    /// Declared hardware address length.
    pub hardware_len: u8,
    /// Declared protocol address length.
    pub protocol_len: u8,
    /// Sender hardware address; `None` for the device's own.
    pub source_hardware_addr: Option<&'a [u8]>,
    /// Sender protocol address.
    pub source_protocol_addr: &'a [u8],
    /// Target hardware address; `None` when unknown.
    pub dest_hardware_addr: Option<&'a [u8]>,
    /// Target protocol address.
    pub dest_protocol_addr: &'a [u8],
    /// Destination of the link-layer frame; `None` for link broadcast.
    pub link_target_addr: Option<&'a [u8]>,
}

/// The address resolution engine.
///
/// Holds no state of its own, only borrows of the collaborators that do. It
/// is constructed cheaply wherever the stack processes packets and can be
/// used reentrantly from multiple execution contexts as long as the
/// collaborators provide their own synchronization.
pub struct Endpoint<'a, B> {
    pool: &'a mut dyn Pool<Buffer = B>,
    router: &'a dyn Router,
    neighbors: &'a mut dyn NeighborMapping,
    queue: &'a mut dyn PendingQueue,
}

impl<'a, B: Payload + PayloadMut> Endpoint<'a, B> {
    /// Create an endpoint over the given collaborators.
    pub fn new(
        pool: &'a mut dyn Pool<Buffer = B>,
        router: &'a dyn Router,
        neighbors: &'a mut dyn NeighborMapping,
        queue: &'a mut dyn PendingQueue,
    ) -> Self {
        Endpoint { pool, router, neighbors, queue }
    }

    /// Emit one ARP message on `device`.
    ///
    /// Validates the message against the device before any allocation: zero
    /// address lengths, slices disagreeing with the declared lengths, a
    /// hardware length other than the device's, or an ARP-incapable device
    /// all return `Illegal` without side effect. A pool failure returns
    /// `Exhausted`. Once built, the frame is consumed by the device transmit
    /// path whether transmission succeeds or not.
    pub fn send<D>(&mut self, device: &mut D, message: Message<'_>) -> Result<()>
    where
        D: Device<Buffer = B>,
    {
        message.validate(device)?;
        if !device.arp_capable() {
            return Err(Error::Illegal);
        }

        let length = device.header_len()
            + arp::header_len(message.hardware_len, message.protocol_len);
        let mut buffer = self.pool.alloc(length).ok_or(Error::Exhausted)?;

        // An error past this point releases the buffer by dropping it.
        build(device, &mut buffer, &message)?;

        net_trace!("arp: sending {:?}", message.operation);
        device.transmit(buffer)
    }

    /// Decide the destination hardware address of an outgoing packet.
    ///
    /// `buffer` must hold a frame built by `device`; only its link-level
    /// destination field is touched. Local next hops are marked with the
    /// all-zero address that the link layer treats as local delivery, the
    /// limited broadcast with all-ones. Anything else is looked up in the
    /// neighbour mapping; a miss returns `Unresolved` and leaves the
    /// destination field untouched, queueing and the eventual request are the
    /// caller's business.
    pub fn resolve<D>(&mut self, device: &D, destination: Ipv4Address, buffer: &mut B) -> Result<()>
    where
        D: Device<Buffer = B>,
    {
        let next_hop = self.router.lookup(destination).ok_or(Error::Unreachable)?;

        if self.router.is_local(next_hop) {
            for byte in device.link_destination(buffer) {
                *byte = 0x00;
            }
            return Ok(());
        }

        if next_hop == Ipv4Address::BROADCAST {
            for byte in device.link_destination(buffer) {
                *byte = 0xff;
            }
            return Ok(());
        }

        match self.neighbors.lookup(next_hop.as_bytes()) {
            Some(hardware_addr) => {
                let dest = device.link_destination(buffer);
                if hardware_addr.len() != dest.len() {
                    return Err(Error::Illegal);
                }
                dest.copy_from_slice(hardware_addr);
                Ok(())
            }
            None => Err(Error::Unresolved),
        }
    }

    /// Process one received frame, consuming the buffer on every outcome.
    ///
    /// Frames that are not for this host, arrive on an ARP-incapable device,
    /// fail to parse, or carry addresses the device can not validate are
    /// dropped silently: the buffer is released and the call reports
    /// success, since a misbehaving peer is not a local fault. Requests
    /// addressed to us produce exactly one transmitted reply; replies update
    /// the neighbour mapping and flush the pending queue.
    pub fn receive<D>(&mut self, device: &mut D, buffer: B) -> Result<()>
    where
        D: Device<Buffer = B>,
    {
        match device.classify(&buffer) {
            PacketType::Host | PacketType::Broadcast | PacketType::Multicast => (),
            PacketType::Other => {
                net_trace!("arp: ignoring frame for another host");
                return Ok(());
            }
        }

        if !device.arp_capable() {
            net_debug!("arp: dropping frame on arp-incapable device");
            return Ok(());
        }

        self.process(device, buffer)
    }

    /// Structural validation and dispatch by operation code.
    fn process<D>(&mut self, device: &mut D, buffer: B) -> Result<()>
    where
        D: Device<Buffer = B>,
    {
        let operation = {
            let payload = buffer.payload().as_slice();
            let payload = match payload.get(device.header_len()..) {
                Some(payload) => payload,
                None => {
                    net_debug!("arp: dropping frame shorter than its link header");
                    return Ok(());
                }
            };
            let packet = match arp::arp::new_checked(payload) {
                Ok(packet) => packet,
                Err(_) => {
                    net_debug!("arp: dropping truncated packet");
                    return Ok(());
                }
            };

            if packet.hardware_type() != device.hardware_type()
                || packet.hardware_len() != device.addr_len()
                || usize::from(packet.hardware_len()) > MAX_ADDR_LEN
                || usize::from(packet.protocol_len()) > MAX_ADDR_LEN
            {
                net_debug!("arp: dropping packet with foreign hardware address info");
                return Ok(());
            }

            packet.operation()
        };

        match operation {
            arp::Operation::Request => self.handle_request(device, buffer),
            arp::Operation::Reply => self.handle_reply(device, buffer),
            arp::Operation::Unknown(_) => {
                net_debug!("arp: dropping packet with unknown operation");
                Ok(())
            }
        }
    }

    /// Answer a request addressed to us by rebuilding the buffer in place.
    fn handle_request<D>(&mut self, device: &mut D, mut buffer: B) -> Result<()>
    where
        D: Device<Buffer = B>,
    {
        let own_protocol = device.protocol_addr();
        let mut sender_hardware = [0u8; MAX_ADDR_LEN];
        let mut sender_protocol = [0u8; MAX_ADDR_LEN];
        let (hardware_len, protocol_len);

        {
            let payload = &buffer.payload().as_slice()[device.header_len()..];
            // Bounds were established in `process`, the buffer is unchanged.
            let packet = arp::arp::new_unchecked(payload);

            if packet.protocol_type() != EtherType::Ipv4
                || packet.protocol_len() != Ipv4Address::ADDR_LEN
            {
                net_debug!("arp: dropping request for an unsupported protocol");
                return Ok(());
            }

            if packet.target_protocol_addr() != own_protocol.as_bytes() {
                net_trace!("arp: request is not for us");
                return Ok(());
            }

            hardware_len = usize::from(packet.hardware_len());
            protocol_len = usize::from(packet.protocol_len());
            sender_hardware[..hardware_len].copy_from_slice(packet.source_hardware_addr());
            sender_protocol[..protocol_len].copy_from_slice(packet.source_protocol_addr());
        }

        let reply = Message {
            operation: arp::Operation::Reply,
            protocol_type: EtherType::Ipv4,
            hardware_len: hardware_len as u8,
            protocol_len: protocol_len as u8,
            source_hardware_addr: None,
            source_protocol_addr: own_protocol.as_bytes(),
            dest_hardware_addr: Some(&sender_hardware[..hardware_len]),
            dest_protocol_addr: &sender_protocol[..protocol_len],
            link_target_addr: Some(&sender_hardware[..hardware_len]),
        };

        build(device, &mut buffer, &reply)?;

        net_trace!("arp: answering request for {}", own_protocol);
        device.transmit(buffer)
    }

    /// Learn the sender mapping of a reply and wake the pending queue.
    fn handle_reply<D>(&mut self, device: &mut D, buffer: B) -> Result<()>
    where
        D: Device<Buffer = B>,
    {
        let mut sender_hardware = [0u8; MAX_ADDR_LEN];
        let mut sender_protocol = [0u8; MAX_ADDR_LEN];
        let (hardware_len, protocol_len);

        {
            let payload = &buffer.payload().as_slice()[device.header_len()..];
            let packet = arp::arp::new_unchecked(payload);
            hardware_len = usize::from(packet.hardware_len());
            protocol_len = usize::from(packet.protocol_len());
            sender_hardware[..hardware_len].copy_from_slice(packet.source_hardware_addr());
            sender_protocol[..protocol_len].copy_from_slice(packet.source_protocol_addr());
        }

        // Learning is best-effort: a failure is reported but blocks neither
        // the queue flush nor the release of the buffer.
        let learned = self.neighbors.add(
            &sender_protocol[..protocol_len],
            &sender_hardware[..hardware_len],
        );
        if learned.is_err() {
            net_debug!("arp: failed to record neighbour mapping");
        }

        self.queue.flush(&sender_protocol[..protocol_len]);
        drop(buffer);
        learned
    }
}

/// Build a complete frame: link header first, then the ARP header.
///
/// The device constructs its own header; the ARP part is emitted behind it.
/// The buffer is left untouched past the emitted headers.
fn build<D: Device>(device: &D, buffer: &mut D::Buffer, message: &Message<'_>) -> Result<()> {
    let source_hardware = match message.source_hardware_addr {
        Some(addr) => addr,
        None => device.hardware_addr(),
    };

    device.build_header(buffer, EtherType::Arp, message.link_target_addr, source_hardware)?;

    let header_len = arp::header_len(message.hardware_len, message.protocol_len);
    let payload = buffer.payload_mut().as_mut_slice();
    let payload = payload.get_mut(device.header_len()..).ok_or(Error::BadSize)?;
    if payload.len() < header_len {
        return Err(Error::BadSize);
    }

    arp::Repr {
        hardware_type: device.hardware_type(),
        protocol_type: message.protocol_type,
        operation: message.operation,
        source_hardware_addr: source_hardware,
        source_protocol_addr: message.source_protocol_addr,
        target_hardware_addr: message.dest_hardware_addr,
        target_protocol_addr: message.dest_protocol_addr,
    }
    .emit(arp::arp::new_unchecked_mut(payload));

    Ok(())
}

impl Message<'_> {
    /// Check the message against the device it is to be sent on.
    fn validate<D: Device>(&self, device: &D) -> Result<()> {
        if self.hardware_len == 0 || self.protocol_len == 0 {
            return Err(Error::Illegal);
        }

        if usize::from(self.hardware_len) > MAX_ADDR_LEN {
            return Err(Error::Illegal);
        }

        if self.hardware_len != device.addr_len() {
            return Err(Error::Illegal);
        }

        let hardware_len = usize::from(self.hardware_len);
        let protocol_len = usize::from(self.protocol_len);

        if self.source_protocol_addr.len() != protocol_len
            || self.dest_protocol_addr.len() != protocol_len
        {
            return Err(Error::Illegal);
        }

        let hardware_slices = [
            self.source_hardware_addr,
            self.dest_hardware_addr,
            self.link_target_addr,
        ];
        if hardware_slices.iter().any(|slice| {
            slice.map_or(false, |addr| addr.len() != hardware_len)
        }) {
            return Err(Error::Illegal);
        }

        Ok(())
    }
}

impl<B, D> eth::Recv<D> for Endpoint<'_, B>
where
    B: Payload + PayloadMut,
    D: Device<Buffer = B>,
{
    fn receive(&mut self, device: &mut D, buffer: D::Buffer) -> Result<()> {
        Endpoint::receive(self, device, buffer)
    }
}
