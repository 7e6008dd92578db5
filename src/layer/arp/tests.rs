use std::cell::Cell;
use std::rc::Rc;

use crate::layer::{eth, Error};
use crate::nic::{Device, PacketType, Pool};
use crate::wire::{
    arp_packet, ethernet_frame, payload, ArpHardware, ArpOperation, ArpRepr, EtherType,
    EthernetAddress, EthernetRepr, Ipv4Address, Payload, PayloadMut,
};

use super::{Endpoint, Message, NeighborCache, NeighborMapping, PendingQueue, Router};

static MAC_HOST: [u8; 6] = [0, 1, 2, 3, 4, 5];
static IP_HOST: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
static MAC_OTHER: [u8; 6] = [6, 5, 4, 3, 2, 1];
static IP_OTHER: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);

const ETH_HEADER: usize = 14;
const ARP_ETH_IPV4: usize = 28;

/// A buffer that records its release in a shared counter.
///
/// Both the drop paths and the transmit path of the device end up here, so a
/// test can assert that every reachable path releases a buffer exactly once.
struct Tracked {
    data: Vec<u8>,
    released: Rc<Cell<usize>>,
}

impl Tracked {
    fn new(data: Vec<u8>, released: &Rc<Cell<usize>>) -> Self {
        Tracked { data, released: released.clone() }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

impl Payload for Tracked {
    fn payload(&self) -> &payload {
        self.data.as_slice().into()
    }
}

impl PayloadMut for Tracked {
    fn payload_mut(&mut self) -> &mut payload {
        self.data.as_mut_slice().into()
    }

    fn resize(&mut self, length: usize) -> Result<(), crate::wire::PayloadError> {
        self.data.resize(length, 0u8);
        Ok(())
    }
}

struct TestPool {
    released: Rc<Cell<usize>>,
    allocations: usize,
    capacity: usize,
}

impl TestPool {
    fn new(released: &Rc<Cell<usize>>, capacity: usize) -> Self {
        TestPool { released: released.clone(), allocations: 0, capacity }
    }
}

impl Pool for TestPool {
    type Buffer = Tracked;

    fn alloc(&mut self, length: usize) -> Option<Tracked> {
        if self.allocations == self.capacity {
            return None;
        }
        self.allocations += 1;
        Some(Tracked::new(vec![0u8; length], &self.released))
    }
}

struct TestDevice {
    hardware: [u8; 6],
    protocol: Ipv4Address,
    arp_capable: bool,
    fail_transmit: bool,
    transmitted: Vec<Vec<u8>>,
}

impl TestDevice {
    fn new() -> Self {
        TestDevice {
            hardware: MAC_HOST,
            protocol: IP_HOST,
            arp_capable: true,
            fail_transmit: false,
            transmitted: Vec::new(),
        }
    }
}

impl Device for TestDevice {
    type Buffer = Tracked;

    fn addr_len(&self) -> u8 {
        6
    }

    fn hardware_type(&self) -> ArpHardware {
        ArpHardware::Ethernet
    }

    fn arp_capable(&self) -> bool {
        self.arp_capable
    }

    fn hardware_addr(&self) -> &[u8] {
        &self.hardware
    }

    fn protocol_addr(&self) -> Ipv4Address {
        self.protocol
    }

    fn header_len(&self) -> usize {
        ETH_HEADER
    }

    fn build_header(
        &self,
        buffer: &mut Tracked,
        protocol: EtherType,
        dest: Option<&[u8]>,
        source: &[u8],
    ) -> Result<(), Error> {
        let frame = ethernet_frame::new_checked_mut(buffer.payload_mut().as_mut_slice())
            .map_err(|_| Error::BadSize)?;
        EthernetRepr {
            src_addr: EthernetAddress::from_bytes(source),
            dst_addr: dest.map_or(EthernetAddress::BROADCAST, EthernetAddress::from_bytes),
            ethertype: protocol,
        }
        .emit(frame);
        Ok(())
    }

    fn link_destination<'p>(&self, buffer: &'p mut Tracked) -> &'p mut [u8] {
        &mut buffer.payload_mut().as_mut_slice()[..6]
    }

    fn classify(&self, buffer: &Tracked) -> PacketType {
        let frame = match ethernet_frame::new_checked(buffer.payload().as_slice()) {
            Ok(frame) => frame,
            Err(_) => return PacketType::Other,
        };
        let dst = frame.dst_addr();
        if dst.as_bytes() == &self.hardware[..] {
            PacketType::Host
        } else if dst.is_broadcast() {
            PacketType::Broadcast
        } else if dst.is_multicast() {
            PacketType::Multicast
        } else {
            PacketType::Other
        }
    }

    fn transmit(&mut self, buffer: Tracked) -> Result<(), Error> {
        if self.fail_transmit {
            return Err(Error::Exhausted);
        }
        self.transmitted.push(buffer.payload().as_slice().to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct TestRouter {
    routes: Vec<(Ipv4Address, Ipv4Address)>,
    local: Vec<Ipv4Address>,
}

impl Router for TestRouter {
    fn lookup(&self, destination: Ipv4Address) -> Option<Ipv4Address> {
        self.routes
            .iter()
            .find(|(dest, _)| *dest == destination)
            .map(|(_, hop)| *hop)
    }

    fn is_local(&self, addr: Ipv4Address) -> bool {
        self.local.contains(&addr)
    }
}

/// Records each flush together with the release count at that moment, so
/// tests can assert that the flush strictly precedes the buffer release.
struct TestQueue {
    flushes: Vec<(Vec<u8>, usize)>,
    released: Rc<Cell<usize>>,
}

impl TestQueue {
    fn new(released: &Rc<Cell<usize>>) -> Self {
        TestQueue { flushes: Vec::new(), released: released.clone() }
    }
}

impl PendingQueue for TestQueue {
    fn flush(&mut self, protocol_addr: &[u8]) {
        self.flushes.push((protocol_addr.to_vec(), self.released.get()));
    }
}

/// A mapping whose inserts always fail, for the best-effort learning path.
struct FailingMapping;

impl NeighborMapping for FailingMapping {
    fn lookup(&self, _: &[u8]) -> Option<&[u8]> {
        None
    }

    fn add(&mut self, _: &[u8], _: &[u8]) -> Result<(), Error> {
        Err(Error::Exhausted)
    }
}

fn arp_frame(
    operation: ArpOperation,
    source_mac: &[u8; 6],
    source_ip: Ipv4Address,
    target_mac: &[u8; 6],
    target_ip: Ipv4Address,
    link_dst: EthernetAddress,
) -> Vec<u8> {
    let mut bytes = vec![0u8; ETH_HEADER + ARP_ETH_IPV4];
    {
        let frame = ethernet_frame::new_unchecked_mut(&mut bytes);
        EthernetRepr {
            src_addr: EthernetAddress(*source_mac),
            dst_addr: link_dst,
            ethertype: EtherType::Arp,
        }
        .emit(frame);
        let packet = arp_packet::new_unchecked_mut(frame.payload_mut_slice());
        ArpRepr {
            hardware_type: ArpHardware::Ethernet,
            protocol_type: EtherType::Ipv4,
            operation,
            source_hardware_addr: &source_mac[..],
            source_protocol_addr: source_ip.as_bytes(),
            target_hardware_addr: Some(&target_mac[..]),
            target_protocol_addr: target_ip.as_bytes(),
        }
        .emit(packet);
    }
    bytes
}

fn request_for_host() -> Vec<u8> {
    arp_frame(
        ArpOperation::Request,
        &MAC_OTHER,
        IP_OTHER,
        &[0; 6],
        IP_HOST,
        EthernetAddress::BROADCAST,
    )
}

fn request_message() -> Message<'static> {
    Message {
        operation: ArpOperation::Request,
        protocol_type: EtherType::Ipv4,
        hardware_len: 6,
        protocol_len: 4,
        source_hardware_addr: None,
        source_protocol_addr: IP_HOST.as_bytes(),
        dest_hardware_addr: None,
        dest_protocol_addr: IP_OTHER.as_bytes(),
        link_target_addr: None,
    }
}

#[test]
fn send_rejects_bad_arguments() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();
    let mut endpoint = Endpoint::new(&mut pool, &router, &mut cache, &mut queue);

    let mut message = request_message();
    message.hardware_len = 0;
    assert_eq!(endpoint.send(&mut device, message), Err(Error::Illegal));

    let mut message = request_message();
    message.protocol_len = 0;
    assert_eq!(endpoint.send(&mut device, message), Err(Error::Illegal));

    // Not the hardware address length of the device.
    let mut message = request_message();
    message.hardware_len = 8;
    assert_eq!(endpoint.send(&mut device, message), Err(Error::Illegal));

    // Protocol address slices must match the declared length.
    let mut message = request_message();
    message.source_protocol_addr = &[10, 0, 0];
    assert_eq!(endpoint.send(&mut device, message), Err(Error::Illegal));

    drop(endpoint);
    assert_eq!(pool.allocations, 0);
    assert!(device.transmitted.is_empty());
    assert_eq!(released.get(), 0);
}

#[test]
fn send_rejects_arp_incapable_device() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();
    device.arp_capable = false;

    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .send(&mut device, request_message());

    assert_eq!(result, Err(Error::Illegal));
    assert_eq!(pool.allocations, 0);
    assert!(device.transmitted.is_empty());
}

#[test]
fn send_emits_request() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .send(&mut device, request_message());
    assert_eq!(result, Ok(()));

    assert_eq!(pool.allocations, 1);
    assert_eq!(released.get(), 1);
    assert_eq!(device.transmitted.len(), 1);

    let frame = ethernet_frame::new_checked(&device.transmitted[0][..]).unwrap();
    assert_eq!(frame.dst_addr(), EthernetAddress::BROADCAST);
    assert_eq!(frame.src_addr(), EthernetAddress(MAC_HOST));
    assert_eq!(frame.ethertype(), EtherType::Arp);

    let packet = arp_packet::new_checked(frame.payload_slice()).unwrap();
    assert_eq!(packet.hardware_type(), ArpHardware::Ethernet);
    assert_eq!(packet.protocol_type(), EtherType::Ipv4);
    assert_eq!(packet.hardware_len(), 6);
    assert_eq!(packet.protocol_len(), 4);
    assert_eq!(packet.operation(), ArpOperation::Request);
    assert_eq!(packet.source_hardware_addr(), &MAC_HOST[..]);
    assert_eq!(packet.source_protocol_addr(), IP_HOST.as_bytes());
    // The target hardware address is unknown and so emitted as zeroes.
    assert_eq!(packet.target_hardware_addr(), &[0u8; 6][..]);
    assert_eq!(packet.target_protocol_addr(), IP_OTHER.as_bytes());
}

#[test]
fn send_propagates_pool_exhaustion() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 0);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .send(&mut device, request_message());

    assert_eq!(result, Err(Error::Exhausted));
    assert!(device.transmitted.is_empty());
}

#[test]
fn send_propagates_transmit_failure() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();
    device.fail_transmit = true;

    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .send(&mut device, request_message());

    assert_eq!(result, Err(Error::Exhausted));
    // The transmit path consumed the buffer despite the failure.
    assert_eq!(released.get(), 1);
}

fn outbound_buffer(released: &Rc<Cell<usize>>) -> Tracked {
    Tracked::new(vec![0xaa; ETH_HEADER + 20], released)
}

#[test]
fn resolve_local_marks_zero() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let mut router = TestRouter::default();
    router.routes.push((IP_HOST, IP_HOST));
    router.local.push(IP_HOST);
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let device = TestDevice::new();

    let mut buffer = outbound_buffer(&released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .resolve(&device, IP_HOST, &mut buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(&buffer.data[..6], &[0u8; 6][..]);
}

#[test]
fn resolve_limited_broadcast_marks_ones() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let mut router = TestRouter::default();
    router.routes.push((Ipv4Address::BROADCAST, Ipv4Address::BROADCAST));
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let device = TestDevice::new();

    let mut buffer = outbound_buffer(&released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .resolve(&device, Ipv4Address::BROADCAST, &mut buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(&buffer.data[..6], &[0xff; 6][..]);
}

#[test]
fn resolve_copies_cached_neighbor() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let mut router = TestRouter::default();
    router.routes.push((IP_OTHER, IP_OTHER));
    let mut cache = NeighborCache::new();
    cache.add(IP_OTHER.as_bytes(), &MAC_OTHER).unwrap();
    let mut queue = TestQueue::new(&released);
    let device = TestDevice::new();

    let mut buffer = outbound_buffer(&released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .resolve(&device, IP_OTHER, &mut buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(&buffer.data[..6], &MAC_OTHER[..]);
}

#[test]
fn resolve_miss_leaves_buffer_untouched() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let mut router = TestRouter::default();
    router.routes.push((IP_OTHER, IP_OTHER));
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let device = TestDevice::new();

    let mut buffer = outbound_buffer(&released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .resolve(&device, IP_OTHER, &mut buffer);

    assert_eq!(result, Err(Error::Unresolved));
    assert_eq!(&buffer.data[..6], &[0xaa; 6][..]);
}

#[test]
fn resolve_unroutable_destination() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let device = TestDevice::new();

    let mut buffer = outbound_buffer(&released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .resolve(&device, IP_OTHER, &mut buffer);

    assert_eq!(result, Err(Error::Unreachable));
}

#[test]
fn request_for_us_is_answered() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let buffer = Tracked::new(request_for_host(), &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);
    assert_eq!(result, Ok(()));

    assert_eq!(released.get(), 1);
    assert_eq!(device.transmitted.len(), 1);

    let frame = ethernet_frame::new_checked(&device.transmitted[0][..]).unwrap();
    assert_eq!(frame.dst_addr(), EthernetAddress(MAC_OTHER));
    assert_eq!(frame.src_addr(), EthernetAddress(MAC_HOST));
    assert_eq!(frame.ethertype(), EtherType::Arp);

    let packet = arp_packet::new_checked(frame.payload_slice()).unwrap();
    assert_eq!(packet.operation(), ArpOperation::Reply);
    assert_eq!(packet.source_hardware_addr(), &MAC_HOST[..]);
    assert_eq!(packet.source_protocol_addr(), IP_HOST.as_bytes());
    assert_eq!(packet.target_hardware_addr(), &MAC_OTHER[..]);
    assert_eq!(packet.target_protocol_addr(), IP_OTHER.as_bytes());
}

#[test]
fn request_for_somebody_else_is_dropped() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let frame = arp_frame(
        ArpOperation::Request,
        &MAC_OTHER,
        IP_OTHER,
        &[0; 6],
        Ipv4Address::new(10, 0, 0, 3),
        EthernetAddress::BROADCAST,
    );
    let buffer = Tracked::new(frame, &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(released.get(), 1);
    assert!(device.transmitted.is_empty());
}

#[test]
fn request_for_foreign_protocol_is_dropped() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let mut frame = request_for_host();
    // Rewrite the protocol space to IPv6.
    frame[ETH_HEADER + 2] = 0x86;
    frame[ETH_HEADER + 3] = 0xdd;
    let buffer = Tracked::new(frame, &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(released.get(), 1);
    assert!(device.transmitted.is_empty());
}

#[test]
fn reply_learns_then_flushes_then_releases() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let frame = arp_frame(
        ArpOperation::Reply,
        &MAC_OTHER,
        IP_OTHER,
        &MAC_HOST,
        IP_HOST,
        EthernetAddress(MAC_HOST),
    );
    let buffer = Tracked::new(frame, &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);
    assert_eq!(result, Ok(()));

    assert_eq!(cache.lookup(IP_OTHER.as_bytes()), Some(&MAC_OTHER[..]));
    // Exactly one flush, keyed by the sender protocol address, strictly
    // before the buffer release.
    assert_eq!(queue.flushes.len(), 1);
    assert_eq!(queue.flushes[0].0, IP_OTHER.as_bytes());
    assert_eq!(queue.flushes[0].1, 0);
    assert_eq!(released.get(), 1);
    assert!(device.transmitted.is_empty());
}

#[test]
fn reply_learning_failure_is_nonfatal() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut mapping = FailingMapping;
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let frame = arp_frame(
        ArpOperation::Reply,
        &MAC_OTHER,
        IP_OTHER,
        &MAC_HOST,
        IP_HOST,
        EthernetAddress(MAC_HOST),
    );
    let buffer = Tracked::new(frame, &released);
    let result = Endpoint::new(&mut pool, &router, &mut mapping, &mut queue)
        .receive(&mut device, buffer);

    // The failure is reported, but the queue was still flushed and the
    // buffer still released.
    assert_eq!(result, Err(Error::Exhausted));
    assert_eq!(queue.flushes.len(), 1);
    assert_eq!(released.get(), 1);
}

#[test]
fn frame_for_another_host_is_dropped() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let frame = arp_frame(
        ArpOperation::Request,
        &MAC_OTHER,
        IP_OTHER,
        &[0; 6],
        IP_HOST,
        // Unicast, but not our address: classified as for somebody else.
        EthernetAddress([0x02, 0x22, 0x22, 0x22, 0x22, 0x22]),
    );
    let buffer = Tracked::new(frame, &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(released.get(), 1);
    assert!(device.transmitted.is_empty());
}

#[test]
fn truncated_packet_is_dropped() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let mut frame = request_for_host();
    // One octet short of the header the packet declares.
    frame.truncate(ETH_HEADER + ARP_ETH_IPV4 - 1);
    let buffer = Tracked::new(frame, &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(released.get(), 1);
    assert!(device.transmitted.is_empty());
}

#[test]
fn unknown_operation_is_dropped() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let mut frame = request_for_host();
    frame[ETH_HEADER + 7] = 7;
    let buffer = Tracked::new(frame, &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(released.get(), 1);
    assert!(device.transmitted.is_empty());
}

#[test]
fn foreign_hardware_length_is_dropped() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();

    let mut frame = request_for_host();
    // Claim eight-octet hardware addresses; the packet gets long enough to
    // still parse, but the device can not match it.
    frame[ETH_HEADER + 4] = 8;
    frame.resize(ETH_HEADER + 8 + 2 * 8 + 2 * 4, 0u8);
    let buffer = Tracked::new(frame, &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(released.get(), 1);
    assert!(device.transmitted.is_empty());
}

#[test]
fn arp_incapable_device_drops_everything() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();
    device.arp_capable = false;

    let buffer = Tracked::new(request_for_host(), &released);
    let result = Endpoint::new(&mut pool, &router, &mut cache, &mut queue)
        .receive(&mut device, buffer);

    assert_eq!(result, Ok(()));
    assert_eq!(released.get(), 1);
    assert!(device.transmitted.is_empty());
}

#[test]
fn dispatcher_routes_by_ethertype() {
    let released = Rc::new(Cell::new(0));
    let mut pool = TestPool::new(&released, 4);
    let router = TestRouter::default();
    let mut cache = NeighborCache::new();
    let mut queue = TestQueue::new(&released);
    let mut device = TestDevice::new();
    let mut endpoint = Endpoint::new(&mut pool, &router, &mut cache, &mut queue);

    let mut dispatcher = eth::Dispatcher::<TestDevice>::new();
    dispatcher.bind(EtherType::Arp, &mut endpoint);

    let buffer = Tracked::new(request_for_host(), &released);
    assert_eq!(dispatcher.dispatch(&mut device, buffer), Ok(()));
    assert_eq!(device.transmitted.len(), 1);
    assert_eq!(released.get(), 1);

    // A frame of an unbound protocol is dropped without processing.
    let mut frame = request_for_host();
    frame[12] = 0x08;
    frame[13] = 0x00;
    let buffer = Tracked::new(frame, &released);
    assert_eq!(dispatcher.dispatch(&mut device, buffer), Ok(()));
    assert_eq!(device.transmitted.len(), 1);
    assert_eq!(released.get(), 2);
}
