//! Dispatch of link-layer frames to protocol handlers.
//!
//! The stack owns an explicit table mapping protocol identifiers to their
//! handlers, constructed once at initialization. There is no implicit global
//! registry: whoever builds the [`Dispatcher`] decides which protocols exist.
//!
//! [`Dispatcher`]: struct.Dispatcher.html

use crate::nic::Device;
use crate::wire::{ethernet_frame, EtherType, Payload};
use super::Result;

/// A handler bound to one link-layer protocol identifier.
///
/// Receives frames whose EtherType matched the binding. The handler takes
/// ownership of the buffer and must release it on every outcome, usually by
/// consuming it through the device or by dropping it.
pub trait Recv<D: Device> {
    /// Process one received frame.
    fn receive(&mut self, device: &mut D, buffer: D::Buffer) -> Result<()>;
}

impl<D: Device, R: Recv<D> + ?Sized> Recv<D> for &'_ mut R {
    fn receive(&mut self, device: &mut D, buffer: D::Buffer) -> Result<()> {
        (**self).receive(device, buffer)
    }
}

/// An explicit protocol dispatch table for Ethernet framed devices.
///
/// Bindings are registered at startup; afterwards [`dispatch`] routes each
/// received buffer by its EtherType field. Frames with an unreadable type
/// field or without a bound handler are dropped silently, they are traffic
/// for somebody else.
///
/// [`dispatch`]: #method.dispatch
#[cfg(feature = "std")]
pub struct Dispatcher<'a, D: Device> {
    bindings: Vec<(EtherType, &'a mut dyn Recv<D>)>,
}

#[cfg(feature = "std")]
impl<'a, D: Device> Dispatcher<'a, D> {
    /// Create a dispatcher without any bindings.
    pub fn new() -> Self {
        Dispatcher { bindings: Vec::new() }
    }

    /// Bind a handler to a protocol identifier.
    ///
    /// A previous binding for the same identifier is replaced.
    pub fn bind(&mut self, ethertype: EtherType, handler: &'a mut dyn Recv<D>) {
        match self.bindings.iter_mut().find(|(bound, _)| *bound == ethertype) {
            Some(binding) => binding.1 = handler,
            None => self.bindings.push((ethertype, handler)),
        }
    }

    /// Route one received frame to the handler bound to its EtherType.
    pub fn dispatch(&mut self, device: &mut D, buffer: D::Buffer) -> Result<()> {
        let ethertype = match ethernet_frame::new_checked(buffer.payload().as_slice()) {
            Ok(frame) => frame.ethertype(),
            Err(_) => {
                net_debug!("eth: dropping truncated frame");
                return Ok(());
            },
        };

        match self.bindings.iter_mut().find(|(bound, _)| *bound == ethertype) {
            Some((_, handler)) => handler.receive(device, buffer),
            None => {
                net_trace!("eth: no handler bound for {}", ethertype);
                Ok(())
            },
        }
    }
}

#[cfg(feature = "std")]
impl<D: Device> Default for Dispatcher<'_, D> {
    fn default() -> Self {
        Self::new()
    }
}
