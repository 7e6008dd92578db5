//! The seam towards the neighbour storage.
//!
//! The engine reads and writes mappings through the [`NeighborMapping`]
//! trait; eviction, expiry and capacity policy stay with the implementation.
//! A map-backed [`Cache`] is provided for hosts that do not bring their own.
//!
//! [`NeighborMapping`]: trait.NeighborMapping.html
//! [`Cache`]: struct.Cache.html

use crate::layer::Result;

#[cfg(feature = "std")]
use std::collections::BTreeMap;

/// A mapping from protocol addresses to hardware addresses.
///
/// One mapping instance covers one device; the caller hands the engine the
/// mapping belonging to the device it is processing, which keeps the
/// per-device keying outside of this interface.
pub trait NeighborMapping {
    /// Look up the hardware address for a protocol address.
    fn lookup(&self, protocol_addr: &[u8]) -> Option<&[u8]>;

    /// Record or update a mapping.
    ///
    /// Learning is best-effort: a failure is reported to the caller but never
    /// prevents the rest of the receive pipeline from completing.
    fn add(&mut self, protocol_addr: &[u8], hardware_addr: &[u8]) -> Result<()>;
}

/// A neighbour cache backed by a map.
///
/// Entries never expire; replacement happens only through updates for the
/// same protocol address. Hosts that need expiry or bounded storage
/// implement [`NeighborMapping`] on their own storage instead.
///
/// [`NeighborMapping`]: trait.NeighborMapping.html
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct Cache {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

#[cfg(feature = "std")]
impl Cache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Cache::default()
    }

    /// The number of mappings currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no mappings at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(feature = "std")]
impl NeighborMapping for Cache {
    fn lookup(&self, protocol_addr: &[u8]) -> Option<&[u8]> {
        self.entries.get(protocol_addr).map(Vec::as_slice)
    }

    fn add(&mut self, protocol_addr: &[u8], hardware_addr: &[u8]) -> Result<()> {
        match self.entries.get_mut(protocol_addr) {
            Some(entry) => {
                entry.clear();
                entry.extend_from_slice(hardware_addr);
            }
            None => {
                self.entries.insert(protocol_addr.to_vec(), hardware_addr.to_vec());
            }
        }
        Ok(())
    }
}
