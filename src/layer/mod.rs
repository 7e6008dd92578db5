//! The process logic of the protocol layers.
//!
//! The packet representations live in `wire`; this module holds the state
//! machines operating on them. The [`arp`](arp/index.html) module contains
//! the resolution engine itself, [`eth`](eth/index.html) the explicit
//! dispatch from link-layer protocol identifiers to their handlers.
//!
//! ## Error classes
//!
//! Operations distinguish two classes of failure. Local faults — bad
//! arguments, exhausted pools, device errors — surface as [`Error`] values to
//! the immediate caller. Anomalies caused by a remote peer — malformed
//! frames, packets not addressed to us, unknown operations — are *not*
//! errors: the offending buffer is released and the operation reports
//! success, because a bad frame from an unreliable network must not escalate
//! into a local failure.
//!
//! [`Error`]: enum.Error.html

use core::fmt;

pub mod arp;
pub mod eth;

/// The result type of layer operations.
pub type Result<T> = core::result::Result<T, Error>;

/// A local fault during packet processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The operation was not permitted.
    ///
    /// Returned when arguments fail validation, or when the device does not
    /// allow or implement an operation.
    Illegal,

    /// Not enough space for the requested packet.
    ///
    /// In contrast to `Illegal` this signals that a smaller size might have
    /// been possible.
    BadSize,

    /// Unable to find a route towards the destination address.
    Unreachable,

    /// No hardware address is known for the next hop.
    ///
    /// The packet was not modified. The caller is expected to queue it
    /// externally and re-drive resolution once a mapping has been learned;
    /// this crate performs no retries of its own.
    Unresolved,

    /// The action could not be completed because a resource was exhausted.
    ///
    /// Unlike `Illegal` this implies the action would have been legal with
    /// more resources, e.g. a larger buffer pool.
    Exhausted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Illegal     => write!(f, "illegal operation"),
            Error::BadSize     => write!(f, "bad size"),
            Error::Unreachable => write!(f, "no route to destination"),
            Error::Unresolved  => write!(f, "hardware address not resolved"),
            Error::Exhausted   => write!(f, "resources exhausted"),
        }
    }
}

/// Can convert from a wire error.
///
/// This indicates some layer tried to operate on a packet but failed.
impl From<crate::wire::Error> for Error {
    fn from(_: crate::wire::Error) -> Self {
        Error::Illegal
    }
}

/// Can convert from a payload error.
///
/// One common cause is failure to resize a buffer to the necessary size.
impl From<crate::wire::PayloadError> for Error {
    fn from(err: crate::wire::PayloadError) -> Self {
        use crate::wire::PayloadError;
        match err {
            PayloadError::BadSize => Error::BadSize,
        }
    }
}
