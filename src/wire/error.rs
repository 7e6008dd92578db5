use core::fmt;

/// The error type for packet parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An incoming packet could not be parsed because it was shorter than assumed.
    ///
    /// The packet may be shorter than the minimum length specified, or, for
    /// variable length packets, some of the fields declared in the fixed part
    /// were out of bounds of the received data.
    Truncated,

    /// An incoming packet could not be recognized and was dropped.
    ///
    /// E.g. an Ethernet frame with an unknown EtherType. In most settings this
    /// is not fatal, well-crafted standards allow ignoring unknown identifiers
    /// for interoperability with newer protocol revisions.
    Unrecognized,

    /// An incoming packet was recognized but was self-contradictory.
    ///
    /// Example: an ARP packet declaring a zero hardware address length.
    Malformed,
}

/// The result type for packet parsing.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Truncated    => write!(f, "truncated packet"),
            Error::Unrecognized => write!(f, "unrecognized packet"),
            Error::Malformed    => write!(f, "malformed packet"),
        }
    }
}
