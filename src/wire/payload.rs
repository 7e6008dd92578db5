//! Newtype wrappers of the fundamental byte-buffer `[u8]`.
use core::fmt;

/// A specialized, internal variant of `Borrow<payload>`.
///
/// This ensures that the implementation is consistent and always resolves to
/// the same memory region, an implementation detail that other parts of the
/// crate rely upon. The values in the referred to byte region will not appear
/// differently between calls, which is trivial when the byte region is part of
/// the object and does not change.
pub trait Payload {
    /// Borrow the inner byte region.
    fn payload(&self) -> &payload;
}

/// A specialized, internal variant of `BorrowMut<payload>`.
///
/// The mutable analogue of [`Payload`]. Buffers handed to the engine for
/// sending implement this so that headers can be emitted in place.
///
/// [`Payload`]: trait.Payload.html
pub trait PayloadMut: Payload {
    /// Retrieve the mutable, inner payload.
    fn payload_mut(&mut self) -> &mut payload;

    /// Resize the payload.
    ///
    /// New bytes will be initialized with some value, likely `0` but not
    /// guaranteed. Fails with `Error::BadSize` when the container can not
    /// provide the requested length.
    fn resize(&mut self, length: usize) -> Result<(), Error>;
}

byte_wrapper! {
    /// A dynamically sized type representing a packet payload.
    ///
    /// This type is seemingly just a `[u8]`. It is a newtype wrapper so that
    /// this crate can freely implement traits for it but also restrict the
    /// standard trait implementations to not be available.
    #[derive(Debug, PartialEq, Eq)]
    pub struct payload([u8]);
}

/// Error variants for resizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The requested length can not be provided by the container.
    BadSize,
}

impl payload {
    /// View the payload as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// View the payload as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// The length of the payload in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload contains no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BadSize => write!(f, "bad payload size"),
        }
    }
}

impl<'a> From<&'a [u8]> for &'a payload {
    fn from(val: &'a [u8]) -> &'a payload {
        payload::__from_macro_new_unchecked(val)
    }
}

impl<'a> From<&'a mut [u8]> for &'a mut payload {
    fn from(val: &'a mut [u8]) -> &'a mut payload {
        payload::__from_macro_new_unchecked_mut(val)
    }
}

impl<'a> From<&'a payload> for &'a [u8] {
    fn from(val: &'a payload) -> &'a [u8] {
        val.as_slice()
    }
}

impl<'a> From<&'a mut payload> for &'a mut [u8] {
    fn from(val: &'a mut payload) -> &'a mut [u8] {
        val.as_mut_slice()
    }
}

impl AsRef<[u8]> for payload {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for payload {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl Payload for payload {
    fn payload(&self) -> &payload {
        self
    }
}

impl PayloadMut for payload {
    fn payload_mut(&mut self) -> &mut payload {
        self
    }

    fn resize(&mut self, length: usize) -> Result<(), Error> {
        if length == self.0.len() {
            Ok(())
        } else {
            Err(Error::BadSize)
        }
    }
}

impl Payload for [u8] {
    fn payload(&self) -> &payload {
        self.into()
    }
}

impl PayloadMut for [u8] {
    fn payload_mut(&mut self) -> &mut payload {
        self.into()
    }

    fn resize(&mut self, length: usize) -> Result<(), Error> {
        if length == self.len() {
            Ok(())
        } else {
            Err(Error::BadSize)
        }
    }
}

impl<P: Payload + ?Sized> Payload for &'_ P {
    fn payload(&self) -> &payload {
        (**self).payload()
    }
}

impl<P: Payload + ?Sized> Payload for &'_ mut P {
    fn payload(&self) -> &payload {
        (**self).payload()
    }
}

impl<P: PayloadMut + ?Sized> PayloadMut for &'_ mut P {
    fn payload_mut(&mut self) -> &mut payload {
        (**self).payload_mut()
    }

    fn resize(&mut self, length: usize) -> Result<(), Error> {
        (**self).resize(length)
    }
}

#[cfg(feature = "std")]
impl Payload for Vec<u8> {
    fn payload(&self) -> &payload {
        self.as_slice().into()
    }
}

#[cfg(feature = "std")]
impl PayloadMut for Vec<u8> {
    fn payload_mut(&mut self) -> &mut payload {
        self.as_mut_slice().into()
    }

    fn resize(&mut self, length: usize) -> Result<(), Error> {
        Vec::resize(self, length, 0u8);
        Ok(())
    }
}
