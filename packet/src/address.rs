use core::fmt;

/// A 7-bit I²C device address.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

/// Tried to build an [`Address`] from a byte with the top bit set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidAddress {
    pub byte: u8,
}

impl fmt::Display for InvalidAddress {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a 7-bit I2C address", self.byte)
    }
}

impl Address {
    pub const MAX: u8 = 0x7F;

    /// Factory-default address of a Tic controller.
    pub const DEFAULT: Self = Self(14);

    #[inline]
    pub const fn new(byte: u8) -> Result<Self, InvalidAddress> {
        if byte > Self::MAX {
            Err(InvalidAddress { byte })
        } else {
            Ok(Self(byte))
        }
    }

    #[inline(always)]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Address {
    type Error = InvalidAddress;

    #[inline(always)]
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::new(byte)
    }
}

impl From<Address> for u8 {
    #[inline(always)]
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}
