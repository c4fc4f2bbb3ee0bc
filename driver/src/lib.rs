//! Async driver for Pololu Tic stepper-motor controllers on an I²C bus.
//!
//! A [`bus::Bus`] wraps whatever [`transport::Transport`] the board provides,
//! sits behind a [`mutex::Mutex`], and any number of [`device::Device`]s share
//! it by address.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod device;
pub mod diagnostics;
pub mod mutex;
pub mod transport;

#[cfg(test)]
mod test_util;

use core::fmt;

pub use tic_packet as packet;

pub enum Error<T: transport::Transport, M: mutex::Mutex> {
    Mutex(<M as mutex::Mutex>::Error),
    Bus(bus::Error<T>),
}

impl<T: transport::Transport, M: mutex::Mutex> From<bus::Error<T>> for Error<T, M> {
    #[inline(always)]
    fn from(e: bus::Error<T>) -> Self {
        Self::Bus(e)
    }
}

impl<T: transport::Transport, M: mutex::Mutex> fmt::Debug for Error<T, M> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Mutex(ref e) => f.debug_tuple("Mutex").field(e).finish(),
            Self::Bus(ref e) => f.debug_tuple("Bus").field(e).finish(),
        }
    }
}

impl<T: transport::Transport, M: mutex::Mutex> fmt::Display for Error<T, M> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Mutex(ref e) => write!(f, "Error waiting for the I2C bus: {e:?}"),
            Self::Bus(ref e) => write!(f, "Error from the I2C bus: {e}"),
        }
    }
}

impl<T: transport::Transport, M: mutex::Mutex> PartialEq for Error<T, M>
where
    T::Error: PartialEq,
    M::Error: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Mutex(a), Self::Mutex(b)) => a == b,
            (Self::Bus(a), Self::Bus(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(feature = "defmt")]
impl<T: transport::Transport, M: mutex::Mutex> defmt::Format for Error<T, M>
where
    T::Error: defmt::Format,
    M::Error: defmt::Format,
{
    #[inline]
    fn format(&self, f: defmt::Formatter) {
        match *self {
            Self::Mutex(ref e) => defmt::write!(f, "Error waiting for the I2C bus: {}", e),
            Self::Bus(ref e) => defmt::write!(f, "Error from the I2C bus: {}", e),
        }
    }
}
