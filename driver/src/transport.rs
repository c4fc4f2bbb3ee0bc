use {core::fmt, tic_packet::Address};

/// Raw I²C transactions against one bus.
///
/// Implementations own timeouts, retries at the electrical level, and bus
/// arbitration; every method here is exactly one transaction.
#[expect(async_fn_in_trait, reason = "single-core executors never need `Send` futures")]
pub trait Transport {
    type Error: fmt::Debug;

    /// Write a lone command byte.
    async fn quick_write(&mut self, address: Address, opcode: u8) -> Result<(), Self::Error>;

    /// Write a command byte followed by its payload.
    async fn write(&mut self, address: Address, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Write `bytes`, then read into `buffer` under a repeated start.
    ///
    /// Returns how many bytes the device actually supplied, which may be
    /// fewer than `buffer.len()`.
    async fn write_read(
        &mut self,
        address: Address,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<usize, Self::Error>;
}

impl<T: Transport> Transport for &mut T {
    type Error = T::Error;

    #[inline(always)]
    async fn quick_write(&mut self, address: Address, opcode: u8) -> Result<(), Self::Error> {
        T::quick_write(self, address, opcode).await
    }

    #[inline(always)]
    async fn write(&mut self, address: Address, bytes: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, bytes).await
    }

    #[inline(always)]
    async fn write_read(
        &mut self,
        address: Address,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<usize, Self::Error> {
        T::write_read(self, address, bytes, buffer).await
    }
}
