use {
    embassy_rp::i2c::{self, I2c},
    embassy_time::{Duration, TimeoutError, with_timeout},
    tic_packet::Address,
};

#[derive(Debug, defmt::Format)]
pub enum Error {
    TimedOut(TimeoutError),
    I2c(i2c::Error),
}

pub struct Transport<'d, HardwareI2c: i2c::Instance> {
    i2c: I2c<'d, HardwareI2c, i2c::Async>,
    timeout: Duration,
}

impl<'d, HardwareI2c: i2c::Instance> Transport<'d, HardwareI2c> {
    #[inline(always)]
    pub const fn new(i2c: I2c<'d, HardwareI2c, i2c::Async>, timeout: Duration) -> Self {
        Self { i2c, timeout }
    }
}

impl<HardwareI2c: i2c::Instance> tic_driver::transport::Transport for Transport<'_, HardwareI2c> {
    type Error = Error;

    #[inline]
    async fn quick_write(&mut self, address: Address, opcode: u8) -> Result<(), Self::Error> {
        tic_driver::transport::Transport::write(self, address, &[opcode]).await
    }

    #[inline]
    async fn write(&mut self, address: Address, bytes: &[u8]) -> Result<(), Self::Error> {
        match with_timeout(
            self.timeout,
            embedded_hal_async::i2c::I2c::write(&mut self.i2c, address.get(), bytes),
        ).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::I2c(e)),
            Err(e) => Err(Error::TimedOut(e)),
        }
    }

    #[inline]
    async fn write_read(
        &mut self,
        address: Address,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<usize, Self::Error> {
        // The controller clocks out every byte we ask for, so a completed
        // transaction always fills the buffer.
        match with_timeout(
            self.timeout,
            embedded_hal_async::i2c::I2c::write_read(&mut self.i2c, address.get(), bytes, buffer),
        )
        .await
        {
            Ok(Ok(())) => Ok(buffer.len()),
            Ok(Err(e)) => Err(Error::I2c(e)),
            Err(e) => Err(Error::TimedOut(e)),
        }
    }
}
