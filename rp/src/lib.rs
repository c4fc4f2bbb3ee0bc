#![no_std]

pub mod i2c;

use {
    core::{convert::Infallible, ops::DerefMut},
    embassy_rp::{Peripheral, i2c as hw, interrupt},
    embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex,
    embassy_time::Duration,
    tic_driver::{bus::Bus, diagnostics::Defmt},
    tic_packet::Address,
};

#[derive(Clone, Copy, Debug, defmt::Format)]
pub struct Config {
    /// SCL frequency in hertz. The Tic handles up to 400 kHz.
    pub frequency: u32,
    /// Longest any single transaction may take.
    pub timeout: Duration,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            frequency: 100_000,
            timeout: Duration::from_millis(10),
        }
    }
}

pub type Transport<'d, HardwareI2c> = i2c::Transport<'d, HardwareI2c>;

pub type SharedBus<'d, HardwareI2c> = Mutex<Bus<Transport<'d, HardwareI2c>, Defmt>>;

pub type Device<'bus, 'd, HardwareI2c> =
    tic_driver::device::Device<'bus, SharedBus<'d, HardwareI2c>>;

#[inline]
pub fn bus<'d, HardwareI2c: hw::Instance>(
    config: Config,
    peripheral: impl Peripheral<P = HardwareI2c> + 'd,
    scl: impl Peripheral<P = impl hw::SclPin<HardwareI2c>> + 'd,
    sda: impl Peripheral<P = impl hw::SdaPin<HardwareI2c>> + 'd,
    irq: impl interrupt::typelevel::Binding<HardwareI2c::Interrupt, hw::InterruptHandler<HardwareI2c>>,
) -> SharedBus<'d, HardwareI2c> {
    let i2c = hw::I2c::new_async(peripheral, scl, sda, irq, {
        let mut cfg = hw::Config::default();
        cfg.frequency = config.frequency;
        cfg
    });
    let bus = Bus::with_diagnostics(i2c::Transport::new(i2c, config.timeout), Defmt);
    tic_driver::mutex::Mutex::new(bus)
}

#[inline(always)]
pub const fn device<'bus, 'd, HardwareI2c: hw::Instance>(
    bus: &'bus SharedBus<'d, HardwareI2c>,
    address: Address,
) -> Device<'bus, 'd, HardwareI2c> {
    tic_driver::device::Device::new(bus, address)
}

pub struct Mutex<Item>(embassy_sync::mutex::Mutex<CriticalSectionRawMutex, Item>);

impl<Item> tic_driver::mutex::Mutex for Mutex<Item> {
    type Item = Item;
    type Error = Infallible;

    #[inline(always)]
    fn new(item: Item) -> Self {
        Self(embassy_sync::mutex::Mutex::new(item))
    }

    #[inline(always)]
    async fn lock(&self) -> Result<impl DerefMut<Target = Self::Item>, Self::Error> {
        Ok(self.0.lock().await)
    }
}
