use {
    crate::{Error, bus::Bus, diagnostics::Diagnostics, mutex::Mutex, transport::Transport},
    paste::paste,
    tic_packet::{
        Address, Command, Decode, ReadRequest, Value, Variable, command,
        state::{DecayMode, DeviceReset, HomingDirection, InputState, OperationState, PlanningMode, StepMode},
        variable,
    },
};

macro_rules! quick_methods {
    ($($(#[$meta:meta])* $name:ident => $command:ident;)*) => {
        $(
            $(#[$meta])*
            #[inline]
            pub async fn $name(&self) -> Result<(), Error<T, M>> {
                self.command(&command::$command, 0).await
            }
        )*
    };
}

macro_rules! write_methods {
    ($($(#[$meta:meta])* $name:ident($ty:ty) => $command:ident;)*) => {
        $(
            $(#[$meta])*
            #[inline]
            pub async fn $name(&self, value: $ty) -> Result<(), Error<T, M>> {
                self.command(&command::$command, i64::from(value)).await
            }
        )*
    };
}

macro_rules! getters {
    ($($(#[$meta:meta])* $name:ident: $variable:ident -> $ty:ty;)*) => {
        paste! {
            $(
                $(#[$meta])*
                #[inline]
                pub async fn [< get_ $name >](&self) -> Result<$ty, Error<T, M>> {
                    self.read::<$ty>(&variable::$variable).await
                }
            )*
        }
    };
}

macro_rules! typed_getters {
    ($($name:ident: $variable:ident -> $code:ident;)*) => {
        $(
            /// `None` if the controller reports a code this crate doesn't know.
            #[inline]
            pub async fn $name(&self) -> Result<Option<$code>, Error<T, M>> {
                Ok($code::from_repr(self.read::<u8>(&variable::$variable).await?))
            }
        )*
    };
}

/// One Tic controller at a fixed address on a shared bus.
///
/// Holds nothing but the address and a reference to the bus; every call locks
/// the bus for exactly one transaction.
pub struct Device<'bus, M: Mutex> {
    bus: &'bus M,
    address: Address,
}

impl<M: Mutex> Clone for Device<'_, M> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Mutex> Copy for Device<'_, M> {}

impl<'bus, T: Transport, D: Diagnostics, M: Mutex<Item = Bus<T, D>>> Device<'bus, M> {
    #[inline(always)]
    pub const fn new(bus: &'bus M, address: Address) -> Self {
        Self { bus, address }
    }

    #[inline(always)]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Send any write command with a raw value, masked to the command's payload width.
    #[inline]
    pub async fn command(&self, command: &Command, value: i64) -> Result<(), Error<T, M>> {
        self.bus
            .lock()
            .await
            .map_err(Error::Mutex)?
            .command(self.address, command, value)
            .await
            .map_err(Error::Bus)
    }

    #[inline]
    pub async fn read<V: Decode>(&self, variable: &Variable) -> Result<V, Error<T, M>> {
        self.bus
            .lock()
            .await
            .map_err(Error::Mutex)?
            .read(self.address, variable)
            .await
            .map_err(Error::Bus)
    }

    #[inline]
    pub async fn read_value(&self, variable: &Variable) -> Result<Value, Error<T, M>> {
        self.bus
            .lock()
            .await
            .map_err(Error::Mutex)?
            .read_value(self.address, variable)
            .await
            .map_err(Error::Bus)
    }

    /// Read `buffer.len()` bytes of variables starting at `offset`.
    #[inline]
    pub async fn get_variable<'buf>(
        &self,
        offset: u8,
        buffer: &'buf mut [u8],
    ) -> Result<&'buf [u8], Error<T, M>> {
        self.block_read(ReadRequest::get_variable(offset), buffer)
            .await
    }

    /// Same as [`Device::get_variable`], and the controller also clears its
    /// "errors occurred" bits.
    #[inline]
    pub async fn get_variable_and_clear_errors<'buf>(
        &self,
        offset: u8,
        buffer: &'buf mut [u8],
    ) -> Result<&'buf [u8], Error<T, M>> {
        self.block_read(ReadRequest::get_variable_and_clear_errors(offset), buffer)
            .await
    }

    /// Read "errors occurred" and clear it in the same transaction.
    #[inline]
    pub async fn take_errors_occurred(&self) -> Result<u32, Error<T, M>> {
        self.bus
            .lock()
            .await
            .map_err(Error::Mutex)?
            .read_and_clear_errors(self.address, &variable::ERRORS_OCCURRED)
            .await
            .map_err(Error::Bus)
    }

    #[inline]
    async fn block_read<'buf>(
        &self,
        request: ReadRequest,
        buffer: &'buf mut [u8],
    ) -> Result<&'buf [u8], Error<T, M>> {
        self.bus
            .lock()
            .await
            .map_err(Error::Mutex)?
            .block_read(self.address, request, buffer)
            .await
            .map_err(Error::Bus)
    }

    quick_methods! {
        /// Stop abruptly, ignoring the deceleration limit.
        halt_and_hold => HALT_AND_HOLD;
        /// Keep the command timeout from expiring for a while longer.
        reset_command_timeout => RESET_COMMAND_TIMEOUT;
        /// Disable the motor driver so the coils carry no current.
        deenergize => DEENERGIZE;
        /// Ask the controller to enable its motor driver.
        energize => ENERGIZE;
        /// Clear a safe-start violation for 200 ms.
        exit_safe_start => EXIT_SAFE_START;
        enter_safe_start => ENTER_SAFE_START;
        /// Forget most of the controller's current state.
        reset => RESET;
        clear_driver_error => CLEAR_DRIVER_ERROR;
    }

    write_methods! {
        /// Microsteps.
        set_target_position(i32) => SET_TARGET_POSITION;
        /// Microsteps per 10,000 s.
        set_target_velocity(i32) => SET_TARGET_VELOCITY;
        /// Stop abruptly and overwrite "current position" (microsteps).
        halt_and_set_position(i32) => HALT_AND_SET_POSITION;
        /// Microsteps per 10,000 s.
        set_max_speed(u32) => SET_MAX_SPEED;
        /// Microsteps per 10,000 s.
        set_starting_speed(u32) => SET_STARTING_SPEED;
        /// Microsteps per 100 s².
        set_max_acceleration(u32) => SET_MAX_ACCELERATION;
        /// Microsteps per 100 s².
        set_max_deceleration(u32) => SET_MAX_DECELERATION;
        /// Device-specific current limit code.
        set_current_limit(u8) => SET_CURRENT_LIMIT;
    }

    #[inline]
    pub async fn go_home(&self, direction: HomingDirection) -> Result<(), Error<T, M>> {
        self.command(&command::GO_HOME, direction.byte().into())
            .await
    }

    #[inline]
    pub async fn set_step_mode(&self, mode: StepMode) -> Result<(), Error<T, M>> {
        self.command(&command::SET_STEP_MODE, mode.byte().into())
            .await
    }

    #[inline]
    pub async fn set_decay_mode(&self, mode: DecayMode) -> Result<(), Error<T, M>> {
        self.command(&command::SET_DECAY_MODE, mode.byte().into())
            .await
    }

    getters! {
        operation_state: OPERATION_STATE -> u8;
        misc_flags_1: MISC_FLAGS_1 -> u8;
        /// Errors currently stopping the motor; zero means it can move.
        error_status: ERROR_STATUS -> u16;
        /// Errors seen since the last clearing read. Doesn't clear them.
        errors_occurred: ERRORS_OCCURRED -> u32;
        planning_mode: PLANNING_MODE -> u8;
        /// Microsteps. Only meaningful while planning toward a position.
        target_position: TARGET_POSITION -> i32;
        /// Microsteps per 10,000 s. Only meaningful while planning toward a velocity.
        target_velocity: TARGET_VELOCITY -> i32;
        starting_speed: STARTING_SPEED -> u32;
        max_speed: MAX_SPEED -> u32;
        max_deceleration: MAX_DECELERATION -> u32;
        max_acceleration: MAX_ACCELERATION -> u32;
        /// Microsteps commanded so far, not necessarily where the shaft is.
        current_position: CURRENT_POSITION -> i32;
        current_velocity: CURRENT_VELOCITY -> i32;
        acting_target_position: ACTING_TARGET_POSITION -> i32;
        /// Units of 1/3 µs.
        time_since_last_step: TIME_SINCE_LAST_STEP -> u32;
        device_reset: DEVICE_RESET -> u8;
        /// Millivolts.
        vin_voltage: VIN_VOLTAGE -> u16;
        /// Milliseconds since the last full reset.
        up_time: UP_TIME -> u32;
        encoder_position: ENCODER_POSITION -> i32;
        /// Units of 1/12 µs; `0xFFFF` when there's no valid pulse.
        rc_pulse_width: RC_PULSE_WIDTH -> u16;
        analog_reading_scl: ANALOG_READING_SCL -> u16;
        analog_reading_sda: ANALOG_READING_SDA -> u16;
        analog_reading_tx: ANALOG_READING_TX -> u16;
        analog_reading_rx: ANALOG_READING_RX -> u16;
        digital_readings: DIGITAL_READINGS -> u8;
        pin_states: PIN_STATES -> u8;
        step_mode: STEP_MODE -> u8;
        current_limit: CURRENT_LIMIT -> u8;
        decay_mode: DECAY_MODE -> u8;
        input_state: INPUT_STATE -> u8;
        input_after_averaging: INPUT_AFTER_AVERAGING -> u16;
        input_after_hysteresis: INPUT_AFTER_HYSTERESIS -> u16;
        input_after_scaling: INPUT_AFTER_SCALING -> i32;
    }

    typed_getters! {
        operation_state: OPERATION_STATE -> OperationState;
        planning_mode: PLANNING_MODE -> PlanningMode;
        step_mode: STEP_MODE -> StepMode;
        decay_mode: DECAY_MODE -> DecayMode;
        input_state: INPUT_STATE -> InputState;
        device_reset: DEVICE_RESET -> DeviceReset;
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::test_util::{Exclusive, Nack, Scripted, Transaction},
        embassy_futures::block_on,
        tic_packet::DecodeError,
    };

    type TestBus = Exclusive<Bus<Scripted>>;

    fn bus(replies: impl IntoIterator<Item = Vec<u8>>) -> TestBus {
        Exclusive::new(Bus::new(Scripted::replying(replies)))
    }

    fn log(bus: TestBus) -> Vec<Transaction> {
        bus.into_inner().into_parts().0.log
    }

    fn tic(bus: &TestBus) -> Device<'_, TestBus> {
        Device::new(bus, Address::DEFAULT)
    }

    #[test]
    fn writes() {
        let bus = bus([]);
        let tic = tic(&bus);
        block_on(async {
            tic.exit_safe_start().await.unwrap();
            tic.energize().await.unwrap();
            tic.set_target_position(-200).await.unwrap();
            tic.set_step_mode(StepMode::Eighth).await.unwrap();
            tic.go_home(HomingDirection::Forward).await.unwrap();
            tic.set_max_speed(2_000_000).await.unwrap();
            tic.deenergize().await.unwrap();
        });
        assert_eq!(
            log(bus),
            [
                Transaction::Quick { address: 14, opcode: 0x83 },
                Transaction::Quick { address: 14, opcode: 0x85 },
                Transaction::Write { address: 14, bytes: vec![0xE0, 0x38, 0xFF, 0xFF, 0xFF] },
                Transaction::Write { address: 14, bytes: vec![0x94, 0x03] },
                Transaction::Write { address: 14, bytes: vec![0x97, 0x01] },
                Transaction::Write { address: 14, bytes: vec![0xE6, 0x80, 0x84, 0x1E, 0x00] },
                Transaction::Quick { address: 14, opcode: 0x86 },
            ]
        );
    }

    #[test]
    fn raw_command_masks_seven_bit_values() {
        let bus = bus([]);
        block_on(tic(&bus).command(&command::SET_CURRENT_LIMIT, 300)).unwrap();
        assert_eq!(
            log(bus),
            [Transaction::Write { address: 14, bytes: vec![0x91, 0x2C] }]
        );
    }

    #[test]
    fn reads() {
        let bus = bus([
            vec![0xFF, 0xFF, 0xFF, 0xFF],
            vec![0x34, 0x12],
            vec![10],
            vec![0xE8, 0x03, 0x00, 0x00],
        ]);
        let tic = tic(&bus);
        block_on(async {
            assert_eq!(tic.get_current_position().await, Ok(-1));
            assert_eq!(tic.get_vin_voltage().await, Ok(4660));
            assert_eq!(tic.operation_state().await, Ok(Some(OperationState::Normal)));
            assert_eq!(tic.get_up_time().await, Ok(1000));
        });
        assert_eq!(
            log(bus),
            [
                Transaction::WriteRead { address: 14, bytes: vec![0xA1, 0x22], len: 4 },
                Transaction::WriteRead { address: 14, bytes: vec![0xA1, 0x33], len: 2 },
                Transaction::WriteRead { address: 14, bytes: vec![0xA1, 0x00], len: 1 },
                Transaction::WriteRead { address: 14, bytes: vec![0xA1, 0x35], len: 4 },
            ]
        );
    }

    #[test]
    fn error_status_reads_its_own_offset() {
        let bus = bus([vec![0x80, 0x00]]);
        assert_eq!(block_on(tic(&bus).get_error_status()), Ok(0x0080));
        assert_eq!(
            log(bus),
            [Transaction::WriteRead { address: 14, bytes: vec![0xA1, 0x02], len: 2 }]
        );
    }

    #[test]
    fn unknown_code_is_none() {
        let bus = bus([vec![3]]);
        assert_eq!(block_on(tic(&bus).operation_state()), Ok(None));
    }

    #[test]
    fn short_read() {
        let bus = bus([vec![0x01, 0x02]]);
        assert_eq!(
            block_on(tic(&bus).get_encoder_position()),
            Err(Error::Bus(crate::bus::Error::Decode(DecodeError::ShortRead {
                expected: 4,
                actual: 2,
            })))
        );
    }

    #[test]
    fn raw_read_of_the_wrong_type_is_an_error() {
        let bus = bus([vec![0x78, 0x56, 0x34, 0x12]]);
        assert!(matches!(
            block_on(tic(&bus).read::<u8>(&variable::CURRENT_POSITION)),
            Err(Error::Bus(crate::bus::Error::Decode(
                DecodeError::WidthMismatch { .. }
            )))
        ));
        assert!(log(bus).is_empty());
    }

    #[test]
    fn transport_failure() {
        let bus = Exclusive::new(Bus::new(Scripted::failing()));
        assert_eq!(
            block_on(tic(&bus).halt_and_hold()),
            Err(Error::Bus(crate::bus::Error::Transport(Nack)))
        );
    }

    #[test]
    fn raw_block_reads() {
        let bus = bus([vec![1, 2, 3, 4, 5, 6], vec![0, 0, 0, 0]]);
        let tic = tic(&bus);
        let mut buffer = [0; 6];
        block_on(async {
            assert_eq!(
                tic.get_variable(0x3F, &mut buffer).await,
                Ok(&[1, 2, 3, 4, 5, 6][..])
            );
            assert_eq!(tic.take_errors_occurred().await, Ok(0));
        });
        assert_eq!(
            log(bus),
            [
                Transaction::WriteRead { address: 14, bytes: vec![0xA1, 0x3F], len: 6 },
                Transaction::WriteRead { address: 14, bytes: vec![0xA2, 0x04], len: 4 },
            ]
        );
    }

    #[test]
    fn devices_share_a_bus() {
        let bus = bus([vec![0], vec![0]]);
        let a = Device::new(&bus, Address::new(14).unwrap());
        let b = Device::new(&bus, Address::new(15).unwrap());
        block_on(async {
            a.get_step_mode().await.unwrap();
            b.get_step_mode().await.unwrap();
        });
        let addresses: Vec<_> = log(bus)
            .into_iter()
            .map(|t| match t {
                Transaction::WriteRead { address, .. } => address,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(addresses, [14, 15]);
    }
}
