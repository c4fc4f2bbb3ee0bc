//! The controller's readable variables and the two-byte requests that fetch them.

use crate::{decode::Decode, opcode::Opcode};

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Width {
    One = 1,
    Two = 2,
    Four = 4,
}

impl Width {
    #[inline(always)]
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signedness {
    Unsigned,
    Signed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Variable {
    pub offset: u8,
    pub width: Width,
    pub signedness: Signedness,
    pub description: &'static str,
    pub unit: &'static str,
}

impl Variable {
    #[inline]
    pub const fn request(&self) -> ReadRequest {
        ReadRequest::get_variable(self.offset)
    }

    /// Same bytes as [`Variable::request`] under the opcode that also clears
    /// the controller's "errors occurred" bits.
    #[inline]
    pub const fn request_and_clear_errors(&self) -> ReadRequest {
        ReadRequest::get_variable_and_clear_errors(self.offset)
    }

    /// Whether `T` decodes exactly this variable's width and signedness.
    #[inline]
    pub fn decodes_as<T: Decode>(&self) -> bool {
        self.width == T::WIDTH && self.signedness == T::SIGNEDNESS
    }
}

/// The write half of a block read: `[read opcode, offset]`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadRequest {
    pub opcode: Opcode,
    pub offset: u8,
}

impl ReadRequest {
    #[inline(always)]
    pub const fn get_variable(offset: u8) -> Self {
        Self {
            opcode: Opcode::GetVariable,
            offset,
        }
    }

    #[inline(always)]
    pub const fn get_variable_and_clear_errors(offset: u8) -> Self {
        Self {
            opcode: Opcode::GetVariableAndClearErrorsOccurred,
            offset,
        }
    }

    #[inline(always)]
    pub const fn to_bytes(self) -> [u8; 2] {
        [self.opcode.byte(), self.offset]
    }
}

macro_rules! variables {
    ($($name:ident: $offset:literal, $ty:ty, $description:literal, $unit:literal;)*) => {
        $(
            pub const $name: Variable = Variable {
                offset: $offset,
                width: <$ty as Decode>::WIDTH,
                signedness: <$ty as Decode>::SIGNEDNESS,
                description: $description,
                unit: $unit,
            };
        )*

        /// Every variable, in offset order.
        pub const VARIABLES: &[Variable] = &[$($name),*];
    };
}

variables! {
    OPERATION_STATE: 0x00, u8, "Operation state", "";
    MISC_FLAGS_1: 0x01, u8, "Misc flags 1", "bitmask";
    ERROR_STATUS: 0x02, u16, "Error status", "bitmask";
    ERRORS_OCCURRED: 0x04, u32, "Errors occurred", "bitmask";
    PLANNING_MODE: 0x09, u8, "Planning mode", "";
    TARGET_POSITION: 0x0A, i32, "Target position", "microsteps";
    TARGET_VELOCITY: 0x0E, i32, "Target velocity", "microsteps per 10,000 s";
    STARTING_SPEED: 0x12, u32, "Starting speed", "microsteps per 10,000 s";
    MAX_SPEED: 0x16, u32, "Max speed", "microsteps per 10,000 s";
    MAX_DECELERATION: 0x1A, u32, "Max deceleration", "microsteps per 100 s^2";
    MAX_ACCELERATION: 0x1E, u32, "Max acceleration", "microsteps per 100 s^2";
    CURRENT_POSITION: 0x22, i32, "Current position", "microsteps";
    CURRENT_VELOCITY: 0x26, i32, "Current velocity", "microsteps per 10,000 s";
    ACTING_TARGET_POSITION: 0x2A, i32, "Acting target position", "microsteps";
    TIME_SINCE_LAST_STEP: 0x2E, u32, "Time since last step", "1/3 us";
    DEVICE_RESET: 0x32, u8, "Device reset", "";
    VIN_VOLTAGE: 0x33, u16, "VIN voltage", "mV";
    UP_TIME: 0x35, u32, "Up time", "ms";
    ENCODER_POSITION: 0x39, i32, "Encoder position", "ticks";
    RC_PULSE_WIDTH: 0x3D, u16, "RC pulse width", "1/12 us";
    ANALOG_READING_SCL: 0x3F, u16, "Analog reading SCL", "0 = 0 V, 0xFFFE = 5 V";
    ANALOG_READING_SDA: 0x41, u16, "Analog reading SDA", "0 = 0 V, 0xFFFE = 5 V";
    ANALOG_READING_TX: 0x43, u16, "Analog reading TX", "0 = 0 V, 0xFFFE = 5 V";
    ANALOG_READING_RX: 0x45, u16, "Analog reading RX", "0 = 0 V, 0xFFFE = 5 V";
    DIGITAL_READINGS: 0x47, u8, "Digital readings", "bitmask";
    PIN_STATES: 0x48, u8, "Pin states", "2 bits per pin";
    STEP_MODE: 0x49, u8, "Step mode", "";
    CURRENT_LIMIT: 0x4A, u8, "Current limit", "current limit code";
    DECAY_MODE: 0x4B, u8, "Decay mode", "";
    INPUT_STATE: 0x4C, u8, "Input state", "";
    INPUT_AFTER_AVERAGING: 0x4D, u16, "Input after averaging", "";
    INPUT_AFTER_HYSTERESIS: 0x4F, u16, "Input after hysteresis", "";
    INPUT_AFTER_SCALING: 0x51, i32, "Input after scaling", "microsteps or microsteps per 10,000 s";
}
