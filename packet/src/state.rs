//! Typed readings of the enumerated and bitfield variables.
//!
//! Nothing on the wire depends on these; they only name the integers the
//! controller already reports.

use strum_macros::FromRepr;

macro_rules! code {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $byte:literal,)* }) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, Eq, FromRepr, Hash, Ord, PartialEq, PartialOrd)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[cfg_attr(test, derive(strum_macros::VariantArray))]
        pub enum $name {
            $($variant = $byte,)*
        }

        impl $name {
            #[inline(always)]
            pub const fn byte(self) -> u8 {
                self as u8
            }
        }

        impl From<$name> for u8 {
            #[inline(always)]
            fn from(code: $name) -> Self {
                code.byte()
            }
        }
    };
}

code! {
    OperationState {
        Reset = 0,
        Deenergized = 2,
        SoftError = 4,
        WaitingForErrLine = 6,
        StartingUp = 8,
        Normal = 10,
    }
}

code! {
    PlanningMode {
        Off = 0,
        TargetPosition = 1,
        TargetVelocity = 2,
    }
}

code! {
    /// Microstepping mode. Codes past `Eighth` only exist on some models.
    StepMode {
        Full = 0,
        Half = 1,
        Quarter = 2,
        Eighth = 3,
        Sixteenth = 4,
        ThirtySecond = 5,
        TwoHundredFiftySixth = 7,
    }
}

code! {
    DecayMode {
        Automatic = 0,
        Slow = 1,
        Fast = 2,
    }
}

code! {
    InputState {
        NotReady = 0,
        Invalid = 1,
        Halt = 2,
        TargetPosition = 3,
        TargetVelocity = 4,
    }
}

code! {
    /// Cause of the last full microcontroller reset. A "reset" command leaves it alone.
    DeviceReset {
        PowerUp = 0,
        BrownOut = 1,
        ResetLine = 2,
        Watchdog = 4,
        Software = 8,
        StackOverflow = 16,
        StackUnderflow = 32,
    }
}

code! {
    HomingDirection {
        Reverse = 0,
        Forward = 1,
    }
}

code! {
    PinState {
        HighImpedance = 0,
        PulledUp = 1,
        OutputLow = 2,
        OutputHigh = 3,
    }
}

impl StepMode {
    /// Microsteps in one full step.
    #[inline]
    pub const fn microsteps(self) -> u16 {
        match self {
            Self::Full => 1,
            Self::Half => 2,
            Self::Quarter => 4,
            Self::Eighth => 8,
            Self::Sixteenth => 16,
            Self::ThirtySecond => 32,
            Self::TwoHundredFiftySixth => 256,
        }
    }
}

pub mod misc_flags_1 {
    pub const ENERGIZED: u8 = 1 << 0;
    pub const POSITION_UNCERTAIN: u8 = 1 << 1;
    pub const FORWARD_LIMIT_ACTIVE: u8 = 1 << 2;
    pub const REVERSE_LIMIT_ACTIVE: u8 = 1 << 3;
    pub const HOMING_ACTIVE: u8 = 1 << 4;
}

/// Bits of "error status" (low 16) and "errors occurred" (all 32).
pub mod error {
    pub const INTENTIONALLY_DEENERGIZED: u32 = 1 << 0;
    pub const MOTOR_DRIVER_ERROR: u32 = 1 << 1;
    pub const LOW_VIN: u32 = 1 << 2;
    pub const KILL_SWITCH_ACTIVE: u32 = 1 << 3;
    pub const REQUIRED_INPUT_INVALID: u32 = 1 << 4;
    pub const SERIAL_ERROR: u32 = 1 << 5;
    pub const COMMAND_TIMEOUT: u32 = 1 << 6;
    pub const SAFE_START_VIOLATION: u32 = 1 << 7;
    pub const ERR_LINE_HIGH: u32 = 1 << 8;
    pub const SERIAL_FRAMING: u32 = 1 << 16;
    pub const SERIAL_RX_OVERRUN: u32 = 1 << 17;
    pub const SERIAL_FORMAT: u32 = 1 << 18;
    pub const SERIAL_CRC: u32 = 1 << 19;
    pub const ENCODER_SKIP: u32 = 1 << 20;
}

pub mod digital_readings {
    pub const SCL: u8 = 1 << 0;
    pub const SDA: u8 = 1 << 1;
    pub const TX: u8 = 1 << 2;
    pub const RX: u8 = 1 << 3;
    pub const RC: u8 = 1 << 4;
}

/// Control pins in the order "pin states" packs them, two bits each from the bottom.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pin {
    Scl = 0,
    Sda = 1,
    Tx = 2,
    Rx = 3,
}

#[inline]
pub const fn pin_state(pin_states: u8, pin: Pin) -> PinState {
    match (pin_states >> (2 * pin as u8)) & 0b11 {
        0 => PinState::HighImpedance,
        1 => PinState::PulledUp,
        2 => PinState::OutputLow,
        _ => PinState::OutputHigh,
    }
}
