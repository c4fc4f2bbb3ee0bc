//! Write commands and the frames they encode to.
//!
//! Payloads are never range-checked. A 7-bit field keeps the low eight bits of
//! whatever it's given and a 32-bit field keeps the value modulo 2^32, so a
//! negative position goes out as its two's-complement bit pattern.

use {crate::opcode::Opcode, core::fmt};

/// How many payload bytes follow the opcode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    /// No payload: the frame is the opcode alone.
    Quick,
    /// One byte, the low eight bits of the value.
    SevenBit,
    /// Four bytes, little-endian.
    ThirtyTwoBit,
}

impl Shape {
    #[inline]
    pub const fn payload_len(self) -> usize {
        match self {
            Self::Quick => 0,
            Self::SevenBit => 1,
            Self::ThirtyTwoBit => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Command {
    pub opcode: Opcode,
    pub shape: Shape,
    pub description: &'static str,
    pub unit: &'static str,
}

impl Command {
    #[inline]
    pub const fn encode(&self, value: i64) -> Frame {
        let opcode = self.opcode.byte();
        match self.shape {
            Shape::Quick => Frame {
                bytes: [opcode, 0, 0, 0, 0],
                len: 1,
            },
            Shape::SevenBit => Frame {
                bytes: [opcode, (value & 0xFF) as u8, 0, 0, 0],
                len: 2,
            },
            Shape::ThirtyTwoBit => {
                let [b0, b1, b2, b3] = (value as u32).to_le_bytes();
                Frame {
                    bytes: [opcode, b0, b1, b2, b3],
                    len: 5,
                }
            }
        }
    }
}

/// An encoded write: `[opcode, payload...]`.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Frame {
    bytes: [u8; 5],
    len: u8,
}

impl Frame {
    pub const MAX_LEN: usize = 5;

    #[inline]
    pub fn as_buffer(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[inline(always)]
    pub const fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.as_buffer()[1..]
    }
}

impl fmt::Debug for Frame {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X?}", self.as_buffer())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    #[inline]
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:X}", self.as_buffer())
    }
}

macro_rules! commands {
    ($($name:ident: $opcode:ident, $shape:ident, $description:literal, $unit:literal;)*) => {
        $(
            pub const $name: Command = Command {
                opcode: Opcode::$opcode,
                shape: Shape::$shape,
                description: $description,
                unit: $unit,
            };
        )*

        /// Every write command, in opcode order.
        pub const COMMANDS: &[Command] = &[$($name),*];
    };
}

commands! {
    EXIT_SAFE_START: ExitSafeStart, Quick, "Exit safe start", "";
    ENERGIZE: Energize, Quick, "Energize", "";
    DEENERGIZE: Deenergize, Quick, "De-energize", "";
    HALT_AND_HOLD: HaltAndHold, Quick, "Halt and hold", "";
    CLEAR_DRIVER_ERROR: ClearDriverError, Quick, "Clear driver error", "";
    RESET_COMMAND_TIMEOUT: ResetCommandTimeout, Quick, "Reset command timeout", "";
    ENTER_SAFE_START: EnterSafeStart, Quick, "Enter safe start", "";
    SET_CURRENT_LIMIT: SetCurrentLimit, SevenBit, "Set current limit", "current limit code";
    SET_DECAY_MODE: SetDecayMode, SevenBit, "Set decay mode", "decay mode code";
    SET_STEP_MODE: SetStepMode, SevenBit, "Set step mode", "step mode code";
    GO_HOME: GoHome, SevenBit, "Go home", "0 = reverse, 1 = forward";
    RESET: Reset, Quick, "Reset", "";
    SET_TARGET_POSITION: SetTargetPosition, ThirtyTwoBit, "Set target position", "microsteps";
    SET_TARGET_VELOCITY: SetTargetVelocity, ThirtyTwoBit, "Set target velocity", "microsteps per 10,000 s";
    SET_STARTING_SPEED: SetStartingSpeed, ThirtyTwoBit, "Set starting speed", "microsteps per 10,000 s";
    SET_MAX_SPEED: SetMaxSpeed, ThirtyTwoBit, "Set max speed", "microsteps per 10,000 s";
    SET_MAX_DECELERATION: SetMaxDeceleration, ThirtyTwoBit, "Set max deceleration", "microsteps per 100 s^2";
    SET_MAX_ACCELERATION: SetMaxAcceleration, ThirtyTwoBit, "Set max acceleration", "microsteps per 100 s^2";
    HALT_AND_SET_POSITION: HaltAndSetPosition, ThirtyTwoBit, "Halt and set position", "microsteps";
}
