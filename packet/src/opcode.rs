use strum_macros::FromRepr;

/// Every command byte this crate knows how to send.
#[repr(u8)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, FromRepr, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(test, derive(strum_macros::VariantArray))]
pub enum Opcode {
    ExitSafeStart = 0x83,
    Energize = 0x85,
    Deenergize = 0x86,
    HaltAndHold = 0x89,
    ClearDriverError = 0x8A,
    ResetCommandTimeout = 0x8C,
    EnterSafeStart = 0x8F,
    SetCurrentLimit = 0x91,
    SetDecayMode = 0x92,
    SetStepMode = 0x94,
    GoHome = 0x97,
    GetVariable = 0xA1,
    GetVariableAndClearErrorsOccurred = 0xA2,
    Reset = 0xB0,
    SetTargetPosition = 0xE0,
    SetTargetVelocity = 0xE3,
    SetStartingSpeed = 0xE5,
    SetMaxSpeed = 0xE6,
    SetMaxDeceleration = 0xE9,
    SetMaxAcceleration = 0xEA,
    HaltAndSetPosition = 0xEC,
}

impl Opcode {
    #[inline(always)]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Whether this opcode starts a block read rather than a write.
    #[inline]
    pub const fn is_read(self) -> bool {
        matches!(
            self,
            Self::GetVariable | Self::GetVariableAndClearErrorsOccurred
        )
    }
}

impl From<Opcode> for u8 {
    #[inline(always)]
    fn from(opcode: Opcode) -> Self {
        opcode.byte()
    }
}
