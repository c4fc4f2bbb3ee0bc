use {
    crate::variable::{Signedness, Variable, Width},
    core::fmt,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Fewer bytes came back than the variable is wide.
    ShortRead { expected: usize, actual: usize },
    /// The requested integer type doesn't match the variable's width and signedness.
    WidthMismatch {
        width: Width,
        signedness: Signedness,
        requested_width: Width,
        requested_signedness: Signedness,
    },
}

impl fmt::Display for DecodeError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ShortRead { expected, actual } => write!(
                f,
                "Expected {expected} bytes from the controller but received {actual}"
            ),
            Self::WidthMismatch {
                width,
                signedness,
                requested_width,
                requested_signedness,
            } => write!(
                f,
                "Variable is {} bytes ({signedness:?}) but a {} byte ({requested_signedness:?}) integer was requested",
                width.bytes(),
                requested_width.bytes(),
            ),
        }
    }
}

/// An integer that can be rebuilt from a little-endian variable read.
pub trait Decode: Sized + Copy {
    const WIDTH: Width;
    const SIGNEDNESS: Signedness;

    fn from_le_slice(bytes: &[u8]) -> Result<Self, DecodeError>;
}

#[inline]
fn take<const N: usize>(bytes: &[u8]) -> Result<[u8; N], DecodeError> {
    match bytes.first_chunk::<N>() {
        Some(&chunk) => Ok(chunk),
        None => Err(DecodeError::ShortRead {
            expected: N,
            actual: bytes.len(),
        }),
    }
}

macro_rules! decode_impl {
    ($ty:ty, $width:ident, $signedness:ident) => {
        impl Decode for $ty {
            const WIDTH: Width = Width::$width;
            const SIGNEDNESS: Signedness = Signedness::$signedness;

            #[inline]
            fn from_le_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
                take(bytes).map(<$ty>::from_le_bytes)
            }
        }
    };
}

decode_impl!(u8, One, Unsigned);
decode_impl!(i8, One, Signed);
decode_impl!(u16, Two, Unsigned);
decode_impl!(i16, Two, Signed);
decode_impl!(u32, Four, Unsigned);
decode_impl!(i32, Four, Signed);

/// A decoded variable whose type is only known at runtime.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
}

impl Value {
    #[inline]
    pub const fn get(self) -> i64 {
        match self {
            Self::U8(v) => v as i64,
            Self::I8(v) => v as i64,
            Self::U16(v) => v as i64,
            Self::I16(v) => v as i64,
            Self::U32(v) => v as i64,
            Self::I32(v) => v as i64,
        }
    }
}

impl From<Value> for i64 {
    #[inline(always)]
    fn from(value: Value) -> Self {
        value.get()
    }
}

impl fmt::Display for Value {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.get(), f)
    }
}

/// Check that `V` is exactly the integer type `variable` declares.
#[inline]
pub fn check<V: Decode>(variable: &Variable) -> Result<(), DecodeError> {
    if variable.decodes_as::<V>() {
        Ok(())
    } else {
        Err(DecodeError::WidthMismatch {
            width: variable.width,
            signedness: variable.signedness,
            requested_width: V::WIDTH,
            requested_signedness: V::SIGNEDNESS,
        })
    }
}

/// Decode `bytes` according to the width and signedness `variable` declares.
///
/// Only the first `variable.width` bytes are looked at; fewer than that is a
/// [`DecodeError::ShortRead`], never a zero-padded value.
#[inline]
pub fn decode(variable: &Variable, bytes: &[u8]) -> Result<Value, DecodeError> {
    Ok(match (variable.width, variable.signedness) {
        (Width::One, Signedness::Unsigned) => Value::U8(Decode::from_le_slice(bytes)?),
        (Width::One, Signedness::Signed) => Value::I8(Decode::from_le_slice(bytes)?),
        (Width::Two, Signedness::Unsigned) => Value::U16(Decode::from_le_slice(bytes)?),
        (Width::Two, Signedness::Signed) => Value::I16(Decode::from_le_slice(bytes)?),
        (Width::Four, Signedness::Unsigned) => Value::U32(Decode::from_le_slice(bytes)?),
        (Width::Four, Signedness::Signed) => Value::I32(Decode::from_le_slice(bytes)?),
    })
}
