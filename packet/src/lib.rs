//! Command and variable encoding for the Tic stepper-motor controller's I²C interface.
//!
//! Everything here is pure: commands become byte frames, and raw bytes read back
//! from the controller become integers. Moving those bytes over a bus is someone
//! else's job (see `tic-driver`).

#![cfg_attr(not(test), no_std)]

pub mod address;
pub mod command;
pub mod decode;
pub mod opcode;
pub mod state;
pub mod variable;

pub use {
    address::Address,
    command::{Command, Frame, Shape},
    decode::{Decode, DecodeError, Value},
    opcode::Opcode,
    variable::{ReadRequest, Signedness, Variable, Width},
};
