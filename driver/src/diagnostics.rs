//! Structured events from the bus, handed to whatever sink the caller injects.

use tic_packet::{Address, DecodeError, ReadRequest};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event<'a> {
    /// A command frame went out.
    Sent { address: Address, frame: &'a [u8] },
    /// A block read came back, possibly short.
    Received {
        address: Address,
        request: ReadRequest,
        response: &'a [u8],
    },
    /// The transport reported a failure for the transaction starting with `opcode`.
    TransportFailed { address: Address, opcode: u8 },
    /// A block read came back too short to decode.
    Undecodable {
        address: Address,
        request: ReadRequest,
        error: DecodeError,
    },
}

pub trait Diagnostics {
    fn record(&mut self, event: Event<'_>);
}

/// Discards everything.
impl Diagnostics for () {
    #[inline(always)]
    fn record(&mut self, _: Event<'_>) {}
}

impl<D: Diagnostics> Diagnostics for &mut D {
    #[inline(always)]
    fn record(&mut self, event: Event<'_>) {
        D::record(self, event)
    }
}

/// Logs every event through `defmt`.
#[cfg(feature = "defmt")]
#[derive(Clone, Copy, Debug, Default)]
pub struct Defmt;

#[cfg(feature = "defmt")]
impl Diagnostics for Defmt {
    #[inline]
    fn record(&mut self, event: Event<'_>) {
        match event {
            Event::Sent { address, frame } => {
                defmt::debug!("Sent {=[u8]:X} to Tic {}", frame, address)
            }
            Event::Received {
                address,
                request,
                response,
            } => defmt::debug!(
                "Read {=[u8]:X} from Tic {} (offset x{=u8:X})",
                response,
                address,
                request.offset
            ),
            Event::TransportFailed { address, opcode } => defmt::warn!(
                "Transport failed sending x{=u8:X} to Tic {}",
                opcode,
                address
            ),
            Event::Undecodable {
                address,
                request,
                error,
            } => defmt::warn!(
                "Couldn't decode offset x{=u8:X} from Tic {}: {}",
                request.offset,
                address,
                error
            ),
        }
    }
}
