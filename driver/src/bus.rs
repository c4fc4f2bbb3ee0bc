use {
    crate::{
        diagnostics::{Diagnostics, Event},
        transport::Transport,
    },
    core::fmt,
    tic_packet::{
        Address, Command, Decode, DecodeError, ReadRequest, Shape, Value, Variable, decode,
    },
};

pub enum Error<T: Transport> {
    Transport(T::Error),
    Decode(DecodeError),
}

impl<T: Transport> fmt::Debug for Error<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Transport(ref e) => f.debug_tuple("Transport").field(e).finish(),
            Self::Decode(ref e) => f.debug_tuple("Decode").field(e).finish(),
        }
    }
}

impl<T: Transport> fmt::Display for Error<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Transport(ref e) => write!(f, "I2C transaction failed: {e:?}"),
            Self::Decode(ref e) => write!(f, "Couldn't decode the controller's reply: {e}"),
        }
    }
}

impl<T: Transport> PartialEq for Error<T>
where
    T::Error: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transport(a), Self::Transport(b)) => a == b,
            (Self::Decode(a), Self::Decode(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(feature = "defmt")]
impl<T: Transport> defmt::Format for Error<T>
where
    T::Error: defmt::Format,
{
    #[inline]
    fn format(&self, f: defmt::Formatter) {
        match *self {
            Self::Transport(ref e) => defmt::write!(f, "I2C transaction failed: {}", e),
            Self::Decode(ref e) => defmt::write!(f, "Couldn't decode the controller's reply: {}", e),
        }
    }
}

/// One I²C bus: a transport plus the diagnostics sink that watches it.
///
/// Every method issues exactly one transaction and never retries.
pub struct Bus<T: Transport, D: Diagnostics = ()> {
    transport: T,
    diagnostics: D,
}

impl<T: Transport> Bus<T> {
    #[inline(always)]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            diagnostics: (),
        }
    }
}

impl<T: Transport, D: Diagnostics> Bus<T, D> {
    #[inline(always)]
    pub const fn with_diagnostics(transport: T, diagnostics: D) -> Self {
        Self {
            transport,
            diagnostics,
        }
    }

    #[inline(always)]
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    #[inline(always)]
    pub fn diagnostics(&mut self) -> &mut D {
        &mut self.diagnostics
    }

    #[inline]
    pub fn into_parts(self) -> (T, D) {
        (self.transport, self.diagnostics)
    }

    /// Encode `value` for `command` and send it to `address`.
    #[inline]
    pub async fn command(
        &mut self,
        address: Address,
        command: &Command,
        value: i64,
    ) -> Result<(), Error<T>> {
        let frame = command.encode(value);
        let sent = match command.shape {
            Shape::Quick => self.transport.quick_write(address, frame.opcode()).await,
            Shape::SevenBit | Shape::ThirtyTwoBit => {
                self.transport.write(address, frame.as_buffer()).await
            }
        };
        match sent {
            Ok(()) => {
                self.diagnostics.record(Event::Sent {
                    address,
                    frame: frame.as_buffer(),
                });
                Ok(())
            }
            Err(e) => {
                self.diagnostics.record(Event::TransportFailed {
                    address,
                    opcode: frame.opcode(),
                });
                Err(Error::Transport(e))
            }
        }
    }

    /// Send `request` and read up to `buffer.len()` bytes back.
    ///
    /// Returns the prefix of `buffer` the device actually filled.
    #[inline]
    pub async fn block_read<'buf>(
        &mut self,
        address: Address,
        request: ReadRequest,
        buffer: &'buf mut [u8],
    ) -> Result<&'buf [u8], Error<T>> {
        let received = match self
            .transport
            .write_read(address, &request.to_bytes(), buffer)
            .await
        {
            Ok(received) => received,
            Err(e) => {
                self.diagnostics.record(Event::TransportFailed {
                    address,
                    opcode: request.opcode.byte(),
                });
                return Err(Error::Transport(e));
            }
        };
        let response = &buffer[..received.min(buffer.len())];
        self.diagnostics.record(Event::Received {
            address,
            request,
            response,
        });
        Ok(response)
    }

    #[inline]
    pub async fn read<V: Decode>(
        &mut self,
        address: Address,
        variable: &Variable,
    ) -> Result<V, Error<T>> {
        self.read_with(address, variable.request(), variable).await
    }

    /// Like [`Bus::read`], under the opcode that also clears "errors occurred".
    #[inline]
    pub async fn read_and_clear_errors<V: Decode>(
        &mut self,
        address: Address,
        variable: &Variable,
    ) -> Result<V, Error<T>> {
        self.read_with(address, variable.request_and_clear_errors(), variable)
            .await
    }

    /// Read `variable` and decode it by its declared width and signedness.
    #[inline]
    pub async fn read_value(
        &mut self,
        address: Address,
        variable: &Variable,
    ) -> Result<Value, Error<T>> {
        let mut buffer = [0; 4];
        let request = variable.request();
        let response = self
            .block_read(address, request, &mut buffer[..variable.width.bytes()])
            .await?;
        decode::decode(variable, response).map_err(|error| self.undecodable(address, request, error))
    }

    #[inline]
    async fn read_with<V: Decode>(
        &mut self,
        address: Address,
        request: ReadRequest,
        variable: &Variable,
    ) -> Result<V, Error<T>> {
        if let Err(error) = decode::check::<V>(variable) {
            return Err(self.undecodable(address, request, error));
        }
        let mut buffer = [0; 4];
        let response = self
            .block_read(address, request, &mut buffer[..variable.width.bytes()])
            .await?;
        V::from_le_slice(response).map_err(|error| self.undecodable(address, request, error))
    }

    #[inline]
    fn undecodable(&mut self, address: Address, request: ReadRequest, error: DecodeError) -> Error<T> {
        self.diagnostics.record(Event::Undecodable {
            address,
            request,
            error,
        });
        Error::Decode(error)
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::test_util::{Nack, Recorder, Scripted, Transaction},
        embassy_futures::block_on,
        quickcheck_macros::quickcheck,
        tic_packet::{
            command,
            variable::{self, Signedness, Width},
        },
    };

    const ADDRESS: Address = Address::DEFAULT;

    #[test]
    fn quick_command_uses_quick_write() {
        let mut bus = Bus::new(Scripted::default());
        block_on(bus.command(ADDRESS, &command::ENERGIZE, 12345)).unwrap();
        assert_eq!(
            bus.transport().log,
            [Transaction::Quick {
                address: 14,
                opcode: 0x85
            }]
        );
    }

    #[quickcheck]
    fn payload_commands_write_the_encoded_frame(value: i64) -> bool {
        let mut bus = Bus::new(Scripted::default());
        block_on(bus.command(ADDRESS, &command::SET_TARGET_VELOCITY, value)).unwrap();
        let mut expected = vec![0xE3];
        expected.extend_from_slice(&(value as u32).to_le_bytes());
        bus.transport().log
            == [Transaction::Write {
                address: 14,
                bytes: expected,
            }]
    }

    #[test]
    fn read_sends_opcode_and_offset() {
        let mut bus = Bus::new(Scripted::replying([vec![0x00, 0x00, 0x00, 0x80]]));
        let position: i32 = block_on(bus.read(ADDRESS, &variable::CURRENT_POSITION)).unwrap();
        assert_eq!(position, i32::MIN);
        assert_eq!(
            bus.transport().log,
            [Transaction::WriteRead {
                address: 14,
                bytes: vec![0xA1, 0x22],
                len: 4,
            }]
        );
    }

    #[test]
    fn clearing_read_uses_its_own_opcode() {
        let mut bus = Bus::new(Scripted::replying([vec![0x01, 0x00, 0x01, 0x00]]));
        let errors: u32 =
            block_on(bus.read_and_clear_errors(ADDRESS, &variable::ERRORS_OCCURRED)).unwrap();
        assert_eq!(errors, 0x0001_0001);
        assert_eq!(
            bus.transport().log,
            [Transaction::WriteRead {
                address: 14,
                bytes: vec![0xA2, 0x04],
                len: 4,
            }]
        );
    }

    #[test]
    fn short_read_does_not_decode() {
        let mut recorder = Recorder::default();
        let mut bus = Bus::with_diagnostics(Scripted::replying([vec![0xFF, 0xFF]]), &mut recorder);
        let result = block_on(bus.read::<i32>(ADDRESS, &variable::CURRENT_POSITION));
        assert_eq!(
            result,
            Err(Error::Decode(DecodeError::ShortRead {
                expected: 4,
                actual: 2
            }))
        );
        drop(bus);
        assert_eq!(recorder.events.len(), 2);
        assert!(recorder.events[1].starts_with("Undecodable"));
    }

    #[test]
    fn mismatched_type_never_touches_the_bus() {
        let mut recorder = Recorder::default();
        let mut bus = Bus::with_diagnostics(
            Scripted::replying([vec![0x78, 0x56, 0x34, 0x12]]),
            &mut recorder,
        );
        let result = block_on(bus.read::<u8>(ADDRESS, &variable::CURRENT_POSITION));
        assert_eq!(
            result,
            Err(Error::Decode(DecodeError::WidthMismatch {
                width: Width::Four,
                signedness: Signedness::Signed,
                requested_width: Width::One,
                requested_signedness: Signedness::Unsigned,
            }))
        );
        assert!(bus.transport().log.is_empty());
        drop(bus);
        assert_eq!(recorder.events.len(), 1);
        assert!(recorder.events[0].starts_with("Undecodable"));
    }

    #[test]
    fn matching_type_requests_the_catalog_width() {
        let mut bus = Bus::new(Scripted::replying([vec![0x78, 0x56, 0x34, 0x12]]));
        let position: i32 =
            block_on(bus.read_and_clear_errors(ADDRESS, &variable::CURRENT_POSITION)).unwrap();
        assert_eq!(position, 0x1234_5678);
        assert_eq!(
            bus.transport().log,
            [Transaction::WriteRead {
                address: 14,
                bytes: vec![0xA2, 0x22],
                len: 4,
            }]
        );
    }

    #[test]
    fn transport_failure_propagates_unchanged() {
        let mut recorder = Recorder::default();
        let mut bus = Bus::with_diagnostics(Scripted::failing(), &mut recorder);
        assert_eq!(
            block_on(bus.command(ADDRESS, &command::SET_MAX_SPEED, 1)),
            Err(Error::Transport(Nack))
        );
        assert_eq!(
            block_on(bus.read::<u16>(ADDRESS, &variable::VIN_VOLTAGE)),
            Err(Error::Transport(Nack))
        );
        assert_eq!(bus.transport().log.len(), 2);
        drop(bus);
        assert_eq!(
            recorder.events,
            [
                "TransportFailed { address: Address(14), opcode: 230 }",
                "TransportFailed { address: Address(14), opcode: 161 }",
            ]
        );
    }

    #[test]
    fn read_value_follows_the_catalog() {
        let mut bus = Bus::new(Scripted::replying([
            vec![0x34, 0x12],
            vec![0xFF, 0xFF, 0xFF, 0xFF],
            vec![0x0A],
        ]));
        assert_eq!(
            block_on(bus.read_value(ADDRESS, &variable::VIN_VOLTAGE)),
            Ok(Value::U16(0x1234))
        );
        assert_eq!(
            block_on(bus.read_value(ADDRESS, &variable::ENCODER_POSITION)),
            Ok(Value::I32(-1))
        );
        assert_eq!(
            block_on(bus.read_value(ADDRESS, &variable::OPERATION_STATE)),
            Ok(Value::U8(10))
        );
    }

    #[test]
    fn block_read_returns_only_what_arrived() {
        let mut bus = Bus::new(Scripted::replying([vec![1, 2, 3]]));
        let mut buffer = [0; 8];
        let response = block_on(bus.block_read(
            ADDRESS,
            ReadRequest::get_variable(0x3F),
            &mut buffer,
        ))
        .unwrap();
        assert_eq!(response, [1, 2, 3]);
    }
}
