use {
    crate::{
        diagnostics::{Diagnostics, Event},
        transport::Transport,
    },
    std::collections::VecDeque,
    tic_packet::Address,
};

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Transaction {
    Quick { address: u8, opcode: u8 },
    Write { address: u8, bytes: Vec<u8> },
    WriteRead { address: u8, bytes: Vec<u8>, len: usize },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Nack;

/// Records every transaction and answers reads from a queue.
#[derive(Debug, Default)]
pub(crate) struct Scripted {
    pub(crate) log: Vec<Transaction>,
    pub(crate) replies: VecDeque<Vec<u8>>,
    pub(crate) fail: bool,
}

impl Scripted {
    pub(crate) fn replying(replies: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn outcome(&self) -> Result<(), Nack> {
        if self.fail { Err(Nack) } else { Ok(()) }
    }
}

impl Transport for Scripted {
    type Error = Nack;

    async fn quick_write(&mut self, address: Address, opcode: u8) -> Result<(), Self::Error> {
        self.log.push(Transaction::Quick {
            address: address.get(),
            opcode,
        });
        self.outcome()
    }

    async fn write(&mut self, address: Address, bytes: &[u8]) -> Result<(), Self::Error> {
        self.log.push(Transaction::Write {
            address: address.get(),
            bytes: bytes.to_vec(),
        });
        self.outcome()
    }

    async fn write_read(
        &mut self,
        address: Address,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<usize, Self::Error> {
        self.log.push(Transaction::WriteRead {
            address: address.get(),
            bytes: bytes.to_vec(),
            len: buffer.len(),
        });
        let () = self.outcome()?;
        let reply = self.replies.pop_front().unwrap_or_default();
        let n = reply.len().min(buffer.len());
        buffer[..n].copy_from_slice(&reply[..n]);
        Ok(n)
    }
}

/// Keeps the `Debug` rendering of every event.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) events: Vec<String>,
}

impl Diagnostics for Recorder {
    fn record(&mut self, event: Event<'_>) {
        self.events.push(format!("{event:?}"));
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Busy;

/// A `RefCell` whose lock error can be compared in assertions.
pub(crate) struct Exclusive<Item>(core::cell::RefCell<Item>);

impl<Item> Exclusive<Item> {
    pub(crate) fn into_inner(self) -> Item {
        self.0.into_inner()
    }
}

impl<Item> crate::mutex::Mutex for Exclusive<Item> {
    type Item = Item;
    type Error = Busy;

    fn new(item: Item) -> Self {
        Self(core::cell::RefCell::new(item))
    }

    async fn lock(&self) -> Result<impl core::ops::DerefMut<Target = Self::Item>, Self::Error> {
        self.0.try_borrow_mut().map_err(|_| Busy)
    }
}
