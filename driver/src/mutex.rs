use core::{cell::RefCell, fmt, ops::DerefMut};

/// Exclusive access to a shared bus.
///
/// The bus can only carry one transaction at a time, so every device on it
/// goes through one of these before touching the transport.
#[expect(async_fn_in_trait, reason = "single-core executors never need `Send` futures")]
pub trait Mutex {
    type Item;
    type Error: fmt::Debug;
    fn new(item: Self::Item) -> Self;
    async fn lock(&self) -> Result<impl DerefMut<Target = Self::Item>, Self::Error>;
}

/// Single-task use: a second overlapping lock fails instead of waiting.
impl<Item> Mutex for RefCell<Item> {
    type Item = Item;
    type Error = core::cell::BorrowMutError;

    #[inline(always)]
    fn new(item: Item) -> Self {
        RefCell::new(item)
    }

    #[inline(always)]
    async fn lock(&self) -> Result<impl DerefMut<Target = Self::Item>, Self::Error> {
        self.try_borrow_mut()
    }
}
