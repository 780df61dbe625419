//! The persistence seam of the ledger.
//!
//! The ledger never talks to a storage medium directly. It is handed a `Store` and calls `read`
//! once when it is loaded and `write` with the full sequence after every mutation.

mod file;
mod memory;

use crate::model::Transaction;
use crate::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// The key under which the transaction sequence is persisted.
pub const TRANSACTIONS: &str = "transactions";

/// Reads and writes the whole transaction sequence, newest first.
#[async_trait::async_trait]
pub trait Store {
    /// Returns the persisted sequence, or `None` if nothing has been persisted yet.
    async fn read(&mut self) -> Result<Option<Vec<Transaction>>>;

    /// Replaces whatever was persisted with `transactions`.
    async fn write(&mut self, transactions: &[Transaction]) -> Result<()>;
}

/// Creates a dynamically-dispatched `Store` that persists to a JSON file.
pub fn file(store: FileStore) -> Box<dyn Store + Send> {
    Box::new(store)
}

/// Creates a dynamically-dispatched `Store` that holds its data in memory.
pub fn memory(store: MemoryStore) -> Box<dyn Store + Send> {
    Box::new(store)
}
