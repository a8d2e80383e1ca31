//! Persistence module split across logical submodules.

mod books;
mod connection;
mod storage;

pub use books::{BookStore, DEFAULT_STORAGE_KEY};
pub use connection::{db_path, ensure_schema, open_in_memory};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
