pub mod slot;
pub mod store;

pub use slot::{HandoffReader, HandoffWriter, WaitPolicy, slot};
pub use store::{
    FileStore, HandoffStore, KeyValueStore, LETTERS_KEY, MemoryStore, OPTIONS_KEY, Options,
    PersistedResult,
};
