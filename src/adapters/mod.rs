// Adapters layer: everything that touches bytes, files or delimited text.

pub mod decode;
pub mod delimited;
pub mod storage;

pub use storage::LocalStorage;
