mod codec;
mod entry;
mod index_scanner;
mod log_store;
mod sled_adapter;


pub use codec::*;
pub use entry::*;
pub use index_scanner::*;
pub use log_store::*;
pub use sled_adapter::*;
