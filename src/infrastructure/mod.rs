//! Adapters for the domain ports: the bundled catalog, in-memory stores and
//! the optional RocksDB session store.

pub mod catalog;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
