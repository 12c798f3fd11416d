//! Storage abstractions for the Landsat ETL.
//!
//! Provides:
//! - Object storage (S3 compatible) for reading scene band files
//! - A caching hook invoked with every band file fetched
//! - An in-memory LRU band cache implementing that hook

pub mod cache;
pub mod error;
pub mod hook;
pub mod object_store;

pub use self::object_store::{ObjectStorage, ObjectStorageConfig, StoragePath};
pub use cache::{BandCache, CacheStats};
pub use error::{Result, StorageError};
pub use hook::CacheHook;
