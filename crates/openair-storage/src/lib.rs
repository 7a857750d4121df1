//! Object storage abstraction for prerecordings.
//!
//! This crate defines the `ObjectStorage` trait plus two backends: an S3
//! backend for production (works against any S3-compatible endpoint) and an
//! in-memory backend for tests.
//!
//! **Key format:** objects are keyed `{event}/{start}` - see `openair-core`'s
//! key codec. Listing is non-recursive, so only keys directly under an event
//! prefix are visible.

pub mod memory;
pub mod s3;
pub mod traits;

pub use memory::MemoryStorage;
pub use s3::S3Storage;
pub use traits::{ObjectStat, ObjectStorage, ObjectStream, StorageError, StorageObject, StorageResult};
