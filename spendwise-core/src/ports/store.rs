//! State store port - persistent key-value abstraction

use crate::domain::result::Result;

/// Persistent key-value storage for serialized state blobs
///
/// Values are opaque strings; typing, versioning and change notification
/// live in `StateService`, so adapters only move bytes.
pub trait StateStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// List stored keys
    fn keys(&self) -> Result<Vec<String>>;

    /// Remove every key
    fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }
}
