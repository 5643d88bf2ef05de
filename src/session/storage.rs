use crate::error::Result;

/// Keys of the three persisted session slots.
pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const USER_NAME_KEY: &str = "userName";

/// Trait for durable key/value storage backing the session.
///
/// Values are plain strings, written and read back verbatim. Writes are
/// synchronous: when `set` returns, the value is durable.
pub trait DurableStorage: Send + Sync {
    /// Read a slot
    fn get(&self, key: &str) -> Option<String>;

    /// Write a slot
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
