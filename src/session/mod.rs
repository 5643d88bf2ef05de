mod filesystem;
mod memory;
mod storage;
mod store;

pub use filesystem::{default_storage_dir, FilesystemStorage, SESSION_FILE_NAME};
pub use memory::MemoryStorage;
pub use storage::{DurableStorage, ROLE_KEY, TOKEN_KEY, USER_NAME_KEY};
pub use store::{AuthState, RestorePolicy, SessionStore, SessionWatcher, ADMIN_DISPLAY_NAME};

use crate::api::ApiClient;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// Open a session store persisted under `storage_dir`, or the default cache directory.
pub fn open_session_store(
    api: ApiClient,
    storage_dir: Option<&Path>,
    policy: RestorePolicy,
) -> Result<SessionStore> {
    let storage = match storage_dir {
        Some(dir) => FilesystemStorage::new(dir),
        None => FilesystemStorage::default_location()?,
    };
    Ok(SessionStore::new(api, Arc::new(storage), policy))
}
