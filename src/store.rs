//! Registered-user store
//!
//! A flat JSON array of user records on disk, loaded once per run. An
//! unreadable or malformed store loads as an empty list with a logged
//! warning; the scheduled run must never abort on store problems.

use crate::Result;
use crate::models::UserRecord;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load all registered users
///
/// Missing file, unreadable file, or malformed JSON all yield an empty
/// sequence.
pub fn load_users(path: impl AsRef<Path>) -> Vec<UserRecord> {
    let path = path.as_ref();

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Could not read user store {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<UserRecord>>(&contents) {
        Ok(users) => {
            info!("Loaded {} user(s) from {}", users.len(), path.display());
            users
        }
        Err(e) => {
            warn!("Malformed user store {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Append one user record to the store
///
/// Reads the existing array (or starts empty), appends, and writes the whole
/// array back pretty-printed.
pub fn append_user(path: impl AsRef<Path>, record: UserRecord) -> Result<()> {
    let path = path.as_ref();

    let mut users = if path.exists() {
        load_users(path)
    } else {
        Vec::new()
    };

    users.push(record);

    let serialized = serde_json::to_string_pretty(&users)
        .map_err(|e| crate::StormwatchError::validation(format!("Could not encode users: {e}")))?;
    fs::write(path, serialized)?;

    info!("Saved user record to {}", path.display());
    Ok(())
}
