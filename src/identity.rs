//! Persistent local identity.
//!
//! Every installation gets one random id, created on first use and reused
//! across sessions. It is the only locally persisted state and is what
//! distinguishes "my" messages in the shared broadcast room.

use rand::Rng;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

#[cfg(target_arch = "wasm32")]
use once_cell::sync::Lazy;
#[cfg(target_arch = "wasm32")]
use std::sync::Mutex;

const IDENTITY_FILE: &str = "identity";

/// In-memory fallback for WASM, where there is no data directory.
#[cfg(target_arch = "wasm32")]
static SESSION_IDENTITY: Lazy<Mutex<Option<String>>> = Lazy::new(|| Mutex::new(None));

fn generate_identity() -> String {
    let mut rng = rand::rng();
    let suffix: String = (&mut rng)
        .sample_iter(rand::distr::Alphanumeric)
        .take(9)
        .map(|byte| (byte as char).to_ascii_lowercase())
        .collect();
    format!("user_{suffix}")
}

#[cfg(not(target_arch = "wasm32"))]
fn identity_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("ghostline").join(IDENTITY_FILE);
    }
    PathBuf::from("cache").join(IDENTITY_FILE)
}

/// The local identity, creating and persisting a fresh one if none exists.
/// Falls back to a session-only id when the identity file is unwritable.
#[cfg(not(target_arch = "wasm32"))]
pub fn local_identity() -> String {
    let path = identity_path();
    if let Ok(existing) = fs::read_to_string(&path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let fresh = generate_identity();
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            tracing::warn!("failed to create identity directory: {err}");
            return fresh;
        }
    }
    if let Err(err) = fs::write(&path, &fresh) {
        tracing::warn!("failed to persist identity: {err}");
    }
    fresh
}

#[cfg(target_arch = "wasm32")]
pub fn local_identity() -> String {
    let mut slot = SESSION_IDENTITY.lock().expect("identity slot poisoned");
    slot.get_or_insert_with(generate_identity).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_identity_has_expected_shape() {
        let id = generate_identity();
        let suffix = id.strip_prefix("user_").expect("user_ prefix");
        assert_eq!(suffix.len(), 9);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn generated_identities_differ() {
        assert_ne!(generate_identity(), generate_identity());
    }
}
