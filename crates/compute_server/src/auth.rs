//! Salted password digests.
//!
//! A digest is `base64(SHA-256(salt || password))`, where `salt` is the
//! base64 text of 8 random bytes and is hashed as text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::db::Player;

/// Random bytes per salt.
const SALT_BYTES: usize = 8;

/// Generates a fresh per-account salt.
#[instrument]
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rng().fill(&mut bytes);
    STANDARD.encode(bytes)
}

/// Digests a password with the given salt.
pub fn hash_password(salt: &str, password: &str) -> String {
    let digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    STANDARD.encode(digest)
}

/// Checks a password attempt against the stored digest.
#[instrument(skip(player, password), fields(username = %player.username()))]
pub fn verify_password(player: &Player, password: &str) -> bool {
    let matches = hash_password(player.salt(), password) == *player.hashed_password();
    debug!(matches, "Password checked");
    matches
}
