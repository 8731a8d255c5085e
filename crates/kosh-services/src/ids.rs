//! Random alphanumeric identifiers for orders and parents.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// A fresh alphanumeric id of the given length.
pub fn random_id(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
