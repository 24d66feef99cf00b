//! Random string generation
//!
//! Characters are sampled uniformly from a fixed alphabet using the
//! thread-local generator, which is a CSPRNG seeded from the OS.

use rand::seq::SliceRandom;

const ALPHABETIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const HEXADECIMAL: &[u8] = b"abcdef1234567890";

/// `len` characters from `a-zA-Z`
pub fn rand_alphabetic_string(len: usize) -> String {
    rand_string(len, ALPHABETIC)
}

/// `len` characters from `a-f0-9`
pub fn rand_hex_string(len: usize) -> String {
    rand_string(len, HEXADECIMAL)
}

/// `charset` must be non-empty ASCII.
fn rand_string(len: usize, charset: &[u8]) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .filter_map(|_| charset.choose(&mut rng))
        .map(|&b| b as char)
        .collect()
}
