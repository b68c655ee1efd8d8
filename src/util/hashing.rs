// SPDX-License-Identifier: MIT

//! Stable digests for correlation values
//!
//! Correlation values are arbitrary caller-supplied strings (iteration
//! markers, customer ids, dates). They enter storage keys through a digest
//! that must produce the same output across process restarts and across
//! platforms, so state written by one worker is found by another.

use sha2::{Digest, Sha256};

/// Number of digest bytes kept in the key segment. 64 bits keeps segments
/// short while leaving collisions among correlation values of one state
/// practically impossible.
const SEGMENT_BYTES: usize = 8;

/// Digest a correlation value into a fixed-width lowercase hex segment.
pub fn stable_hash(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    digest
        .iter()
        .take(SEGMENT_BYTES)
        .map(|b| format!("{:02x}", b))
        .collect()
}
