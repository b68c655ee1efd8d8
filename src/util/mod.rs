// SPDX-License-Identifier: MIT

//! Shared helpers for key derivation
//!
//! - `slug` - identifier normalization into storage-safe slugs
//! - `hashing` - stable digests for correlation values

pub mod hashing;
pub mod slug;

pub use hashing::stable_hash;
pub use slug::slugify;
