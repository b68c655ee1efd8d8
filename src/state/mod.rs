// SPDX-License-Identifier: MIT

//! Durable per-flow state
//!
//! Tasks persist small pieces of state between executions: offsets, cursors,
//! last-seen timestamps. `StateStore` addresses them through a derived
//! `StateKey` and keeps two storage generations coherent while old entries
//! migrate into the current layout.

pub mod key;
pub mod store;
pub mod tier;

pub use key::StateKey;
pub use store::StateStore;
pub use tier::{KvTier, LegacyBlobTier, StateTier};
