//! Seam traits consumed by the shardnode caches.
//!
//! - **Account**: sub-key access to a user account
//! - **Marshal**: deterministic value encoding
//! - **Epoch**: epoch change broadcast
//!
//! Other crates depend on these traits rather than on the state layer, the
//! codec or the chain clock directly, which keeps them testable with the
//! in-memory doubles from [`crate::testing`].

mod account;
mod epoch;
mod marshal;

pub use account::*;
pub use epoch::*;
pub use marshal::*;
