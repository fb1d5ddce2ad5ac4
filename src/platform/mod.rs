//! Platform abstraction layer
//!
//! Handles the pieces that differ between front-ends:
//! - Input events
//! - Time
//! - Storage (JSON files in the user data directory)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{Action, InputMapper, KeyBindings};
pub use storage::StorageError;
pub use time::{Clock, ManualClock, SystemClock};
