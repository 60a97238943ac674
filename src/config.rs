//! Configuration loader and schema types.
//!
//! Settings drive the media base address, playback defaults, search
//! debouncing, local library scanning and logging.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
