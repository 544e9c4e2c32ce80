//! Application layer: seed loading and the editing session
//!
//! This layer holds the current tree and drives the domain mutations.

pub mod error;
pub mod error_ext;
pub mod seed;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{read_text, IoResultExt};
pub use seed::{load_seed, parse_seed_json, parse_seed_toml};
pub use session::{DeleteStrategy, EditOutcome, TreeSession};
