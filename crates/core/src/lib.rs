pub mod config;
pub mod record;

pub use config::Config;
pub use record::{Chunk, RawRecord};
