// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod training;
pub use crate::config::{ChannelKind, CorrectorConfig};
pub use crate::core::engine::SpellCorrector;
pub use crate::error::{Result, SpellError};
