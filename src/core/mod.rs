// src/core/mod.rs

pub mod candidates;
pub mod channel;
pub mod edit;
pub mod engine;
pub mod prior;
pub mod scorer;
pub mod types;
