pub mod common;
pub mod config;
pub mod energy;
pub mod export;
pub mod insights;
pub mod plan;
pub mod suggest;
