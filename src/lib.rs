// src/lib.rs
pub mod ai;
pub mod cli;
pub mod config;
pub mod cv;
pub mod jobs;
pub mod ledger;
pub mod mail;
pub mod utils;

pub use config::AppConfig;
pub use ledger::{ApplicationRecord, Ledger};
