pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod key;
pub mod report;
pub mod solana;
