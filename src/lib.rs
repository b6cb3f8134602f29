pub mod board;
pub mod checks;
pub mod config;
pub mod db;
pub mod models;
pub mod notify;
pub mod scheduler;
pub mod social;
pub mod solana;
pub mod strategy;
pub mod utils;
