pub mod config;
pub mod data_key;
pub mod generate;
