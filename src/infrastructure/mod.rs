pub mod config;
pub mod excel;
pub mod export;
pub mod logging;
pub mod pdf;
pub mod security;
