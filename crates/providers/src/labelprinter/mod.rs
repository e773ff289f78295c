pub mod client;
pub mod config;

pub use client::HttpPrintClient;
pub use config::PrinterConfig;
