pub mod config;
pub mod diagnostics;
pub mod download;
pub mod interrupt;
pub mod progress;
pub mod sink;
pub mod stream;
