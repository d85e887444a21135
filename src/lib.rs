//! curlfetch library
//!
//! Downloads a single file by driving `curl`, with live progress, clean
//! interruption and typed errors. This library backs the `curlfetch` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::core::download::{DownloadRequest, Downloader, ExecutionResult};
pub use crate::core::progress::{parse_progress_line, ProgressUpdate};
pub use crate::core::sink::{InfoOptions, ProgressSink};
pub use crate::error::{FetchError, Result};
