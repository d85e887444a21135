use crate::core::{config::Config, download::Downloader};
use crate::error::Result;
use crate::utils::terminal::TerminalSink;
use std::io::IsTerminal;
use std::path::Path;

/// Per-invocation overrides from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    pub curl_path: Option<String>,
    pub no_progress: bool,
    pub no_location: bool,
    pub extra_args: Vec<String>,
}

impl GetOptions {
    pub fn apply(&self, config: &mut Config) {
        if let Some(curl_path) = &self.curl_path {
            config.curl_path = curl_path.clone();
        }
        if self.no_progress {
            config.show_progress = false;
        }
        if self.no_location {
            config.follow_redirects = false;
        }
        config.extra_args.extend(self.extra_args.iter().cloned());
    }
}

pub async fn fetch(source: &str, destination: &Path, options: &GetOptions) -> Result<()> {
    let mut config = Config::load()?;
    options.apply(&mut config);
    config.validate()?;

    let show_progress = config.show_progress && std::io::stderr().is_terminal();
    let mut downloader = Downloader::new(source, destination).with_config(config);
    if show_progress {
        downloader = downloader.with_progress(TerminalSink::stderr());
    }

    println!("Downloading {}...", downloader.source());
    downloader.download().await?;

    println!("Downloaded to {}", downloader.destination().display());
    Ok(())
}
