use crate::core::config::{get_config_path, Config};
use crate::error::{FetchError, Result};
use std::path::PathBuf;
use std::process::Command;

/// Locate the transfer tool the way the shell would.
pub fn resolve_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| FetchError::ToolNotFound {
        name: name.to_string(),
    })
}

/// First line of `<tool> --version`, if the tool answers.
pub fn tool_version(path: &std::path::Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}

pub fn check_environment() -> Result<()> {
    println!("🔍 curlfetch - Environment Check");
    println!();

    let config = Config::load()?;

    println!("📁 Configuration:");
    println!("  config file: {:?}", get_config_path()?);
    println!("  transfer tool: {}", config.curl_path);
    if !config.extra_args.is_empty() {
        println!("  extra arguments: {}", config.extra_args.join(" "));
    }
    println!();

    println!("🧪 Transfer Tool:");
    let path = match resolve_tool(&config.curl_path) {
        Ok(path) => {
            println!("  ✅ found at {path:?}");
            path
        }
        Err(e) => {
            println!("  ❌ '{}' not found on PATH", config.curl_path);
            println!();
            println!("💡 To fix:");
            println!("  - Install curl with your package manager");
            println!("  - Or run 'curlfetch config set-curl <path>'");
            return Err(e);
        }
    };

    match tool_version(&path) {
        Some(version) => println!("  ✅ '{} --version' works: {version}", config.curl_path),
        None => println!("  ⚠️  '{} --version' did not answer", config.curl_path),
    }

    println!();
    println!("🎉 Environment looks good! No issues found.");
    Ok(())
}
