use crate::core::config::{get_config_path, Config};
use crate::error::Result;
use crate::utils::fs;

pub fn show_config() -> Result<()> {
    let config = Config::load()?;
    println!("Config file: {:?}", get_config_path()?);
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn set_curl_path(curl_path: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set_curl_path(curl_path.to_string())?;
    println!("✅ Transfer tool set to {curl_path}");
    Ok(())
}

pub fn reset_config() -> Result<()> {
    let config_path = get_config_path()?;
    if fs::remove_file_if_exists(&config_path)? {
        println!("Removed {config_path:?}");
    }
    Config::load_from(&config_path)?;
    println!("✅ Configuration reset to defaults");
    Ok(())
}
