use anyhow::Result;

use averbuch_core::AppConfig;

pub async fn show(config: &AppConfig) -> Result<()> {
    println!("# {}", AppConfig::config_path().display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

pub async fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    AppConfig::default().save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
