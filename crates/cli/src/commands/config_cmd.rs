//! `chatwhisk config` — Configuration management commands.

use chatwhisk_config::{HelperConfig, LogLevel};

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match HelperConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!(
                "   API host:    {}",
                config.openwhisk.api_host.as_deref().unwrap_or("(unset)")
            );
            println!("   Namespace:   {}", config.openwhisk.namespace);
            println!(
                "   Package:     {}",
                config.openwhisk.package.as_deref().unwrap_or("(none)")
            );
            println!("   Log level:   {}", config.logger.level);
            println!("   Workspaces:  {}", config.conversation.workspaces.len());
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Settings that load fine but will not work against a live deployment.
fn warnings(config: &HelperConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    if config.openwhisk.api_host.is_none() {
        warnings.push("No API host set (set openwhisk.api_host or __OW_API_HOST)");
    }
    if config.openwhisk.auth.is_none() {
        warnings.push("No credentials set (set openwhisk.auth or __OW_API_KEY)");
    }
    if config.openwhisk.package.as_deref().is_none_or(str::is_empty) {
        warnings.push("No package set; action names will not be qualified");
    }
    if config.logger.level == LogLevel::Debug {
        warnings.push("Remote log level is DEBUG; every helper call will be logged");
    }

    warnings
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = HelperConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.openwhisk.auth.is_some() {
        config.openwhisk.auth = Some("***".into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", HelperConfig::config_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_warn_about_missing_deployment() {
        let warnings = warnings(&HelperConfig::default());
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn complete_config_has_no_warnings() {
        let config = HelperConfig::from_value(json!({
            "openwhisk": {
                "api_host": "https://ow.example.com",
                "auth": "user:secret",
                "package": "bot"
            }
        }))
        .unwrap();
        assert!(warnings(&config).is_empty());
    }

    #[test]
    fn config_path_is_toml() {
        let path = HelperConfig::config_path();
        assert!(path.to_str().unwrap().ends_with(".toml") || std::env::var("CHATWHISK_CONFIG").is_ok());
    }
}
