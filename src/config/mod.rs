mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding `media.root`.
pub const MEDIA_ROOT_ENV: &str = "MEDIA_ROOT";
/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./media-explorer.toml",
        "~/.config/media-explorer/config.toml",
        "/etc/media-explorer/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Apply `MEDIA_ROOT` and `PORT` from the process environment.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = lookup(MEDIA_ROOT_ENV).filter(|v| !v.is_empty()) {
        config.media.root = PathBuf::from(shellexpand::tilde(&root).as_ref());
    }

    if let Some(port) = lookup(PORT_ENV).filter(|v| !v.is_empty()) {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} value: {:?}", PORT_ENV, port))?;
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let root = &config.media.root;
    if !root.exists() {
        anyhow::bail!("Media root does not exist: {:?}", root);
    }
    if !root.is_dir() {
        anyhow::bail!("Media root is not a directory: {:?}", root);
    }

    if let Some(dir) = &config.server.static_dir {
        if !dir.exists() {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.static_dir.is_none());
        assert!(config.media.root.is_absolute());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[media]\nroot = \"/srv/media\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.media.root, PathBuf::from("/srv/media"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = \"many\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_missing_custom_path_fails() {
        let dir = tempdir().unwrap();
        assert!(load_config_or_default(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        apply_overrides(&mut config, lookup(&[("MEDIA_ROOT", "/data"), ("PORT", "8081")]))
            .unwrap();
        assert_eq!(config.media.root, PathBuf::from("/data"));
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let mut config = Config::default();
        let before = config.media.root.clone();
        apply_overrides(&mut config, lookup(&[("MEDIA_ROOT", ""), ("PORT", "")])).unwrap();
        assert_eq!(config.media.root, before);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = Config::default();
        assert!(apply_overrides(&mut config, lookup(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn test_validate() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.media.root = dir.path().to_path_buf();
        validate_config(&config).unwrap();

        config.server.port = 0;
        assert!(validate_config(&config).is_err());

        config.server.port = 3000;
        config.media.root = dir.path().join("missing");
        assert!(validate_config(&config).is_err());

        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        config.media.root = file;
        assert!(validate_config(&config).is_err());
    }
}
