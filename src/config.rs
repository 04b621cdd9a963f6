//! Loading game configuration from JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use skyrunner_game::GameConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Read a config file. Missing fields fall back to their defaults.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config).map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<GameConfig, serde_json::Error> {
    serde_json::from_str(text)
}

/// Reject values the simulation cannot run with.
pub fn validate(config: &GameConfig) -> Result<(), String> {
    let max_frame_delta = config.movement.max_frame_delta;
    if !(max_frame_delta.is_finite() && max_frame_delta > 0.0) {
        return Err(format!("movement.max_frame_delta must be positive, got {max_frame_delta}"));
    }
    if config.path.max_segments == 0 {
        return Err("path.max_segments must be at least 1".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrunner_game::CameraPolicy;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_config(r#"{ "seed": 7, "camera": { "policy": "Follow" } }"#).unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.camera.policy, CameraPolicy::Follow);
        assert_eq!(config.path.max_segments, 20);
        assert_eq!(config.movement.spawn_height, 100.0);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.locomotion.fall_loop_repeat, 10);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(parse_config("{ seed: }").is_err());
    }

    #[test]
    fn test_validate_frame_delta() {
        assert!(validate(&GameConfig::default()).is_ok());

        let config = parse_config(r#"{ "movement": { "max_frame_delta": -0.5 } }"#).unwrap();
        assert!(validate(&config).is_err());

        let mut config = GameConfig::default();
        config.movement.max_frame_delta = f32::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let path = std::env::temp_dir().join("skyrunner-invalid-config.json");
        fs::write(&path, r#"{ "path": { "max_segments": 0 } }"#).unwrap();

        let err = load_config(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/skyrunner.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
