//! Settings storage
//!
//! Whole-document JSON persistence for the three configuration documents:
//! connection, model-load parameters, and sampling parameters. Each document
//! is read on demand and overwritten in full on save; a missing or corrupt
//! file falls back to defaults.

use crate::storage::{get_data_dir, StorageError};
use crate::types::config::{ConnectionConfig, LoadConfig};
use crate::types::params::SamplingParameters;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

fn connection_path() -> Result<PathBuf, StorageError> {
    Ok(get_data_dir()?.join("connection.json"))
}

fn load_config_path() -> Result<PathBuf, StorageError> {
    Ok(get_data_dir()?.join("load-config.json"))
}

fn parameters_path() -> Result<PathBuf, StorageError> {
    Ok(get_data_dir()?.join("parameters.json"))
}

fn read_document<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        tracing::debug!("Document {:?} not found, using defaults", path);
        return T::default();
    }
    match fs::read_to_string(path)
        .map_err(StorageError::from)
        .and_then(|json| serde_json::from_str(&json).map_err(StorageError::from))
    {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to load {:?}, using defaults: {}", path, e);
            T::default()
        }
    }
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    tracing::debug!("Saved {:?}", path);
    Ok(())
}

/// Load the connection config, falling back to defaults
pub fn load_connection() -> ConnectionConfig {
    match connection_path() {
        Ok(path) => read_document(&path),
        Err(e) => {
            tracing::warn!("Failed to resolve connection path: {}", e);
            ConnectionConfig::default()
        }
    }
}

/// Save the connection config
pub fn save_connection(config: &ConnectionConfig) -> Result<(), StorageError> {
    write_document(&connection_path()?, config)
}

/// Load the model-load config, falling back to defaults
pub fn load_load_config() -> LoadConfig {
    match load_config_path() {
        Ok(path) => read_document(&path),
        Err(e) => {
            tracing::warn!("Failed to resolve load-config path: {}", e);
            LoadConfig::default()
        }
    }
}

/// Save the model-load config
pub fn save_load_config(config: &LoadConfig) -> Result<(), StorageError> {
    write_document(&load_config_path()?, config)
}

/// Load the sampling parameters, falling back to defaults
pub fn load_parameters() -> SamplingParameters {
    match parameters_path() {
        Ok(path) => read_document(&path),
        Err(e) => {
            tracing::warn!("Failed to resolve parameters path: {}", e);
            SamplingParameters::default()
        }
    }
}

/// Save the sampling parameters
pub fn save_parameters(params: &SamplingParameters) -> Result<(), StorageError> {
    write_document(&parameters_path()?, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::CacheMode;

    #[test]
    fn test_missing_document_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: LoadConfig = read_document(&dir.path().join("nope.json"));
        assert_eq!(loaded.max_seq_len, 4096);
    }

    #[test]
    fn test_corrupt_document_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connection.json");
        fs::write(&path, "{not json").unwrap();
        let loaded: ConnectionConfig = read_document(&path);
        assert!(loaded.url.is_empty());
    }

    #[test]
    fn test_connection_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connection.json");
        let config = ConnectionConfig {
            url: "http://127.0.0.1:5000".to_string(),
            api_key: "secret".to_string(),
        };
        write_document(&path, &config).unwrap();
        let loaded: ConnectionConfig = read_document(&path);
        assert_eq!(loaded.url, config.url);
        assert_eq!(loaded.api_key, config.api_key);
    }

    #[test]
    fn test_load_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("load-config.json");
        let config = LoadConfig {
            max_seq_len: 16384,
            gpu_split_auto: false,
            gpu_split: vec![0.5, 0.5],
            cache_mode: CacheMode::Q8,
            max_cache_size: Some(32768),
            rope_scale: Some(1.0),
            rope_alpha: Some(2.5),
            draft_rope_scale: None,
            draft_rope_alpha: None,
            draft_model: Some("draft-1b".to_string()),
        };
        write_document(&path, &config).unwrap();
        let loaded: LoadConfig = read_document(&path);
        assert_eq!(loaded.max_seq_len, config.max_seq_len);
        assert_eq!(loaded.gpu_split, config.gpu_split);
        assert_eq!(loaded.cache_mode, config.cache_mode);
        assert_eq!(loaded.max_cache_size, config.max_cache_size);
        assert_eq!(loaded.draft_model, config.draft_model);

        // On-disk keys stay compatible with the documents the panel always wrote
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("Max Seq Len").is_some());
        assert!(raw.get("Draft Model").is_some());
    }

    #[test]
    fn test_parameters_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parameters.json");
        let params = SamplingParameters {
            temperature: 1.3,
            top_k: 64,
            presence_penalty: 0.5,
            ..SamplingParameters::default()
        };
        write_document(&path, &params).unwrap();
        let loaded: SamplingParameters = read_document(&path);
        assert_eq!(loaded, params);
    }
}
