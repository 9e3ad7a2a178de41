// src/core/config_manager.rs
//! Client configuration: optional `config.yaml` per environment, then env overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ROLE: &str = "Software Engineer";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    /// `config.yaml` that was read, if one exists
    pub config_file: Option<PathBuf>,
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub voice: VoiceConfig,
    pub default_role: String,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub state_dir: PathBuf,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Recorder program and args; the clip path is appended as last argument
    pub recorder_command: Vec<String>,
    /// Player program and args; the audio path is appended as last argument
    pub player_command: Option<Vec<String>>,
}

/// One environment section of `config.yaml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileSection {
    api_url: Option<String>,
    timeout_seconds: Option<u64>,
    state_dir: Option<PathBuf>,
    log_file: Option<PathBuf>,
    default_role: Option<String>,
    recorder_command: Option<Vec<String>>,
    player_command: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: FileSection,
    production: FileSection,
}

impl ConfigManager {
    /// Load configuration from `config.yaml` in the current directory (if any)
    /// and the process environment
    pub fn load() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&base_dir, |key| std::env::var(key).ok())
    }

    /// Load with an explicit base directory and environment lookup
    pub fn load_from<F>(base_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = env("COACH_ENV")
            .or_else(|| env("ENVIRONMENT"))
            .unwrap_or_else(|| "local".to_string());

        let config_path = base_dir.join(CONFIG_FILE);
        let section = Self::read_section(&config_path, &environment)?;
        let config_file = config_path.exists().then_some(config_path);

        let timeout_seconds = section.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than 0");
        }

        let api_url = env("COACH_API_URL")
            .or_else(|| env("NEXT_PUBLIC_API_URL"))
            .or(section.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let state_dir = env("COACH_STATE_DIR")
            .map(PathBuf::from)
            .or(section.state_dir)
            .unwrap_or_else(|| PathBuf::from(".interview-coach"));

        let log_file = env("COACH_LOG_FILE")
            .map(PathBuf::from)
            .or(section.log_file)
            .unwrap_or_else(|| PathBuf::from("/tmp/interview-coach.log"));

        Ok(Self {
            environment,
            config_file,
            service: ServiceConfig {
                api_url: normalize_base_url(&api_url),
                timeout_seconds,
            },
            storage: StorageConfig {
                state_dir: resolve_path(base_dir, &state_dir),
                log_file: resolve_path(base_dir, &log_file),
            },
            voice: VoiceConfig {
                recorder_command: section.recorder_command.unwrap_or_else(|| {
                    ["arecord", "-q", "-f", "cd", "-t", "wav"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
                player_command: section.player_command,
            },
            default_role: section
                .default_role
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        })
    }

    fn read_section(path: &Path, environment: &str) -> Result<FileSection> {
        if !path.exists() {
            return Ok(FileSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
