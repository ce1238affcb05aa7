use serde::{Deserialize, Serialize};

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
    pub program: ProgramConfig,
}

impl CoachConfig {
    /// Parse a host-supplied JSON config. Missing fields take defaults.
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        serde_json::from_str(raw).map_err(|e| crate::CoachError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Transport-level timeout. `None` waits as long as the backend takes.
    pub request_timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: None,
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    #[default]
    Auto,
    Memory,
    IndexedDb,
}

/// Delays for the cosmetic loading stages and the restart guidance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub selecting_after_ms: u64,
    pub applying_after_ms: u64,
    pub guidance_delay_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            selecting_after_ms: 50_000,
            applying_after_ms: 35_000,
            guidance_delay_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Last week of the structured program
    pub terminal_week: u32,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self { terminal_week: 10 }
    }
}

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8123";
