use crate::utils::error::{MenuError, Result};
use crate::utils::validation::{validate_json_path, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const JSON_PATH_VAR: &str = "MENU_JSON_PATH";
pub const BASE_URL_VAR: &str = "MENU_BASE_URL";

pub const DEFAULT_JSON_PATH: &str = "2025_q4_menu.json";
pub const DEFAULT_BASE_URL: &str = "https://joaoqalves.github.io/menu-stnico";

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

fn default_json_path() -> String {
    DEFAULT_JSON_PATH.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// 每日訊息需要的設定；明確傳入，不在程式中途讀環境變數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_json_path")]
    pub json_path: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub telegram: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            json_path: default_json_path(),
            base_url: default_base_url(),
            telegram: false,
        }
    }
}

impl Settings {
    /// 從 MENU_JSON_PATH / MENU_BASE_URL 建立
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            json_path: lookup(JSON_PATH_VAR)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.json_path),
            base_url: lookup(BASE_URL_VAR)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.base_url),
            telegram: defaults.telegram,
        }
    }

    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MenuError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |key| std::env::var(key).ok())
    }

    /// 解析前先替換 ${VAR}；找不到的變數保持原樣
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed = ENV_PLACEHOLDER.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        toml::from_str(&processed).map_err(|e| MenuError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_json_path("json_path", &self.json_path)?;
        validate_url("base_url", &self.base_url)?;
        Ok(())
    }
}
