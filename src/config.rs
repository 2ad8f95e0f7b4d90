use crate::error::{ContactExtractError, Result};
use contact_extract_common::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_BASE_URL: &str = "CONTACT_EXTRACT_BASE_URL";
pub const ENV_RESOURCE_ID: &str = "CONTACT_EXTRACT_RESOURCE_ID";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub client: ClientConfig,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書きする（実行時用。保存しない）
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env();
        Ok(config)
    }

    /// 設定ファイルだけを読む。環境変数は反映しない
    pub fn load_file() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込む（無ければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ContactExtractError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("contact-extract").join("config.json"))
    }

    /// 環境変数を優先
    fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_RESOURCE_ID).ok(),
        );
    }

    /// 設定されている上書き用の環境変数（名前, 値）
    pub fn active_env_overrides() -> Vec<(&'static str, String)> {
        [ENV_BASE_URL, ENV_RESOURCE_ID]
            .into_iter()
            .filter_map(|name| {
                std::env::var(name)
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (name, v))
            })
            .collect()
    }

    pub fn apply_overrides(&mut self, base_url: Option<String>, resource_id: Option<String>) {
        if let Some(url) = base_url.filter(|v| !v.trim().is_empty()) {
            self.client.base_url = url;
        }
        if let Some(id) = resource_id.filter(|v| !v.trim().is_empty()) {
            self.client.resource_id = id;
        }
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        self.update_file(|config| config.client.base_url = url)
    }

    pub fn set_resource_id(&mut self, resource_id: String) -> Result<()> {
        self.update_file(|config| config.client.resource_id = resource_id)
    }

    /// ファイルの内容に変更を加えて保存し、自身もファイルの内容に揃える
    ///
    /// 環境変数の上書きはファイルに書き込まない。
    fn update_file(&mut self, change: impl FnOnce(&mut Config)) -> Result<()> {
        let path = Self::config_path()?;
        let mut stored = Self::load_from(&path)?;
        change(&mut stored);
        stored.client.validate()?;
        stored.save_to(&path)?;
        *self = stored;
        Ok(())
    }
}
