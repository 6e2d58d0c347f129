use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};
use crate::models::WheelType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub operator: OperatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 持久化协作方（内存实现）的初始数据来源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON 种子文件，优先于内置样例数据
    #[serde(default)]
    pub seed_path: Option<String>,
    #[serde(default = "default_true")]
    pub load_fixtures: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            load_fixtures: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub beginner_max_rewards: usize,
    pub intermediate_max_rewards: usize,
    pub advanced_max_rewards: usize,
    /// 升级道具奖励行的默认权重
    pub upgrade_reward_weight: u32,
    pub upgrade_reward_name: String,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            beginner_max_rewards: 15,
            intermediate_max_rewards: 12,
            advanced_max_rewards: 10,
            upgrade_reward_weight: 50,
            upgrade_reward_name: "升级券".to_string(),
        }
    }
}

impl WheelConfig {
    pub fn max_rewards(&self, wheel_type: WheelType) -> usize {
        match wheel_type {
            WheelType::Beginner => self.beginner_max_rewards,
            WheelType::Intermediate => self.intermediate_max_rewards,
            WheelType::Advanced => self.advanced_max_rewards,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 为空时允许任意来源
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// 请求未携带 X-Operator 时记录的操作人
    pub default_name: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            default_name: "admin".to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)?,
            // 无配置文件：使用环境变量与默认值构建
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "无法读取配置文件 {config_path}: {e}"
                )));
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_overrides(|name| env::var(name).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::ConfigError(format!("解析配置文件失败: {e}")))
    }

    /// 按变量名查找覆盖值；拆出来以便测试时不改动进程环境
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Some(v) = lookup("STORE_SEED_PATH") {
            self.store.seed_path = Some(v).filter(|p| !p.trim().is_empty());
        }
        if let Some(v) = lookup("STORE_LOAD_FIXTURES")
            && let Ok(b) = v.parse()
        {
            self.store.load_fixtures = b;
        }
        if let Some(v) = lookup("WHEEL_UPGRADE_REWARD_WEIGHT")
            && let Ok(w) = v.parse()
        {
            self.wheel.upgrade_reward_weight = w;
        }
        if let Some(v) = lookup("CORS_ALLOWED_ORIGINS") {
            self.cors.allowed_origins = v
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(v) = lookup("DEFAULT_OPERATOR") {
            self.operator.default_name = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [wheel]
            beginner_max_rewards = 8
            intermediate_max_rewards = 6
            advanced_max_rewards = 4
            upgrade_reward_weight = 20
            upgrade_reward_name = "进阶券"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.wheel.max_rewards(WheelType::Advanced), 4);
        assert!(config.store.load_fixtures);
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.operator.default_name, "admin");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "7000"),
            ("STORE_LOAD_FIXTURES", "false"),
            ("WHEEL_UPGRADE_REWARD_WEIGHT", "not-a-number"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("DEFAULT_OPERATOR", "ops_02"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.store.load_fixtures);
        // 无法解析的值保持原样
        assert_eq!(config.wheel.upgrade_reward_weight, 50);
        assert_eq!(config.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.operator.default_name, "ops_02");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = Config::from_toml_str("[server]\nport = \"not a number\"");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
        assert!(Config::from_toml_str("").is_ok());
    }
}
