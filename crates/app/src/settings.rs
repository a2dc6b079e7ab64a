use config::{Config, ConfigError, Environment, File};
use pulse_core::config::AppConfig;
use std::path::{Path, PathBuf};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "PULSE_CONFIG";
/// 未指定时使用的配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/pulse.toml";

/// 配置文件路径：优先取 `PULSE_CONFIG`，否则使用默认路径
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 读取配置文件（不存在时跳过）。
/// 2. 叠加 `PULSE__SECTION__KEY` 形式的环境变量。
/// 3. 反序列化为 `AppConfig`，缺失字段由 serde 默认值补齐。
///
/// # Arguments
/// * `path`: 配置文件路径，格式由扩展名推断。
///
/// # Returns
/// 成功返回配置，文件格式错误或类型不匹配时返回 `ConfigError`。
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    load_with_env(path, environment())
}

/// `PULSE__SERVER__PORT=8080` 形式的环境变量源
fn environment() -> Environment {
    Environment::with_prefix("PULSE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load_with_env(path: &Path, env: Environment) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(env)
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.boards.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[collector]
concurrency = 4

[[boards]]
name = "it"
title = "Nifty IT"
symbols = ["TCS.NS", "INFY.NS", "WIPRO.NS"]
"#
        )
        .unwrap();

        let config = load(file.path()).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.collector.concurrency, 4);
        assert_eq!(config.collector.sessions, 5);
        assert_eq!(config.boards.len(), 1);
        assert_eq!(config.boards[0].name, "it");
        assert_eq!(config.boards[0].symbols.len(), 3);
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/pulse.toml");
        let config = load(&path).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.boards[0].name, "banknifty");
        assert_eq!(config.boards[1].symbols.len(), 50);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 8088\n\n[feed]\ntimeout_secs = 5").unwrap();

        let vars = config::Map::from([
            ("PULSE__SERVER__PORT".to_string(), "9100".to_string()),
            ("PULSE__COLLECTOR__CONCURRENCY".to_string(), "3".to_string()),
        ]);
        let config = load_with_env(file.path(), environment().source(Some(vars))).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.collector.concurrency, 3);
        assert_eq!(config.feed.timeout_secs, 5);
        assert_eq!(config.boards.len(), 2);
    }
}
