use crate::error::{AppError, AppResult};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 令牌服务地址（为空时不获取令牌）
    pub token_base_url: Option<String>,
    /// TOML 文件存放目录
    pub input_folder: String,
    /// JSON 输出目录
    pub output_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_base_url: None,
            input_folder: "input_toml".to_string(),
            output_folder: "output_json".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            token_base_url: std::env::var("TOKEN_BASE_URL").ok().filter(|v| !v.trim().is_empty()),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
        }
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> AppResult<()> {
        if let Some(url) = &self.token_base_url {
            if let Err(e) = reqwest::Url::parse(url) {
                return Err(AppError::invalid_config("TOKEN_BASE_URL", url, e.to_string()));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::invalid_config(
                "REQUEST_TIMEOUT_SECS",
                "0",
                "超时时间必须大于 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input_folder, "input_toml");
        assert!(config.token_base_url.is_none());
    }

    #[test]
    fn test_invalid_token_url() {
        let config = Config {
            token_base_url: Some("not a url".to_string()),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_zero_timeout() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
    }
}
