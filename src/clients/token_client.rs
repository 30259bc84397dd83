/// 令牌服务客户端
///
/// 获取阅读器需要的 `{token, subdomain}`
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 令牌接口路径
pub const TOKEN_ENDPOINT_PATH: &str = "/GetTokenAndSubdomain";

/// 令牌与子域名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAndSubdomain {
    pub token: String,
    pub subdomain: String,
}

/// 令牌服务客户端
pub struct TokenClient {
    http: reqwest::Client,
    endpoint: String,
}

impl TokenClient {
    /// 创建新的令牌客户端
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::api_request_failed(base_url, e))?;
        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_ENDPOINT_PATH),
        })
    }

    /// 从配置创建；未配置令牌服务时返回 None
    pub fn from_config(config: &Config) -> AppResult<Option<Self>> {
        config
            .token_base_url
            .as_deref()
            .map(|url| Self::new(url, Duration::from_secs(config.request_timeout_secs)))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 请求令牌（单次请求，不重试）
    ///
    /// # 返回
    /// - 传输错误或非 2xx 状态码：`ApiError::RequestFailed`
    /// - 响应中带有 `error` 字段：`ApiError::ServerError`
    pub async fn fetch_token_and_subdomain(&self) -> AppResult<TokenAndSubdomain> {
        debug!("正在请求令牌: {}", self.endpoint);

        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::api_request_failed(self.endpoint.clone(), e))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(self.endpoint.clone(), e))?;

        if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
            return Err(AppError::server_error(self.endpoint.clone(), error.clone()));
        }

        Ok(serde_json::from_value(body)?)
    }
}

/// `null`、`false`、`0`、空字符串视为没有错误
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
