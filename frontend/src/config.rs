//! 运行时配置
//!
//! 前端没有环境变量可读，配置在构建时通过 `option_env!` 注入，
//! 未注入时回退到下面的默认值。

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/";
const DEFAULT_TOKEN_KEY: &str = "token";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 所有 API 请求共用的基础 URL（已去掉末尾的 `/`）
    pub api_base_url: String,
    /// 会话令牌在 LocalStorage 中的键名
    pub token_storage_key: String,
}

impl AppConfig {
    /// 读取构建时注入的 `ROLEGATE_API_BASE_URL` / `ROLEGATE_TOKEN_KEY`
    pub fn from_build_env() -> Self {
        Self::new(
            option_env!("ROLEGATE_API_BASE_URL"),
            option_env!("ROLEGATE_TOKEN_KEY"),
        )
    }

    fn new(base_url: Option<&str>, token_key: Option<&str>) -> Self {
        let api_base_url = base_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);
        let token_storage_key = token_key
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_TOKEN_KEY);

        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token_storage_key: token_storage_key.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}
