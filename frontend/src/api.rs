//! REST 客户端
//!
//! 固定基础 URL，已认证请求从 `TokenStore` 读取令牌并以 Bearer 方式附带。

use std::fmt;

use rolegate_shared::protocol::{ApiRequest, CurrentIdentityRequest, ListUsersRequest};
use rolegate_shared::{
    BEARER_PREFIX, CreateUserRequest, Credentials, DeleteUserRequest, HEADER_AUTHORIZATION,
    Identity, Role, TokenResponse, UpdateRoleRequest, UserId, UserRecord,
};

use crate::web::http::{HttpClient, HttpError, HttpRequest, HttpResponse};

// =========================================================
// 错误类型
// =========================================================

/// API 调用失败的分类
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 凭据错误（仅出现在 `token/`）
    Authentication,
    /// 令牌被拒绝，视为隐式注销
    SessionExpired,
    /// 403：服务端策略拒绝
    Forbidden,
    /// 客户端存在性校验未通过，请求未发出
    Validation(String),
    /// 其他非 2xx 响应
    Server { status: u16, message: String },
    /// 请求未能完成
    Network(String),
    /// 请求体序列化失败
    Encode(String),
    /// 响应体解析失败
    Decode(String),
}

impl ApiError {
    /// 是否应当让会话失效
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Authentication => write!(f, "Invalid username or password"),
            ApiError::SessionExpired => write!(f, "Your session has expired, please sign in again"),
            ApiError::Forbidden => write!(f, "You are not allowed to perform this action"),
            ApiError::Validation(msg) => write!(f, "{}", msg),
            ApiError::Server { status, message } if message.is_empty() => {
                write!(f, "Server error ({})", status)
            }
            ApiError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ApiError::Network(msg) => write!(f, "Unable to reach the server: {}", msg),
            ApiError::Encode(msg) => write!(f, "Could not encode request: {}", msg),
            ApiError::Decode(msg) => write!(f, "Unexpected server response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RequestBuildFailed(msg) => ApiError::Encode(msg),
            HttpError::NetworkError(msg) => ApiError::Network(msg),
            HttpError::ResponseParseFailed(msg) => ApiError::Decode(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 服务端错误消息最多保留的字符数
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

// =========================================================
// 令牌存储抽象
// =========================================================

/// 持久化会话令牌的存储（浏览器中是 LocalStorage）
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// 本次请求使用哪个令牌
#[derive(Debug, Clone, Copy)]
enum Bearer<'a> {
    Stored,
    Explicit(&'a str),
}

// =========================================================
// 客户端
// =========================================================

#[derive(Debug, Clone)]
pub struct ApiClient<C, S> {
    base_url: String,
    http: C,
    tokens: S,
}

impl<C: HttpClient, S: TokenStore> ApiClient<C, S> {
    pub fn new(base_url: impl Into<String>, http: C, tokens: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 用凭据换取访问令牌（不附带 Bearer，不写入存储）
    pub async fn obtain_token(&self, username: &str, password: &str) -> ApiResult<String> {
        let creds = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: TokenResponse = self.call(&creds, Bearer::Stored).await?;
        Ok(resp.access)
    }

    /// 使用存储中的令牌获取当前身份
    pub async fn current_identity(&self) -> ApiResult<Identity> {
        self.call(&CurrentIdentityRequest, Bearer::Stored).await
    }

    /// 使用指定令牌获取当前身份（登录时令牌尚未持久化）
    pub async fn identity_with_token(&self, token: &str) -> ApiResult<Identity> {
        self.call(&CurrentIdentityRequest, Bearer::Explicit(token))
            .await
    }

    pub async fn list_users(&self) -> ApiResult<Vec<UserRecord>> {
        self.call(&ListUsersRequest, Bearer::Stored).await
    }

    pub async fn create_user(&self, req: &CreateUserRequest) -> ApiResult<UserRecord> {
        self.call(req, Bearer::Stored).await
    }

    pub async fn update_role(&self, id: UserId, role: Role) -> ApiResult<UserRecord> {
        self.call(&UpdateRoleRequest { id, role }, Bearer::Stored)
            .await
    }

    pub async fn delete_user(&self, id: UserId) -> ApiResult<()> {
        self.call(&DeleteUserRequest { id }, Bearer::Stored).await
    }

    async fn call<R: ApiRequest>(&self, req: &R, bearer: Bearer<'_>) -> ApiResult<R::Response> {
        let mut http_req = HttpRequest::new(self.url(&req.path()), R::METHOD)
            .with_header("Accept", "application/json");

        if R::METHOD.has_body() {
            let body = serde_json_wasm::to_string(req).map_err(|e| ApiError::Encode(e.to_string()))?;
            http_req = http_req
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        if R::AUTHENTICATED {
            let token = match bearer {
                Bearer::Explicit(token) => Some(token.to_string()),
                Bearer::Stored => self.tokens.load(),
            };
            if let Some(token) = token {
                http_req = http_req.with_header(
                    HEADER_AUTHORIZATION,
                    &format!("{}{}", BEARER_PREFIX, token),
                );
            }
        }

        let resp = self.http.send(http_req).await?;
        decode_response::<R>(resp)
    }
}

fn decode_response<R: ApiRequest>(resp: HttpResponse) -> ApiResult<R::Response> {
    if !resp.ok() {
        return Err(classify_failure::<R>(&resp));
    }

    // 204 / 空响应体按 JSON null 解析，使 `()` 响应成立
    let body = if resp.body.trim().is_empty() {
        "null"
    } else {
        resp.body.as_str()
    };

    serde_json_wasm::from_str::<R::Response>(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn classify_failure<R: ApiRequest>(resp: &HttpResponse) -> ApiError {
    match resp.status {
        400 | 401 if !R::AUTHENTICATED => ApiError::Authentication,
        401 => ApiError::SessionExpired,
        403 => ApiError::Forbidden,
        status => ApiError::Server {
            status,
            message: resp.body.trim().chars().take(MAX_ERROR_MESSAGE_CHARS).collect(),
        },
    }
}

#[cfg(test)]
mod tests;
