//! 会话存储
//!
//! 当前身份的唯一持有者。状态机：
//! `Unauthenticated` / `Restoring` / `Authenticated(Identity)`，
//! 只会被 `login` / `logout` / `restore` 改变。
//!
//! 状态本身放在注入的 `SessionCell` 中：浏览器里是一个 `RwSignal`，
//! 这样视图能对变化做出反应；测试里是普通的内存单元。

use rolegate_shared::Identity;

use crate::api::{ApiClient, ApiError, ApiResult, TokenStore};
use crate::web::http::HttpClient;
use crate::web::route::Access;

/// 会话状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    /// 持有令牌，正在向后端确认身份
    Restoring,
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// 路由守卫看到的访问级别
    pub fn access(&self) -> Access {
        match self {
            SessionState::Unauthenticated => Access::Anonymous,
            SessionState::Restoring => Access::Pending,
            SessionState::Authenticated(identity) => Access::Granted(identity.role),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Restoring => "restoring",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

/// 会话状态的存放位置
pub trait SessionCell {
    fn snapshot(&self) -> SessionState;
    fn replace(&self, state: SessionState);
}

#[derive(Debug, Clone)]
pub struct SessionStore<C, S, V> {
    api: ApiClient<C, S>,
    cell: V,
}

impl<C: HttpClient, S: TokenStore, V: SessionCell> SessionStore<C, S, V> {
    /// 创建会话存储并写入初始状态：有令牌则为 `Restoring`，否则 `Unauthenticated`
    pub fn new(api: ApiClient<C, S>, cell: V) -> Self {
        let initial = if api.tokens().load().is_some() {
            SessionState::Restoring
        } else {
            SessionState::Unauthenticated
        };
        cell.replace(initial);
        Self { api, cell }
    }

    pub fn api(&self) -> &ApiClient<C, S> {
        &self.api
    }

    pub fn cell(&self) -> &V {
        &self.cell
    }

    pub fn state(&self) -> SessionState {
        self.cell.snapshot()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state().identity().cloned()
    }

    /// 登录
    ///
    /// 令牌只有在身份也获取成功后才会持久化；任何一步失败都不改变原有状态，
    /// 错误交给调用方展示。
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Identity> {
        let token = self.api.obtain_token(username, password).await?;

        let identity = self
            .api
            .identity_with_token(&token)
            .await
            .map_err(|e| match e {
                // 刚签发的令牌立即被拒绝，对用户而言仍是登录失败
                ApiError::SessionExpired => ApiError::Authentication,
                other => other,
            })?;

        self.api.tokens().save(&token);
        self.transition(SessionState::Authenticated(identity.clone()));
        Ok(identity)
    }

    /// 注销：同步清除持久化令牌和内存中的身份，不发请求
    pub fn logout(&self) {
        self.api.tokens().clear();
        self.transition(SessionState::Unauthenticated);
    }

    /// 启动时恢复会话
    ///
    /// 只在 `Restoring` 状态下生效；请求返回时若状态已被 login / logout 改变，
    /// 结果被丢弃。
    pub async fn restore(&self) {
        if self.state() != SessionState::Restoring {
            return;
        }
        if self.api.tokens().load().is_none() {
            self.transition(SessionState::Unauthenticated);
            return;
        }

        let result = self.api.current_identity().await;

        if self.state() != SessionState::Restoring {
            log_info!("[Session] restore result discarded, state already settled");
            return;
        }

        match result {
            Ok(identity) => self.transition(SessionState::Authenticated(identity)),
            Err(e) => {
                log_warn!("[Session] restore failed: {}", e);
                self.logout();
            }
        }
    }

    /// 令牌被拒绝的错误视为隐式注销，返回是否已注销
    pub fn absorb(&self, err: &ApiError) -> bool {
        if err.is_session_expired() && self.state().is_authenticated() {
            self.logout();
            true
        } else {
            false
        }
    }

    fn transition(&self, next: SessionState) {
        let prev = self.cell.snapshot();
        log_info!("[Session] {} -> {}", prev.label(), next.label());
        self.cell.replace(next);
    }
}
