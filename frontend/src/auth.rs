//! 浏览器端会话装配
//!
//! 把平台无关的 `SessionStore` 绑定到浏览器实现：
//! fetch 客户端、LocalStorage 令牌存储、以及驱动界面的 `RwSignal`。
//! 路由服务只拿到派生出的访问级别信号，与会话存储解耦。

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::directory::UserDirectory;
use crate::session::{SessionCell, SessionState, SessionStore};
use crate::web::http::FetchClient;
use crate::web::route::Access;
use crate::web::storage::LocalTokenStore;

/// 浏览器中使用的会话存储
pub type WebSession = SessionStore<FetchClient, LocalTokenStore, RwSignal<SessionState>>;

/// 浏览器中使用的用户目录
pub type WebDirectory = UserDirectory<FetchClient, LocalTokenStore>;

impl SessionCell for RwSignal<SessionState> {
    fn snapshot(&self) -> SessionState {
        self.get_untracked()
    }

    fn replace(&self, state: SessionState) {
        self.set(state);
    }
}

impl WebSession {
    /// 路由守卫使用的访问级别信号
    pub fn access_signal(&self) -> Signal<Access> {
        let cell = *self.cell();
        Signal::derive(move || cell.with(SessionState::access))
    }

    /// 与会话共用同一客户端的用户目录
    pub fn directory(&self) -> WebDirectory {
        UserDirectory::new(self.api().clone())
    }
}

/// 创建会话并在后台确认上次留下的令牌
pub fn init_session(config: &AppConfig) -> WebSession {
    let api = ApiClient::new(
        config.api_base_url.clone(),
        FetchClient,
        LocalTokenStore::new(config.token_storage_key.clone()),
    );
    let session = SessionStore::new(api, RwSignal::new(SessionState::default()));

    if session.state() == SessionState::Restoring {
        log_info!("[Auth] stored token found, restoring session");
        let restoring = session.clone();
        spawn_local(async move {
            restoring.restore().await;
        });
    }

    session
}
