//! Rolegate 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话状态机（平台无关，依赖注入）
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话与浏览器实现的装配
//! - `directory`: 面板共用的用户目录数据流
//! - `components`: UI 组件层

#[macro_use]
mod logging;

mod api;
mod auth;
mod config;
mod directory;
mod session;
mod components {
    pub mod admin_dashboard;
    mod create_user_form;
    mod icons;
    mod layout;
    pub mod login;
    pub mod manager_dashboard;
    mod role_style;
    mod toast;
    pub mod user_dashboard;
}

#[cfg(test)]
mod test_support;

use crate::auth::{WebSession, init_session};
use crate::components::admin_dashboard::AdminDashboard;
use crate::components::login::LoginPage;
use crate::components::manager_dashboard::ManagerDashboard;
use crate::components::user_dashboard::UserDashboard;
use crate::config::AppConfig;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod dialog;
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 守卫已经保证面板路由只会在角色匹配时到达这里；
/// 身份缺失（会话恰好在渲染前失效）时不渲染任何内容，等待重定向。
fn route_view(route: AppRoute, session: WebSession) -> AnyView {
    let identity = session.identity();

    match (route, identity) {
        (AppRoute::Login, _) => view! { <LoginPage session=session /> }.into_any(),
        (AppRoute::AdminDashboard, Some(identity)) => {
            view! { <AdminDashboard session=session identity=identity /> }.into_any()
        }
        (AppRoute::ManagerDashboard, Some(identity)) => {
            view! { <ManagerDashboard session=session identity=identity /> }.into_any()
        }
        (AppRoute::UserDashboard, Some(identity)) => {
            view! { <UserDashboard session=session identity=identity /> }.into_any()
        }
        (AppRoute::NotFound, _) => view! { <NotFoundPage /> }.into_any(),
        // `RoleRedirect` 总会被守卫改写，不会停留
        _ => ().into_any(),
    }
}

#[component]
fn NotFoundPage() -> impl IntoView {
    let router = use_router();

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <button class="btn btn-link mt-2" on:click=move |_| router.navigate("/")>
                    "Back to sign in"
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取构建时配置并创建会话（有令牌时后台恢复）
    let config = AppConfig::from_build_env();
    let session = init_session(&config);
    log_info!("[App] API base: {}", session.api().base_url());

    // 2. 获取访问级别信号，用于注入路由服务（解耦！）
    let access = session.access_signal();

    view! {
        // 3. 路由器组件：注入访问级别信号实现守卫
        <Router access=access>
            <RouterOutlet matcher=move |route| route_view(route, session.clone()) />
        </Router>
    }
}
