//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 每次导航、浏览器前进后退以及会话变化都会重新执行守卫，判定结果从不缓存。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{Access, AppRoute, Resolution};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态：push 用于正常导航，replace 用于重定向
fn write_history_state(path: &str, use_push: bool) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = if use_push {
                history.push_state_with_url(&JsValue::NULL, "", Some(path))
            } else {
                history.replace_state_with_url(&JsValue::NULL, "", Some(path))
            };
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入访问级别信号实现与会话存储的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由
    current_route: RwSignal<AppRoute>,
    /// 当前路由是否在等待会话确定
    held: RwSignal<bool>,
    /// 访问级别（注入的信号）
    access: Signal<Access>,
}

impl RouterService {
    fn new(access: Signal<Access>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let resolution = requested.resolve(access.get_untracked());
        if resolution.route() != requested {
            write_history_state(resolution.route().to_path(), false);
        }

        Self {
            current_route: RwSignal::new(resolution.route()),
            held: RwSignal::new(resolution.is_held()),
            access,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route.read_only()
    }

    pub fn is_held(&self) -> ReadSignal<bool> {
        self.held.read_only()
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let access = self.access.get_untracked();
        let resolution = target.resolve(access);
        self.apply(target, resolution, use_push);
    }

    fn apply(&self, target: AppRoute, resolution: Resolution, use_push: bool) {
        let route = resolution.route();
        if route != target {
            log_info!("[Router] {} -> {} ({:?})", target, route, self.access.get_untracked());
        }

        write_history_state(route.to_path(), use_push);
        self.held.set(resolution.is_held());
        self.current_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑，重定向不应再产生新的历史记录
            router.navigate_to_route(target, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时重新判定当前路由
    fn setup_access_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let access = router.access.get();
            let current = router.current_route.get_untracked();
            let resolution = current.resolve(access);

            let unchanged = resolution.route() == current
                && resolution.is_held() == router.held.get_untracked();
            if !unchanged {
                router.apply(current, resolution, true);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(access: Signal<Access>) -> RouterService {
    let router = RouterService::new(access);

    router.init_popstate_listener();
    router.setup_access_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话访问级别信号
    access: Signal<Access>,
    children: Children,
) -> impl IntoView {
    provide_router(access);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件；等待会话时渲染加载指示。
#[component]
pub fn RouterOutlet<F>(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: F,
) -> impl IntoView
where
    F: Fn(AppRoute) -> AnyView + Send + Sync + 'static,
{
    let router = use_router();

    move || {
        if router.is_held().get() {
            return view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any();
        }
        matcher(router.current_route().get())
    }
}
