//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、路由守卫以及角色路由。

use std::fmt::Display;

use rolegate_shared::Role;

/// 重定向链的最大长度，超过即视为配置错误
const MAX_REDIRECTS: usize = 4;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由，公开)
    #[default]
    Login,
    /// 登录后的分发页，按角色跳转到对应面板
    RoleRedirect,
    AdminDashboard,
    ManagerDashboard,
    UserDashboard,
    /// 页面未找到
    NotFound,
}

/// 守卫看到的会话访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Anonymous,
    /// 会话恢复中，尚无定论
    Pending,
    Granted(Role),
}

/// 单步守卫判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Admit,
    Redirect(AppRoute),
    /// 等待会话确定后重新判定
    Hold,
}

/// 重定向链解析后的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Show(AppRoute),
    Hold(AppRoute),
}

impl Resolution {
    pub fn route(&self) -> AppRoute {
        match self {
            Resolution::Show(route) | Resolution::Hold(route) => *route,
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self, Resolution::Hold(_))
    }
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Self::Login,
            "/redirect" => Self::RoleRedirect,
            "/admin" => Self::AdminDashboard,
            "/manager" => Self::ManagerDashboard,
            "/user" => Self::UserDashboard,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::RoleRedirect => "/redirect",
            Self::AdminDashboard => "/admin",
            Self::ManagerDashboard => "/manager",
            Self::UserDashboard => "/user",
            Self::NotFound => "/404",
        }
    }

    /// 定义该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::RoleRedirect | Self::AdminDashboard | Self::ManagerDashboard | Self::UserDashboard
        )
    }

    /// **角色路由**：角色到主页的全函数，未知角色落到用户面板
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Manager => Self::ManagerDashboard,
            _ => Self::UserDashboard,
        }
    }

    /// **核心守卫逻辑**：对单个路由做一次判定
    ///
    /// 面板只对角色路由会把该角色送来的调用者放行，
    /// 因此角色不匹配时面板根本不会被构建。
    pub fn guard(&self, access: Access) -> Guard {
        if !self.requires_auth() {
            return match (self, access) {
                (Self::NotFound, _) | (Self::Login, Access::Anonymous) => Guard::Admit,
                (_, Access::Pending) => Guard::Hold,
                // 已登录用户访问登录页
                _ => Guard::Redirect(Self::RoleRedirect),
            };
        }

        match access {
            Access::Anonymous => Guard::Redirect(Self::Login),
            Access::Pending => Guard::Hold,
            Access::Granted(role) if *self == Self::RoleRedirect => {
                Guard::Redirect(Self::home_for(role))
            }
            Access::Granted(role) if Self::home_for(role) == *self => Guard::Admit,
            Access::Granted(_) => Guard::Redirect(Self::RoleRedirect),
        }
    }

    /// 沿重定向链解析到不动点
    pub fn resolve(self, access: Access) -> Resolution {
        let mut route = self;
        for _ in 0..=MAX_REDIRECTS {
            match route.guard(access) {
                Guard::Admit => return Resolution::Show(route),
                Guard::Hold => return Resolution::Hold(route),
                Guard::Redirect(next) => route = next,
            }
        }
        Resolution::Show(Self::NotFound)
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
