//! 创建用户表单的状态
//!
//! 将零散的 signal 整合为 `FormState`，负责数据的持有、重置，
//! 以及到请求对象的转换。

use leptos::prelude::*;
use rolegate_shared::{CreateUserRequest, Role};

/// 新用户默认的角色
pub const DEFAULT_ROLE: Role = Role::User;

/// 创建表单中可以选择的角色
pub const CREATABLE_ROLES: [Role; 2] = [Role::User, Role::Manager];

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub username: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub role: RwSignal<Role>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            username: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            role: RwSignal::new(DEFAULT_ROLE),
        }
    }

    pub fn reset(&self) {
        self.username.set(String::new());
        self.email.set(String::new());
        self.password.set(String::new());
        self.role.set(DEFAULT_ROLE);
    }

    /// 将表单状态转换为 API 请求对象（不做校验）
    pub fn to_request(&self) -> CreateUserRequest {
        CreateUserRequest {
            username: self.username.get_untracked().trim().to_string(),
            email: self.email.get_untracked().trim().to_string(),
            password: self.password.get_untracked(),
            role: self.role.get_untracked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_request_trims_identity_fields() {
        let form = FormState::new();
        form.username.set("  carol ".to_string());
        form.email.set("carol@example.com ".to_string());
        form.password.set(" secret ".to_string());

        let req = form.to_request();
        assert_eq!(req.username, "carol");
        assert_eq!(req.email, "carol@example.com");
        // 密码原样保留
        assert_eq!(req.password, " secret ");
        assert_eq!(req.role, Role::User);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let form = FormState::new();
        form.username.set("dave".to_string());
        form.role.set(Role::Manager);

        form.reset();

        let req = form.to_request();
        assert!(req.username.is_empty());
        assert_eq!(req.role, DEFAULT_ROLE);
    }

    #[test]
    fn test_default_form_is_blank() {
        let req = FormState::default().to_request();
        assert!(req.username.is_empty() && req.email.is_empty() && req.password.is_empty());
        assert_eq!(req.role, Role::User);
    }
}
