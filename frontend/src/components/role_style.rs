//! 角色的展示映射：徽章颜色、图标、侧边栏菜单、顶栏标题
//!
//! 所有映射都是全函数，`Unknown` 落到中性的默认分支。

use leptos::prelude::*;
use rolegate_shared::Role;

use crate::components::icons::{Briefcase, ShieldCheck, UserIcon};

/// 角色对应的图标种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleIcon {
    Shield,
    Briefcase,
    Person,
}

pub fn badge_class(role: Role) -> &'static str {
    match role {
        Role::Admin => "badge badge-error",
        Role::Manager => "badge badge-info",
        Role::User | Role::Unknown => "badge badge-ghost",
    }
}

pub fn icon_for(role: Role) -> RoleIcon {
    match role {
        Role::Admin => RoleIcon::Shield,
        Role::Manager => RoleIcon::Briefcase,
        Role::User | Role::Unknown => RoleIcon::Person,
    }
}

/// 侧边栏中角色专属的菜单项
pub fn menu_label(role: Role) -> Option<&'static str> {
    match role {
        Role::Admin => Some("User Management"),
        Role::Manager => Some("Manager Panel"),
        Role::User => Some("My Access"),
        Role::Unknown => None,
    }
}

/// 顶栏标题，如 `ADMIN DASHBOARD`
pub fn dashboard_title(role: Role) -> String {
    format!("{} DASHBOARD", role.as_str().to_uppercase())
}

/// `<select>` 的选项列表，附带每一项是否选中
///
/// 当前角色不在可选范围内时（如 `Unknown`）放在最前面，
/// 由调用方渲染为禁用项，下拉框仍如实显示当前角色。
pub fn role_options(choices: &[Role], current: Role) -> Vec<(Role, bool)> {
    let mut options: Vec<(Role, bool)> = choices
        .iter()
        .map(|&role| (role, role == current))
        .collect();
    if !choices.contains(&current) {
        options.insert(0, (current, true));
    }
    options
}

/// 角色徽章
#[component]
pub fn RoleBadge(role: Role) -> impl IntoView {
    view! {
        <span class=format!("{} gap-1", badge_class(role))>
            <RoleGlyph role=role attr:class="h-3 w-3" />
            {role.label()}
        </span>
    }
}

#[component]
pub fn RoleGlyph(role: Role) -> impl IntoView {
    match icon_for(role) {
        RoleIcon::Shield => view! { <ShieldCheck /> }.into_any(),
        RoleIcon::Briefcase => view! { <Briefcase /> }.into_any(),
        RoleIcon::Person => view! { <UserIcon /> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_a_style() {
        assert_eq!(badge_class(Role::Admin), "badge badge-error");
        assert_eq!(badge_class(Role::Manager), "badge badge-info");
        assert_eq!(badge_class(Role::Unknown), badge_class(Role::User));

        assert_eq!(icon_for(Role::Admin), RoleIcon::Shield);
        assert_eq!(icon_for(Role::Manager), RoleIcon::Briefcase);
        assert_eq!(icon_for(Role::Unknown), RoleIcon::Person);
    }

    #[test]
    fn test_role_options_select_the_current_role() {
        let options = role_options(&Role::ASSIGNABLE, Role::User);
        assert_eq!(
            options,
            vec![
                (Role::Admin, false),
                (Role::Manager, false),
                (Role::User, true),
            ]
        );

        let selected: Vec<Role> = role_options(&Role::ASSIGNABLE, Role::Manager)
            .into_iter()
            .filter(|(_, selected)| *selected)
            .map(|(role, _)| role)
            .collect();
        assert_eq!(selected, vec![Role::Manager]);
    }

    #[test]
    fn test_role_options_keep_unlisted_current_role() {
        let options = role_options(&Role::ASSIGNABLE, Role::Unknown);
        assert_eq!(options.len(), 4);
        assert_eq!(options[0], (Role::Unknown, true));
        assert!(options[1..].iter().all(|(_, selected)| !selected));

        // 创建表单只提供 user / manager
        let options = role_options(&[Role::User, Role::Manager], Role::Admin);
        assert_eq!(options[0], (Role::Admin, true));
    }

    #[test]
    fn test_menu_labels() {
        assert_eq!(menu_label(Role::Admin), Some("User Management"));
        assert_eq!(menu_label(Role::Manager), Some("Manager Panel"));
        assert_eq!(menu_label(Role::User), Some("My Access"));
        assert_eq!(menu_label(Role::Unknown), None);
    }

    #[test]
    fn test_dashboard_title() {
        assert_eq!(dashboard_title(Role::Manager), "MANAGER DASHBOARD");
        assert_eq!(dashboard_title(Role::User), "USER DASHBOARD");
    }
}
