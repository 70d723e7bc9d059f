use leptos::prelude::*;
use rolegate_shared::{Identity, Role};

use crate::auth::WebSession;
use crate::components::icons::LogOut;
use crate::components::role_style::{RoleGlyph, dashboard_title, menu_label};

pub const APP_TITLE: &str = "Codeedex";

/// 三个面板共用的外框：侧边栏 + 顶栏 + 内容区
#[component]
pub fn DashboardLayout(session: WebSession, identity: Identity, children: Children) -> impl IntoView {
    let role = identity.role;

    view! {
        <div class="flex min-h-screen font-sans">
            <Sidebar role=role />
            <div class="flex-1 bg-base-200 min-h-screen">
                <Topbar session=session identity=identity />
                <main class="p-4 md:p-8 max-w-7xl space-y-6">{children()}</main>
            </div>
        </div>
    }
}

#[component]
fn Sidebar(role: Role) -> impl IntoView {
    view! {
        <aside class="w-64 bg-neutral text-neutral-content min-h-screen p-6 hidden md:block">
            <h2 class="text-xl font-bold mb-8">{APP_TITLE}</h2>
            <ul class="menu p-0 gap-1 text-sm">
                <li class="menu-title text-neutral-content/50 uppercase tracking-wide">"Menu"</li>
                <li><a>"Dashboard"</a></li>
                {menu_label(role).map(|label| view! {
                    <li>
                        <a class="active">
                            <RoleGlyph role=role attr:class="h-4 w-4" />
                            {label}
                        </a>
                    </li>
                })}
            </ul>
        </aside>
    }
}

#[component]
fn Topbar(session: WebSession, identity: Identity) -> impl IntoView {
    let on_logout = move |_| session.logout();

    view! {
        <div class="navbar bg-base-100 shadow px-6">
            <div class="flex-1">
                <h1 class="text-lg font-semibold">{dashboard_title(identity.role)}</h1>
            </div>
            <div class="flex-none gap-4">
                <div class="avatar placeholder">
                    <div class="bg-primary text-primary-content w-8 rounded-full">
                        <span class="text-sm">{identity.initial()}</span>
                    </div>
                </div>
                <span class="text-sm opacity-70">{identity.username.clone()}</span>
                <button on:click=on_logout class="btn btn-sm btn-outline btn-error gap-2">
                    <LogOut attr:class="h-4 w-4" /> "Logout"
                </button>
            </div>
        </div>
    }
}
