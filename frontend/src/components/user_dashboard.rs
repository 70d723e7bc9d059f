use crate::auth::WebSession;
use crate::components::layout::DashboardLayout;
use crate::components::role_style::RoleBadge;
use leptos::prelude::*;
use rolegate_shared::Identity;

/// 普通用户面板：只展示自己的身份，不发请求
#[component]
pub fn UserDashboard(session: WebSession, identity: Identity) -> impl IntoView {
    let Identity {
        username,
        email,
        role,
        ..
    } = identity.clone();

    view! {
        <DashboardLayout session=session identity=identity>
            <div>
                <h1 class="text-2xl font-bold">"Welcome, " {username.clone()}</h1>
                <p class="text-base-content/70 mt-1">"This is your user dashboard with basic access."</p>
            </div>

            <div class="card bg-base-100 shadow-xl max-w-xl">
                <div class="card-body">
                    <h2 class="card-title">"Your Account Information"</h2>
                    <dl class="space-y-4 mt-2">
                        <div>
                            <dt class="text-sm opacity-60">"Username"</dt>
                            <dd class="font-medium">{username}</dd>
                        </div>
                        <div>
                            <dt class="text-sm opacity-60">"Email"</dt>
                            <dd class="font-medium">{email}</dd>
                        </div>
                        <div>
                            <dt class="text-sm opacity-60">"Account Role"</dt>
                            <dd><RoleBadge role=role /></dd>
                        </div>
                        <div>
                            <dt class="text-sm opacity-60">"Account Status"</dt>
                            <dd class="font-medium text-success">"Active"</dd>
                        </div>
                    </dl>
                </div>
            </div>
        </DashboardLayout>
    }
}
