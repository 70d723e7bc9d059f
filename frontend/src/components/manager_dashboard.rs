use crate::auth::WebSession;
use crate::components::icons::*;
use crate::components::layout::DashboardLayout;
use crate::components::role_style::RoleBadge;
use crate::components::toast::{Notifier, Toast};
use crate::directory::{DirectoryState, RoleCounts, RoleFilter};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rolegate_shared::Identity;

/// 经理面板：只读列表 + 客户端角色过滤
#[component]
pub fn ManagerDashboard(session: WebSession, identity: Identity) -> impl IntoView {
    let state = RwSignal::new(DirectoryState::default());
    let filter = RwSignal::new(RoleFilter::All);
    let notifier = Notifier::new();
    let self_id = identity.id;

    // 挂载时拉取一次；过滤从不重新请求
    state.update(DirectoryState::begin_list);
    {
        let session = session.clone();
        spawn_local(async move {
            let result = session.directory().list_users().await;
            if let Some(err) = state.try_update(|s| s.finish_list(result)).flatten() {
                notifier.failure(&session, "Loading users", &err);
            }
        });
    }

    let counts = Memo::new(move |_| state.with(|s| RoleCounts::tally(s.users())));
    let visible = Memo::new(move |_| state.with(|s| filter.get().apply(s.users())));
    let is_listing = move || state.with(DirectoryState::is_listing);

    view! {
        <DashboardLayout session=session identity=identity>
            <Toast notifier=notifier />

            <div class="flex flex-col md:flex-row md:items-center justify-between gap-4">
                <div>
                    <h1 class="text-2xl font-bold">"Manager Dashboard"</h1>
                    <p class="text-base-content/70 mt-1">"View user information and roles (read-only access)"</p>
                </div>
                <span class="badge badge-outline gap-2">
                    <Eye attr:class="h-4 w-4" /> "Read-only"
                </span>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary"><Users attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Total Users"</div>
                    <div class="stat-value text-primary">{move || counts.get().total}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-info"><Briefcase attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Managers"</div>
                    <div class="stat-value text-info">{move || counts.get().managers}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-error"><ShieldCheck attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Admins"</div>
                    <div class="stat-value text-error">{move || counts.get().admins}</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex flex-col md:flex-row md:items-center justify-between gap-2 p-6 pb-2">
                        <div class="flex items-center gap-2">
                            <h3 class="card-title">"User Directory"</h3>
                            <span class="badge badge-neutral">{move || visible.with(Vec::len)} " users"</span>
                        </div>
                        <div class="join">
                            {RoleFilter::OPTIONS
                                .into_iter()
                                .map(|option| view! {
                                    <button
                                        class="btn btn-sm join-item"
                                        class:btn-active=move || filter.get() == option
                                        on:click=move |_| filter.set(option)
                                    >
                                        {option.label()}
                                    </button>
                                })
                                .collect_view()}
                        </div>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"User"</th>
                                    <th class="hidden md:table-cell">"Email"</th>
                                    <th>"Role"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || is_listing() && !state.with(DirectoryState::is_loaded)>
                                    <tr>
                                        <td colspan="3" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || visible.get()
                                    key=|u| u.id
                                    children=move |user| {
                                        let is_self = user.id == self_id;
                                        view! {
                                            <tr class:bg-base-200=is_self>
                                                <td>
                                                    <div class="flex items-center gap-3">
                                                        <div class="avatar placeholder">
                                                            <div class="bg-neutral text-neutral-content w-8 rounded-full">
                                                                <span class="text-xs">{user.initial()}</span>
                                                            </div>
                                                        </div>
                                                        <span class="font-bold">{user.username.clone()}</span>
                                                        {is_self.then(|| view! { <span class="text-xs opacity-50">"(You)"</span> })}
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell text-sm opacity-70">{user.email.clone()}</td>
                                                <td><RoleBadge role=user.role /></td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>

                    <Show when=move || state.with(DirectoryState::is_loaded) && visible.with(Vec::is_empty)>
                        <div class="text-center py-12 text-base-content/50 space-y-2">
                            <Users attr:class="h-12 w-12 mx-auto opacity-30" />
                            <p>"No users found"</p>
                            <p class="text-sm">{move || filter.get().empty_hint()}</p>
                            <Show when=move || !filter.get().is_all()>
                                <button class="btn btn-link btn-sm" on:click=move |_| filter.set(RoleFilter::All)>
                                    "Show all users"
                                </button>
                            </Show>
                        </div>
                    </Show>

                    <Show when=move || !is_listing() && !visible.with(Vec::is_empty)>
                        <div class="px-6 py-3 border-t border-base-200 text-sm text-base-content/60">
                            {move || filter.get().summary(visible.with(Vec::len), counts.get().total)}
                        </div>
                    </Show>
                </div>
            </div>
        </DashboardLayout>
    }
}
