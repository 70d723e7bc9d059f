use crate::auth::WebSession;
use crate::components::create_user_form::{CreateUserForm, FormState};
use crate::components::icons::*;
use crate::components::layout::DashboardLayout;
use crate::components::role_style::{badge_class, role_options};
use crate::components::toast::{Notifier, Toast};
use crate::directory::DirectoryState;
use crate::web::dialog;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos::web_sys::HtmlSelectElement;
use rolegate_shared::{CreateUserRequest, Identity, Role, UserId, UserRecord};

#[component]
pub fn AdminDashboard(session: WebSession, identity: Identity) -> impl IntoView {
    let layout_session = session.clone();
    let session = StoredValue::new(session);

    let state = RwSignal::new(DirectoryState::default());
    let notifier = Notifier::new();
    let form = FormState::new();
    let show_form = RwSignal::new(false);

    let load_users = move || {
        state.update(DirectoryState::begin_list);
        let session = session.get_value();
        spawn_local(async move {
            let result = session.directory().list_users().await;
            if let Some(err) = state.try_update(|s| s.finish_list(result)).flatten() {
                notifier.failure(&session, "Loading users", &err);
            }
        });
    };

    // 初始加载
    load_users();

    let handle_create = move |req: CreateUserRequest| {
        if !state.try_update(DirectoryState::try_begin_create).unwrap_or(false) {
            return;
        }
        let session = session.get_value();
        spawn_local(async move {
            let outcome = session.directory().create_user(&req).await;
            if outcome.is_ok() {
                form.reset();
                show_form.set(false);
                notifier.success(format!("User {} created", req.username));
            }
            if let Some(err) = state.try_update(|s| s.finish_create(outcome)).flatten() {
                notifier.failure(&session, "Creating user", &err);
            }
        });
    };

    let handle_role_change = move |id: UserId, role: Role| {
        if !state.try_update(|s| s.try_begin_row(id)).unwrap_or(false) {
            return;
        }
        let session = session.get_value();
        spawn_local(async move {
            let outcome = session.directory().set_user_role(id, role).await;
            if outcome.is_ok() {
                notifier.success("Role updated");
            }
            if let Some(err) = state.try_update(|s| s.finish_row(id, outcome)).flatten() {
                notifier.failure(&session, "Updating role", &err);
            }
        });
    };

    let handle_delete = move |id: UserId| {
        if !state.try_update(|s| s.try_begin_row(id)).unwrap_or(false) {
            return;
        }
        let session = session.get_value();
        spawn_local(async move {
            let confirm = || dialog::confirm("Are you sure?");
            match session.directory().delete_user(id, confirm).await {
                None => state.update(|s| s.release_row(id)),
                Some(outcome) => {
                    if outcome.is_ok() {
                        notifier.success("User deleted");
                    }
                    if let Some(err) = state.try_update(|s| s.finish_row(id, outcome)).flatten() {
                        notifier.failure(&session, "Deleting user", &err);
                    }
                }
            }
        });
    };

    let user_count = move || state.with(|s| s.users().len());
    let is_listing = move || state.with(DirectoryState::is_listing);
    let is_creating = Signal::derive(move || state.with(DirectoryState::is_creating));

    view! {
        <DashboardLayout session=layout_session identity=identity>
            <Toast notifier=notifier />

            <div class="flex flex-col md:flex-row md:items-center justify-between gap-4">
                <div>
                    <h1 class="text-2xl font-bold">"Admin Dashboard"</h1>
                    <p class="text-base-content/70 mt-1">"Manage user accounts and permissions"</p>
                </div>
                <button class="btn btn-primary gap-2" on:click=move |_| show_form.update(|open| *open = !*open)>
                    {move || if show_form.get() {
                        "Cancel".into_any()
                    } else {
                        view! { <Plus attr:class="h-4 w-4" /> "New User" }.into_any()
                    }}
                </button>
            </div>

            <Show when=move || show_form.get()>
                <CreateUserForm form=form creating=is_creating on_submit=handle_create />
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div class="flex items-center gap-2">
                            <Users attr:class="h-5 w-5 opacity-70" />
                            <h3 class="card-title">"All Users"</h3>
                            <span class="badge badge-neutral">{user_count}</span>
                        </div>
                        <button on:click=move |_| load_users() disabled=is_listing class="btn btn-ghost btn-circle">
                            <RefreshCw attr:class=move || if is_listing() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"User"</th>
                                    <th class="hidden md:table-cell">"Email"</th>
                                    <th>"Role"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || is_listing() && user_count() == 0>
                                    <tr>
                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || state.with(|s| s.is_loaded() && s.users().is_empty())>
                                    <tr>
                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                            <p>"No users found"</p>
                                            <p class="text-sm mt-1">"Create your first user above"</p>
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || state.with(|s| s.users().to_vec())
                                    key=|u| (u.id, u.role)
                                    children=move |user| view! {
                                        <AdminRow
                                            user=user
                                            state=state
                                            on_role_change=handle_role_change
                                            on_delete=handle_delete
                                        />
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </DashboardLayout>
    }
}

#[component]
fn AdminRow<R, D>(
    user: UserRecord,
    state: RwSignal<DirectoryState>,
    on_role_change: R,
    on_delete: D,
) -> impl IntoView
where
    R: Fn(UserId, Role) + Copy + Send + Sync + 'static,
    D: Fn(UserId) + Copy + Send + Sync + 'static,
{
    let id = user.id;
    let current_role = user.role;
    let busy = move || state.with(|s| s.is_busy(id));

    view! {
        <tr class:opacity-50=busy>
            <td>
                <div class="flex items-center gap-3">
                    <div class="avatar placeholder">
                        <div class="bg-neutral text-neutral-content w-8 rounded-full">
                            <span class="text-xs">{user.initial()}</span>
                        </div>
                    </div>
                    <span class="font-bold">{user.username.clone()}</span>
                </div>
            </td>
            <td class="hidden md:table-cell text-sm opacity-70">{user.email.clone()}</td>
            <td>
                <select
                    class=format!("select select-bordered select-sm {}", badge_class(current_role))
                    disabled=busy
                    on:change=move |ev| {
                        let picked = event_target_value(&ev).parse::<Role>();
                        // 下拉框只反映快照；新角色在重新拉取后随行重建出现
                        event_target::<HtmlSelectElement>(&ev).set_value(current_role.as_str());
                        if let Ok(role) = picked {
                            if role != current_role {
                                on_role_change(id, role);
                            }
                        }
                    }
                >
                    {role_options(&Role::ASSIGNABLE, current_role)
                        .into_iter()
                        .map(|(role, selected)| view! {
                            <option
                                value=role.as_str()
                                selected=selected
                                disabled=!Role::ASSIGNABLE.contains(&role)
                            >
                                {role.label()}
                            </option>
                        })
                        .collect_view()}
                </select>
            </td>
            <td class="text-right">
                <button class="btn btn-ghost btn-sm text-error gap-1" disabled=busy on:click=move |_| on_delete(id)>
                    <Trash2 attr:class="h-4 w-4" /> "Delete"
                </button>
            </td>
        </tr>
    }
}
