mod form_state;

pub use form_state::FormState;
use form_state::CREATABLE_ROLES;

use crate::components::icons::Plus;
use leptos::prelude::*;
use rolegate_shared::{CreateUserRequest, Role};

/// 创建用户表单
///
/// 只负责收集输入；提交、清空与收起由面板在请求成功后决定。
#[component]
pub fn CreateUserForm(
    form: FormState,
    #[prop(into)] creating: Signal<bool>,
    #[prop(into)] on_submit: Callback<CreateUserRequest>,
) -> impl IntoView {
    let submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if creating.get_untracked() {
            return;
        }
        on_submit.run(form.to_request());
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body space-y-2" on:submit=submit>
                <h3 class="card-title text-base">
                    <Plus attr:class="h-4 w-4" /> "Create New User"
                </h3>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <div class="form-control">
                        <label for="new_username" class="label">
                            <span class="label-text">"Username"</span>
                        </label>
                        <input id="new_username" type="text" placeholder="johndoe"
                            class="input input-bordered w-full"
                            prop:value=form.username
                            on:input=move |ev| form.username.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label for="new_email" class="label">
                            <span class="label-text">"Email"</span>
                        </label>
                        <input id="new_email" type="email" placeholder="john@example.com"
                            class="input input-bordered w-full"
                            prop:value=form.email
                            on:input=move |ev| form.email.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label for="new_password" class="label">
                            <span class="label-text">"Password"</span>
                        </label>
                        <input id="new_password" type="password" placeholder="••••••••"
                            autocomplete="new-password"
                            class="input input-bordered w-full"
                            prop:value=form.password
                            on:input=move |ev| form.password.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label for="new_role" class="label">
                            <span class="label-text">"Role"</span>
                        </label>
                        <select id="new_role" class="select select-bordered w-full"
                            on:change=move |ev| {
                                if let Ok(role) = event_target_value(&ev).parse::<Role>() {
                                    form.role.set(role);
                                }
                            }
                        >
                            {CREATABLE_ROLES
                                .into_iter()
                                .map(|role| view! {
                                    <option
                                        value=role.as_str()
                                        prop:selected=move || form.role.get() == role
                                    >
                                        {role.label()}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                    </div>
                </div>

                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary gap-2" disabled=move || creating.get()>
                        {move || if creating.get() {
                            view! { <span class="loading loading-spinner loading-sm"></span> "Creating..." }.into_any()
                        } else {
                            view! { <Plus attr:class="h-4 w-4" /> "Create User" }.into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}
