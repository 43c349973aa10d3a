//! 注册页面

use crate::auth::auth_service;
use crate::config::use_config;
use crate::notify::use_toaster;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use clinic_shared::Notifier;
use clinic_shared::auth::RegisterForm;
use clinic_shared::resources::USER_ROLES;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，可以直接在闭包间传递。
#[derive(Clone, Copy)]
struct FormState {
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
    username: RwSignal<String>,
    email: RwSignal<String>,
    phone_number: RwSignal<String>,
    role: RwSignal<String>,
    password: RwSignal<String>,
    password_confirm: RwSignal<String>,
}

impl FormState {
    fn new() -> Self {
        Self {
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            username: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone_number: RwSignal::new(String::new()),
            role: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            password_confirm: RwSignal::new(String::new()),
        }
    }

    fn to_form(self) -> RegisterForm {
        RegisterForm {
            first_name: self.first_name.get_untracked(),
            last_name: self.last_name.get_untracked(),
            username: self.username.get_untracked(),
            email: self.email.get_untracked(),
            phone_number: self.phone_number.get_untracked(),
            role: self.role.get_untracked(),
            password: self.password.get_untracked(),
            password_confirm: self.password_confirm.get_untracked(),
        }
    }
}

/// 单个文本输入框
#[component]
fn TextInput(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type=input_type
                class="input input-bordered"
                prop:value=value
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let config = use_config();
    let toaster = use_toaster();
    let router = use_router();

    let form = FormState::new();
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_is_submitting.set(true);

        let service = auth_service(&config);
        spawn_local(async move {
            match service.register(&form.to_form()).await {
                Ok(_) => {
                    toaster.success("Account created, please sign in");
                    router.navigate(AppRoute::Login.to_path());
                }
                Err(e) if e.is_validation() => toaster.warning(&e.to_string()),
                Err(e) => toaster.error(&e.user_message()),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-2xl">
                <h1 class="text-3xl font-bold">"Create an account"</h1>
                <div class="card w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <TextInput label="First Name" value=form.first_name />
                            <TextInput label="Last Name" value=form.last_name />
                            <TextInput label="Username" value=form.username />
                            <TextInput label="Email" value=form.email input_type="email" />
                            <TextInput label="Phone Number" value=form.phone_number input_type="tel" />
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Role"</span>
                                </label>
                                <select
                                    class="select select-bordered"
                                    prop:value=form.role
                                    on:change=move |ev| form.role.set(event_target_value(&ev))
                                >
                                    <option value="">"Select a role"</option>
                                    {USER_ROLES
                                        .iter()
                                        .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                                        .collect_view()}
                                </select>
                            </div>
                            <TextInput label="Password" value=form.password input_type="password" />
                            <TextInput label="Confirm Password" value=form.password_confirm input_type="password" />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Registering..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login.to_path() class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
