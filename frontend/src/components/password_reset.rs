//! 找回密码
//!
//! 两个页面：输入邮箱申请重置邮件，以及从邮件链接进入后设置新密码。

use crate::auth::auth_service;
use crate::config::use_config;
use crate::notify::use_toaster;
use crate::web::route::AppRoute;
use crate::web::router::{Link, current_query, use_router};
use clinic_shared::Notifier;
use clinic_shared::auth::ResetLink;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let config = use_config();
    let toaster = use_toaster();

    let email = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (sent, set_sent) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_is_submitting.set(true);

        let service = auth_service(&config);
        spawn_local(async move {
            match service.request_password_reset(&email.get_untracked()).await {
                Ok(_) => {
                    set_sent.set(true);
                    toaster.success("Check your inbox for the reset link");
                }
                Err(e) if e.is_validation() => toaster.warning(&e.to_string()),
                Err(e) => toaster.error(&e.user_message()),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Forgot your password?"</h1>
                <div class="card w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || sent.get()>
                            <div role="alert" class="alert alert-success text-sm py-2">
                                "A reset link has been sent if the address is registered."
                            </div>
                        </Show>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                class="input input-bordered"
                                prop:value=email
                                on:input=move |ev| email.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                "Send reset link"
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            <Link to=AppRoute::Login.to_path() class="link link-hover">"Back to sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let config = use_config();
    let toaster = use_toaster();
    let router = use_router();

    let link = ResetLink::from_query(&current_query());
    let link_is_valid = !link.otp.is_empty() && link.uuidb64().is_some();

    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_is_submitting.set(true);

        let service = auth_service(&config);
        let link = link.clone();
        spawn_local(async move {
            let result = service
                .change_password(&link, &password.get_untracked(), &confirm.get_untracked())
                .await;
            match result {
                Ok(_) => {
                    toaster.success("Password changed, please sign in");
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
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Create a new password"</h1>
                <div class="card w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {(!link_is_valid).then(|| view! {
                            <div role="alert" class="alert alert-warning text-sm py-2">
                                "This reset link is incomplete. Request a new one."
                            </div>
                        })}
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"New Password"</span>
                            </label>
                            <input
                                type="password"
                                class="input input-bordered"
                                prop:value=password
                                on:input=move |ev| password.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Confirm Password"</span>
                            </label>
                            <input
                                type="password"
                                class="input input-bordered"
                                prop:value=confirm
                                on:input=move |ev| confirm.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                "Change password"
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            <Link to=AppRoute::ForgotPassword.to_path() class="link link-hover">
                                "Request another link"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
