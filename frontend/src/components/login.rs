use crate::auth::{AuthContext, login, use_auth};
use crate::components::icons::ShieldCheck;
use crate::config::use_config;
use crate::notify::use_toaster;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use clinic_shared::{CancelFlag, Notifier};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let AuthContext { state: auth_state, .. } = auth;
    let config = use_config();
    let toaster = use_toaster();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 页面卸载后到达的响应一律丢弃
    let cancel = CancelFlag::new();
    on_cleanup({
        let cancel = cancel.clone();
        move || cancel.cancel()
    });

    let is_loading = move || auth_state.get().is_loading;

    view! {
        <Show when=move || !is_loading() fallback=|| view! { <div class="flex items-center justify-center min-h-screen"><span class="loading loading-spinner loading-lg text-primary"></span></div> }>
            {
                let config = config.clone();
                let cancel = cancel.clone();
                let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
                    ev.prevent_default();
                    if is_submitting.get_untracked() {
                        return;
                    }

                    set_is_submitting.set(true);
                    set_error_msg.set(None);

                    let config = config.clone();
                    let cancel = cancel.clone();
                    spawn_local(async move {
                        let result = login(
                            &auth,
                            &config,
                            email.get_untracked(),
                            password.get_untracked(),
                            cancel,
                        )
                        .await;
                        match result {
                            Ok(session) => {
                                toaster.success(&format!("Welcome, {}", session.display_name()));
                            }
                            Err(e) if e.is_cancelled() => return,
                            Err(e) => set_error_msg.set(Some(e.user_message())),
                        }
                        set_is_submitting.set(false);
                    });
                };

                view! {
                    <div class="hero min-h-screen bg-base-200">
                        <div class="hero-content flex-col w-full max-w-md">
                            <div class="text-center mb-4">
                                <div class="flex flex-col items-center gap-2">
                                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                        <ShieldCheck attr:class="h-8 w-8" />
                                    </div>
                                    <h1 class="text-3xl font-bold">"Clinic Admin"</h1>
                                    <p class="text-base-content/70">
                                        "Sign in with your staff account"
                                    </p>
                                </div>
                            </div>

                            <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                                <form class="card-body" on:submit=on_submit>
                                    <Show when=move || error_msg.get().is_some()>
                                        <div role="alert" class="alert alert-error text-sm py-2">
                                            <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
                                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                                        </div>
                                    </Show>

                                    <div class="form-control">
                                        <label class="label" for="email">
                                            <span class="label-text">"Email"</span>
                                        </label>
                                        <input
                                            id="email"
                                            type="email"
                                            placeholder="you@clinic.example"
                                            on:input=move |ev| set_email.set(event_target_value(&ev))
                                            prop:value=email
                                            class="input input-bordered"
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="password">
                                            <span class="label-text">"Password"</span>
                                        </label>
                                        <input
                                            id="password"
                                            type="password"
                                            placeholder="••••••••"
                                            on:input=move |ev| set_password.set(event_target_value(&ev))
                                            prop:value=password
                                            class="input input-bordered"
                                        />
                                        <label class="label">
                                            <Link to=AppRoute::ForgotPassword.to_path() class="label-text-alt link link-hover">
                                                "Forgot password?"
                                            </Link>
                                        </label>
                                    </div>
                                    <div class="form-control mt-6">
                                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                            {move || if is_submitting.get() {
                                                view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                            } else {
                                                "Sign in".into_any()
                                            }}
                                        </button>
                                    </div>
                                    <p class="text-center text-sm mt-2">
                                        "No account yet? "
                                        <Link to=AppRoute::Register.to_path() class="link link-primary">"Register"</Link>
                                    </p>
                                </form>
                            </div>
                        </div>
                    </div>
                }
            }
        </Show>
    }
}
