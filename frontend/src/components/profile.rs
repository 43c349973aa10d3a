use crate::auth::{api_client, handle_unauthorized, use_auth};
use crate::components::icons::CircleUser;
use crate::config::use_config;
use crate::notify::use_toaster;
use crate::web::read_file_input;
use clinic_shared::Notifier;
use clinic_shared::profile::{Profile, ProfileService, ProfileUpdate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos::web_sys::HtmlInputElement;

#[component]
pub fn ProfileScreen() -> impl IntoView {
    let auth = use_auth();
    let config = StoredValue::new(use_config());
    let toaster = use_toaster();

    let form = RwSignal::new(ProfileUpdate::default());
    let (picture, set_picture) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let service = move || ProfileService::new(config.with_value(|c| api_client(&auth, c)));
    let show = move |profile: Profile| {
        let api_base = config.with_value(|c| c.api_base.clone());
        set_picture.set(profile.profile_pic.as_ref().map(|p| {
            if p.starts_with("http") {
                p.clone()
            } else {
                format!("{}/{}", api_base, p.trim_start_matches('/'))
            }
        }));
        form.set(ProfileUpdate::from_profile(&profile));
    };

    spawn_local(async move {
        match service().load().await {
            Ok(profile) => show(profile),
            Err(e) => {
                if !handle_unauthorized(&auth, &e) {
                    set_error_msg.set(Some(e.user_message()));
                }
            }
        }
        set_loading.set(false);
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        set_saving.set(true);
        set_error_msg.set(None);

        let update = form.get_untracked();
        spawn_local(async move {
            match service().update(&update).await {
                Ok(profile) => {
                    show(profile);
                    toaster.success("Profile updated successfully");
                }
                Err(e) if e.is_validation() => toaster.warning(&e.to_string()),
                Err(e) => {
                    if !handle_unauthorized(&auth, &e) {
                        set_error_msg.set(Some(e.user_message()));
                    }
                }
            }
            set_saving.set(false);
        });
    };

    let on_file = move |ev: leptos::web_sys::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        spawn_local(async move {
            let blob = read_file_input(&input).await;
            form.update(|f| f.profile_pic = blob);
        });
    };

    view! {
        <Show
            when=move || !loading.get()
            fallback=|| view! { <div class="flex justify-center py-16"><span class="loading loading-spinner loading-lg text-primary"></span></div> }
        >
            <div class="card bg-base-100 shadow-xl max-w-xl mx-auto">
                <form class="card-body" on:submit=on_submit>
                    <h3 class="card-title">"Update Profile"</h3>
                    <div class="flex justify-center">
                        {move || match picture.get() {
                            Some(src) => view! { <img class="h-24 w-24 rounded-full object-cover" src=src /> }.into_any(),
                            None => view! { <CircleUser attr:class="h-24 w-24 opacity-40" /> }.into_any(),
                        }}
                    </div>

                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <div class="form-control">
                        <label class="label" for="user_email">
                            <span class="label-text">"Email"</span>
                        </label>
                        <input
                            id="user_email"
                            type="email"
                            class="input input-bordered"
                            prop:value=move || form.with(|f| f.user_email.clone())
                            on:input=move |ev| form.update(|f| f.user_email = event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="address">
                            <span class="label-text">"Address"</span>
                        </label>
                        <input
                            id="address"
                            type="text"
                            class="input input-bordered"
                            prop:value=move || form.with(|f| f.address.clone())
                            on:input=move |ev| form.update(|f| f.address = event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Profile picture"</span>
                        </label>
                        <input
                            type="file"
                            accept="image/*"
                            class="file-input file-input-bordered"
                            on:change=on_file
                        />
                    </div>
                    <div class="card-actions justify-end mt-4">
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
