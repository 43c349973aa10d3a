//! 控制面板外壳
//!
//! 侧边菜单 + 顶栏 + 当前屏幕。活动屏幕只存在内存中，不进入 URL。

use crate::auth::{AuthContext, logout, use_auth, verify_session};
use crate::components::crud::{CrudScreen, Layout};
use crate::components::icons::{self, ChevronDown, CircleUser, LogOut, Menu, Moon};
use crate::components::profile::ProfileScreen;
use crate::components::reports::ReportsScreen;
use crate::config::use_config;
use crate::web::toggle_dark_theme;
use clinic_shared::nav::{MenuEntry, NavAction, NavState, Screen, ScreenView, visible_menu};
use leptos::prelude::*;

/// 挂载一个屏幕
fn screen_view(screen: Screen) -> AnyView {
    match screen.view() {
        ScreenView::Manage(schema) => view! { <CrudScreen schema=schema layout=Layout::Manage /> }.into_any(),
        ScreenView::CreateOnly(schema) => view! { <CrudScreen schema=schema layout=Layout::CreateOnly /> }.into_any(),
        ScreenView::Paged(schema) => view! { <CrudScreen schema=schema layout=Layout::Paged /> }.into_any(),
        ScreenView::Reports => view! { <ReportsScreen /> }.into_any(),
        ScreenView::Profile => view! { <ProfileScreen /> }.into_any(),
    }
}

#[component]
fn MenuItem(entry: &'static MenuEntry, nav: RwSignal<NavState>, auth: AuthContext) -> impl IntoView {
    let key = entry.key;
    let expanded = move || nav.with(|n| n.is_expanded(key));
    let is_active = move || nav.with(|n| n.highlighted == Some(entry.label));

    let on_click = move |_| {
        let mut action = NavAction::Ignored;
        nav.update(|n| action = n.click(key));
        if action == NavAction::Logout {
            logout(&auth);
        }
    };

    let children = entry.has_children().then(|| {
        view! {
            <Show when=expanded>
                <ul>
                    {entry
                        .sub_menu
                        .iter()
                        .map(|sub| {
                            let screen = sub.screen;
                            let label = sub.label;
                            view! {
                                <li>
                                    <a
                                        class=move || if nav.with(|n| n.highlighted == Some(label)) { "active" } else { "" }
                                        on:click=move |_| nav.update(|n| { n.click_sub(key, screen); })
                                    >
                                        {label}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </Show>
        }
    });

    view! {
        <li>
            <a class=move || if is_active() { "active" } else { "" } on:click=on_click>
                {icons::by_name(entry.icon)}
                <span class="flex-1">{entry.label}</span>
                {entry.has_children().then(|| view! {
                    <ChevronDown attr:class=move || if expanded() { "h-4 w-4 rotate-180" } else { "h-4 w-4" } />
                })}
            </a>
            {children}
        </li>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let AuthContext { state: auth_state, .. } = auth;
    let config = use_config();

    // 挂载时重新检查会话；过期则清空状态，路由服务会送回登录页
    verify_session(&auth);

    let nav = RwSignal::new(NavState::new());
    let active = Memo::new(move |_| nav.with(|n| n.active));

    let policy = config.menu_policy;
    let menu = move || {
        let role = auth_state.with(|s| s.session.as_ref().and_then(|s| s.role));
        visible_menu(policy, role)
    };

    let username = move || {
        auth_state.with(|s| {
            s.session
                .as_ref()
                .map(|s| s.display_name().to_string())
                .unwrap_or_default()
        })
    };

    let title = move || {
        nav.with(|n| match (n.active, n.highlighted) {
            (Screen::Profile, _) => "Profile".to_string(),
            (_, Some(label)) => label.to_string(),
            (_, None) => "Reports".to_string(),
        })
    };

    let sidebar_open = move || nav.with(|n| n.sidebar_open);
    let is_authenticated = move || auth_state.with(|s| s.is_authenticated());

    view! {
        <Show when=is_authenticated>
            <div class="min-h-screen bg-base-200 flex font-sans">
                <Show when=sidebar_open>
                    <aside class="w-64 bg-base-100 shadow-xl min-h-screen">
                        <div class="p-4 text-xl font-bold">"Clinic Admin"</div>
                        <ul class="menu p-2 gap-1">
                            {move || {
                                menu()
                                    .into_iter()
                                    .map(|entry| view! { <MenuItem entry=entry nav=nav auth=auth /> })
                                    .collect_view()
                            }}
                        </ul>
                    </aside>
                </Show>

                <div class="flex-1 p-4 md:p-8 space-y-6">
                    <div class="navbar bg-base-100 rounded-box shadow-xl">
                        <div class="flex-1 gap-2">
                            <button class="btn btn-ghost btn-square" on:click=move |_| nav.update(|n| n.toggle_sidebar())>
                                <Menu attr:class="h-5 w-5" />
                            </button>
                            <span class="text-xl font-semibold">{title}</span>
                        </div>
                        <div class="flex-none gap-2">
                            <span class="badge badge-neutral hidden md:inline-flex">{username}</span>
                            <button class="btn btn-ghost btn-circle" on:click=move |_| { toggle_dark_theme(); }>
                                <Moon attr:class="h-5 w-5" />
                            </button>
                            <button class="btn btn-ghost btn-circle" on:click=move |_| nav.update(|n| n.open(Screen::Profile))>
                                <CircleUser attr:class="h-5 w-5" />
                            </button>
                            <button on:click=move |_| logout(&auth) class="btn btn-outline btn-error gap-2">
                                <LogOut attr:class="h-4 w-4" /> "Logout"
                            </button>
                        </div>
                    </div>

                    <main>{move || screen_view(active.get())}</main>
                </div>
            </div>
        </Show>
    }
}
