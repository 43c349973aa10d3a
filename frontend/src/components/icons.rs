//! 线框图标（lucide 风格）
//!
//! 组件本身不带尺寸，调用方用 `attr:class` 传入。

use leptos::prelude::*;

macro_rules! icon {
    ($name:ident, $($path:tt),+ $(,)?) => {
        #[component]
        pub fn $name() -> impl IntoView {
            view! {
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                >
                    $(<path d=$path />)+
                </svg>
            }
        }
    };
}

icon!(ShieldCheck, "M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z", "m9 12 2 2 4-4");
icon!(LogOut, "M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4", "m16 17 5-5-5-5", "M21 12H9");
icon!(RefreshCw, "M3 12a9 9 0 0 1 15-6.7L21 8", "M21 3v5h-5", "M21 12a9 9 0 0 1-15 6.7L3 16", "M8 16H3v5");
icon!(Trash2, "M3 6h18", "M19 6v14a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2V6", "M8 6V4a2 2 0 0 1 2-2h4a2 2 0 0 1 2 2v2");
icon!(Pencil, "M17 3a2.85 2.83 0 1 1 4 4L7.5 20.5 2 22l1.5-5.5Z");
icon!(Plus, "M5 12h14", "M12 5v14");
icon!(Menu, "M4 6h16", "M4 12h16", "M4 18h16");
icon!(Moon, "M12 3a6 6 0 0 0 9 9 9 9 0 1 1-9-9Z");
icon!(ChevronDown, "m6 9 6 6 6-6");
icon!(ChevronLeft, "m15 18-6-6 6-6");
icon!(ChevronRight, "m9 18 6-6-6-6");
icon!(Home, "m3 9 9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z", "M9 22V12h6v10");
icon!(Layers, "m12 2 10 5-10 5L2 7z", "m2 17 10 5 10-5", "m2 12 10 5 10-5");
icon!(Users, "M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2", "M9 11a4 4 0 1 0 0-8 4 4 0 0 0 0 8z", "M22 21v-2a4 4 0 0 0-3-3.87", "M16 3.13a4 4 0 0 1 0 7.75");
icon!(Pill, "m10.5 20.5 10-10a4.95 4.95 0 1 0-7-7l-10 10a4.95 4.95 0 1 0 7 7Z", "m8.5 8.5 7 7");
icon!(Wallet, "M21 12V7H5a2 2 0 0 1 0-4h14v4", "M3 5v14a2 2 0 0 0 2 2h16v-5", "M18 12a2 2 0 0 0 0 4h4v-4Z");
icon!(Briefcase, "M16 20V4a2 2 0 0 0-2-2h-4a2 2 0 0 0-2 2v16", "M4 6h16a2 2 0 0 1 2 2v10a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2z");
icon!(Flask, "M9 3h6", "M10 9V3", "M14 9V3", "M10 9 4.5 18.5A2 2 0 0 0 6.2 21h11.6a2 2 0 0 0 1.7-2.5L14 9");
icon!(Inbox, "M22 12h-6l-2 3h-4l-2-3H2", "M5.45 5.11 2 12v6a2 2 0 0 0 2 2h16a2 2 0 0 0 2-2v-6l-3.45-6.89A2 2 0 0 0 16.76 4H7.24a2 2 0 0 0-1.79 1.11z");
icon!(Globe, "M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20z", "M2 12h20", "M12 2a15.3 15.3 0 0 1 0 20 15.3 15.3 0 0 1 0-20z");
icon!(UserCog, "M14 19a6 6 0 0 0-12 0", "M8 11a4 4 0 1 0 0-8 4 4 0 0 0 0 8z", "M19 13a2 2 0 1 0 0-4 2 2 0 0 0 0 4z", "M19 8v1", "M19 13v1", "M21.6 9.5l-.87.5", "M17.27 12l-.87.5");
icon!(Palette, "M12 22a10 10 0 1 1 0-20c5.5 0 10 4 10 9a5 5 0 0 1-5 5h-1.8a1.7 1.7 0 0 0-1.2 2.9 1.7 1.7 0 0 1-1.2 2.9Z", "M13.5 6.5h.01", "M17.5 10.5h.01", "M8.5 7.5h.01", "M6.5 12.5h.01");
icon!(CircleUser, "M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20z", "M12 13a3 3 0 1 0 0-6 3 3 0 0 0 0 6z", "M7 20.66V19a2 2 0 0 1 2-2h6a2 2 0 0 1 2 2v1.66");

/// 菜单表中的图标名映射到组件
pub fn by_name(name: &str) -> AnyView {
    match name {
        "home" => view! { <Home attr:class="h-5 w-5" /> }.into_any(),
        "layers" => view! { <Layers attr:class="h-5 w-5" /> }.into_any(),
        "users" => view! { <Users attr:class="h-5 w-5" /> }.into_any(),
        "pill" => view! { <Pill attr:class="h-5 w-5" /> }.into_any(),
        "wallet" => view! { <Wallet attr:class="h-5 w-5" /> }.into_any(),
        "briefcase" => view! { <Briefcase attr:class="h-5 w-5" /> }.into_any(),
        "flask" => view! { <Flask attr:class="h-5 w-5" /> }.into_any(),
        "inbox" => view! { <Inbox attr:class="h-5 w-5" /> }.into_any(),
        "globe" => view! { <Globe attr:class="h-5 w-5" /> }.into_any(),
        "palette" => view! { <Palette attr:class="h-5 w-5" /> }.into_any(),
        "user-cog" => view! { <UserCog attr:class="h-5 w-5" /> }.into_any(),
        "logout" => view! { <LogOut attr:class="h-5 w-5" /> }.into_any(),
        _ => view! { <span class="h-5 w-5"></span> }.into_any(),
    }
}
