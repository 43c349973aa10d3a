//! 通知提示框
//!
//! `Toaster` 是共享层 `Notifier` 在浏览器中唯一的实现：
//! 右上角的提示栈，每条 3 秒后自动消失，也可以手动关闭。

use crate::web::Timeout;
use clinic_shared::notify::NoticeQueue;
use clinic_shared::{NoticeKind, Notifier};
use leptos::prelude::*;

/// 自动消失时间（毫秒）
const DISMISS_AFTER_MS: u32 = 3_000;

#[derive(Clone, Copy)]
pub struct Toaster {
    queue: RwSignal<NoticeQueue>,
}

impl Toaster {
    fn new() -> Self {
        Self {
            queue: RwSignal::new(NoticeQueue::new()),
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|q| q.dismiss(id));
    }
}

impl Notifier for Toaster {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Error => log::warn!("{}", message),
            _ => log::debug!("{}: {}", kind.title(), message),
        }

        let mut id = 0;
        self.queue.update(|q| id = q.push(kind, message));

        let queue = self.queue;
        match Timeout::new(DISMISS_AFTER_MS, move || queue.update(|q| q.dismiss(id))) {
            Some(timer) => timer.forget(),
            None => log::warn!("could not schedule notice dismissal"),
        }
    }
}

pub fn provide_toaster() -> Toaster {
    let toaster = Toaster::new();
    provide_context(toaster);
    toaster
}

/// 从 Context 获取通知器
pub fn use_toaster() -> Toaster {
    use_context::<Toaster>().expect("Toaster should be provided")
}

fn alert_class(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "alert alert-success shadow-lg",
        NoticeKind::Error => "alert alert-error shadow-lg",
        NoticeKind::Warning => "alert alert-warning shadow-lg",
        NoticeKind::Info => "alert alert-info shadow-lg",
    }
}

/// 提示栈
#[component]
pub fn Toasts() -> impl IntoView {
    let toaster = use_toaster();
    let queue = toaster.queue;

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || queue.with(|q| q.items().to_vec())
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class=alert_class(notice.kind)>
                            <div>
                                <h3 class="font-bold">{notice.kind.title()}</h3>
                                <div class="text-sm">{notice.message}</div>
                            </div>
                            <button
                                class="btn btn-ghost btn-xs btn-circle"
                                on:click=move |_| toaster.dismiss(id)
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
