//! 通知层
//!
//! 所有屏幕通过同一个 `Notifier` 报告成功、失败和警告。

#[cfg(test)]
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn title(&self) -> &'static str {
        match self {
            NoticeKind::Success => "Success",
            NoticeKind::Error => "Error",
            NoticeKind::Warning => "Warning",
            NoticeKind::Info => "Info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// 通知接口
pub trait Notifier {
    fn notify(&self, kind: NoticeKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeKind::Error, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NoticeKind::Warning, message);
    }

    fn info(&self, message: &str) {
        self.notify(NoticeKind::Info, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, kind: NoticeKind, message: &str) {
        (**self).notify(kind, message);
    }
}

/// 当前显示中的通知队列
///
/// 超过上限时丢弃最早的一条。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeQueue {
    next_id: u64,
    items: Vec<Notice>,
}

impl NoticeQueue {
    pub const MAX_VISIBLE: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notice {
            id,
            kind,
            message: message.into(),
        });
        if self.items.len() > Self::MAX_VISIBLE {
            let overflow = self.items.len() - Self::MAX_VISIBLE;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =========================================================
// 测试工具: RecordingNotifier
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<(NoticeKind, String)>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<NoticeKind> {
        self.notices.borrow().iter().map(|(k, _)| *k).collect()
    }

    pub fn last(&self) -> Option<(NoticeKind, String)> {
        self.notices.borrow().last().cloned()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices.borrow_mut().push((kind, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_keeps_latest_notices() {
        let mut queue = NoticeQueue::new();
        for i in 0..6 {
            queue.push(NoticeKind::Info, format!("n{}", i));
        }
        let messages: Vec<&str> = queue.items().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["n2", "n3", "n4", "n5"]);
    }

    #[test]
    fn test_dismiss_removes_only_target() {
        let mut queue = NoticeQueue::new();
        let first = queue.push(NoticeKind::Success, "saved");
        let second = queue.push(NoticeKind::Error, "failed");

        queue.dismiss(first);

        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].id, second);
    }

    #[test]
    fn test_helpers_route_to_kind() {
        let notifier = RecordingNotifier::new();
        notifier.success("a");
        notifier.warning("b");
        (&notifier).error("c");
        assert_eq!(
            notifier.kinds(),
            vec![NoticeKind::Success, NoticeKind::Warning, NoticeKind::Error]
        );
    }
}
