//! 浏览器原生对话框

/// `window.confirm`，没有 window 时视为取消
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// 切换 `<html data-theme>`，返回切换后是否为暗色
pub fn toggle_dark_theme() -> bool {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return false;
    };

    let dark = root.get_attribute("data-theme").as_deref() != Some("dark");
    let theme = if dark { "dark" } else { "light" };
    if let Err(e) = root.set_attribute("data-theme", theme) {
        log::warn!("could not switch theme: {:?}", e);
    }
    dark
}
