//! 浏览器原生对话框

/// 同步确认框（`window.confirm`）
///
/// 无法弹出时按“取消”处理，破坏性操作不会在没有确认的情况下执行。
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
