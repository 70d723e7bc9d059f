//! 非阻塞通知
//!
//! 面板把所有 API 失败都汇报到这里；通知 3 秒后自动消失。

use std::time::Duration;

use leptos::prelude::*;

use crate::api::ApiError;
use crate::auth::WebSession;

const DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// 递增序号，旧定时器不会清掉新通知
    seq: u64,
    pub message: String,
    pub is_error: bool,
}

/// 到期的定时器只清除它自己发出的那条通知
fn dismissal_applies(current: Option<&Notice>, seq: u64) -> bool {
    current.is_some_and(|n| n.seq == seq)
}

/// 通知发送端
#[derive(Clone, Copy)]
pub struct Notifier {
    current: RwSignal<Option<Notice>>,
    seq: StoredValue<u64>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            seq: StoredValue::new(0),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), true);
    }

    /// 汇报一次失败的操作
    ///
    /// 令牌失效时转为注销（路由随后自动回到登录页），其余错误以通知展示，
    /// 面板保留原有快照。
    pub fn failure(&self, session: &WebSession, action: &str, err: &ApiError) {
        log_error!("[Dashboard] {} failed: {}", action, err);
        if session.absorb(err) {
            return;
        }
        self.error(format!("{} failed: {}", action, err));
    }

    fn show(&self, message: String, is_error: bool) {
        let seq = self.seq.get_value() + 1;
        self.seq.set_value(seq);
        self.current.set(Some(Notice {
            seq,
            message,
            is_error,
        }));

        let current = self.current;
        set_timeout(
            move || {
                let expired = current
                    .try_with_untracked(|n| dismissal_applies(n.as_ref(), seq))
                    .unwrap_or(false);
                if expired {
                    current.set(None);
                }
            },
            DISMISS_AFTER,
        );
    }
}

/// 右上角通知框
#[component]
pub fn Toast(notifier: Notifier) -> impl IntoView {
    let current = notifier.current;

    move || {
        current.get().map(|notice| {
            let class = if notice.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{notice.message}</span>
                    </div>
                </div>
            }
        })
    }
}
