use std::time::Duration;

use leptos::prelude::*;

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// 一次后台动作要告诉用户的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// 单次交互的通知；3 秒后自动清除
///
/// 每条消息带一个代号，计时器只清除自己那一条，新消息不会被旧计时器提前清掉。
#[derive(Clone, Copy)]
pub struct Toast {
    // 消息内容, 是否出错
    message: RwSignal<Option<(String, bool)>>,
    generation: StoredValue<u64>,
}

impl Toast {
    pub fn new() -> Self {
        Self {
            message: RwSignal::new(None),
            generation: StoredValue::new(0),
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text.into(), false);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text.into(), true);
    }

    pub fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(text) => self.success(text),
            Notice::Error(text) => self.error(text),
        }
    }

    fn show(&self, text: String, is_error: bool) {
        let generation = self.post(text, is_error);
        let toast = *self;
        set_timeout(move || toast.expire(generation), TOAST_DURATION);
    }

    /// 显示一条消息，返回它的代号
    fn post(&self, text: String, is_error: bool) -> u64 {
        self.generation.update_value(|g| *g += 1);
        self.message.set(Some((text, is_error)));
        self.generation.get_value()
    }

    /// 只有仍在显示的那一条才会被清除；页面已卸载时什么也不做
    fn expire(&self, generation: u64) {
        if self.generation.try_get_value() == Some(generation) {
            self.message.try_set(None);
        }
    }
}

#[component]
pub fn ToastView(toast: Toast) -> impl IntoView {
    let message = toast.message;

    view! {
        <Show when=move || message.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if message.with(|m| m.as_ref().is_some_and(|(_, is_err)| *is_err)) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || message.with(|m| m.as_ref().map(|(text, _)| text.clone()).unwrap_or_default())}</span>
                </div>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::prelude::Owner;

    #[test]
    fn test_old_timer_keeps_newer_message() {
        let owner = Owner::new();
        owner.with(|| {
            let toast = Toast::new();
            let first = toast.post("Đã lưu thành công".into(), false);
            let second = toast.post("Xóa thất bại".into(), true);

            toast.expire(first);
            assert_eq!(
                toast.message.get_untracked(),
                Some(("Xóa thất bại".to_string(), true))
            );

            toast.expire(second);
            assert_eq!(toast.message.get_untracked(), None);
        });
    }
}
