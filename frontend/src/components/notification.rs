use leptos::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
}

/// 全局通知，显示一段时间后自动消失
#[derive(Clone, Copy)]
pub struct Notifier {
    current: RwSignal<Option<Notification>>,
    timeout_ms: u32,
}

impl Notifier {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            current: RwSignal::new(None),
            timeout_ms,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), true);
    }

    fn show(&self, message: String, is_error: bool) {
        let notification = Notification { message, is_error };
        self.current.set(Some(notification.clone()));

        // 只清除自己这一条，避免误删后来的通知
        let current = self.current;
        set_timeout(
            move || {
                if current.get_untracked().as_ref() == Some(&notification) {
                    current.set(None);
                }
            },
            Duration::from_millis(u64::from(self.timeout_ms)),
        );
    }

    pub fn dismiss(&self) {
        self.current.set(None);
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

#[component]
pub fn NotificationToast() -> impl IntoView {
    let notifier = use_notifier();

    view! {
        {move || {
            notifier.current.get().map(|n| {
                let class = if n.is_error {
                    "alert alert-error shadow-lg"
                } else {
                    "alert alert-success shadow-lg"
                };
                view! {
                    <div class="toast toast-top toast-end z-50">
                        <div class=class on:click=move |_| notifier.dismiss()>
                            <span>{n.message}</span>
                        </div>
                    </div>
                }
            })
        }}
    }
}
