//! `setInterval` 的 RAII 封装，供 OTP 重发倒计时使用

use wasm_bindgen::prelude::*;

/// drop 时自动 `clearInterval`
pub struct Interval {
    handle: Option<i32>,
    // 定时器存活期间 JS 侧仍引用这个闭包
    _callback: Closure<dyn Fn()>,
}

impl Interval {
    /// 无法注册时记录错误并返回一个不会触发的定时器
    pub fn new<F>(millis: u32, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let callback = Closure::<dyn Fn()>::new(callback);
        let handle = web_sys::window().and_then(|window| {
            window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    millis as i32,
                )
                .inspect_err(|e| tracing::error!(error = ?e, "failed to start interval"))
                .ok()
        });

        Self {
            handle,
            _callback: callback,
        }
    }

    pub fn cancel(&self) {
        if let (Some(window), Some(handle)) = (web_sys::window(), self.handle) {
            window.clear_interval_with_handle(handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 每秒一次的倒计时节拍，视图卸载时停止
///
/// `Interval` 持有 JS 闭包，不是 `Send`，因此放进 `StoredValue::new_local`，
/// 通过 `on_cleanup` 释放。
pub fn tick_every_second<F>(callback: F)
where
    F: Fn() + 'static,
{
    use leptos::prelude::*;

    let interval = StoredValue::new_local(Some(Interval::new(1000, callback)));
    on_cleanup(move || {
        interval.update_value(|slot| {
            slot.take();
        });
    });
}
