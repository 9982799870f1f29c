//! 预订表单状态机
//!
//! `Editing → Submitting → Succeeded`，提交失败回到 `Editing` 并保留错误与已填字段。
//! 结束时间在提交时计算，价格预览随时长变化即时计算。

use crate::error::{ClientError, ClientResult};
use crate::gateway::ApiGateway;
use crate::request::HttpTransport;
use crate::{
    BOOKING_STATUS_CONFIRMED, BookingDate, BookingRequest, ClockTime, DurationMins,
    PAYMENT_STATUS_PAID, SPORTS, price_for,
};

#[cfg(test)]
mod tests;

pub const FILL_ALL_FIELDS: &str = "Please fill all fields before booking!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingPhase {
    #[default]
    Editing,
    Submitting,
    Succeeded,
}

/// `begin_submit` 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// 已在提交中或已成功，本次点击忽略
    Ignored,
    /// 必填字段缺失，错误已写入表单，不发请求
    Invalid,
    Ready(BookingRequest),
}

/// 一次完整提交的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Ignored,
    Invalid,
    /// 成功，跳转到场地详情（每次成功只产生一次）
    Navigate { court_id: String },
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    sport: String,
    date: Option<BookingDate>,
    start_time: Option<ClockTime>,
    duration: DurationMins,
    phase: BookingPhase,
    error: Option<String>,
    pending_court: Option<String>,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            sport: SPORTS[0].to_string(),
            date: None,
            start_time: None,
            duration: DurationMins::default(),
            phase: BookingPhase::Editing,
            error: None,
            pending_court: None,
        }
    }
}

impl BookingForm {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Accessors ---

    pub fn sport(&self) -> &str {
        &self.sport
    }

    pub fn date(&self) -> Option<BookingDate> {
        self.date
    }

    pub fn start_time(&self) -> Option<ClockTime> {
        self.start_time
    }

    pub fn duration(&self) -> DurationMins {
        self.duration
    }

    pub fn phase(&self) -> BookingPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == BookingPhase::Submitting
    }

    // --- Field setters (提交中不可修改) ---

    fn editable(&self) -> bool {
        self.phase == BookingPhase::Editing
    }

    pub fn set_sport(&mut self, sport: &str) {
        if self.editable() {
            self.sport = sport.to_string();
        }
    }

    pub fn set_date(&mut self, date: Option<BookingDate>) {
        if self.editable() {
            self.date = date;
        }
    }

    /// `<input type="date">` 的原始值，空串或非法值视为未填
    pub fn set_date_input(&mut self, raw: &str) {
        self.set_date(BookingDate::parse(raw));
    }

    pub fn set_start_time(&mut self, time: Option<ClockTime>) {
        if self.editable() {
            self.start_time = time;
        }
    }

    pub fn set_start_input(&mut self, raw: &str) {
        self.set_start_time(ClockTime::parse(raw));
    }

    pub fn set_duration(&mut self, duration: DurationMins) {
        if self.editable() {
            self.duration = duration;
        }
    }

    pub fn increment_duration(&mut self) {
        self.set_duration(self.duration.increment());
    }

    pub fn decrement_duration(&mut self) {
        self.set_duration(self.duration.decrement());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // --- Derived ---

    pub fn price_preview(&self, price_per_hour: f64) -> f64 {
        price_for(price_per_hour, self.duration)
    }

    /// 已填开始时间时的结束时间预览
    pub fn end_time_preview(&self) -> Option<ClockTime> {
        self.start_time.map(|start| start + self.duration)
    }

    // --- Transitions ---

    /// `Editing → Submitting`：检查必填字段并构造请求体
    pub fn begin_submit(&mut self, user_id: &str, court_id: &str) -> SubmitStart {
        if !self.editable() {
            tracing::debug!(phase = ?self.phase, "booking submit ignored");
            return SubmitStart::Ignored;
        }

        let (Some(date), Some(start_time)) = (self.date, self.start_time) else {
            self.error = Some(FILL_ALL_FIELDS.to_string());
            return SubmitStart::Invalid;
        };
        if self.duration.is_zero() {
            self.error = Some(FILL_ALL_FIELDS.to_string());
            return SubmitStart::Invalid;
        }

        self.phase = BookingPhase::Submitting;
        self.error = None;
        self.pending_court = Some(court_id.to_string());

        SubmitStart::Ready(BookingRequest {
            user_id: user_id.to_string(),
            court_id: court_id.to_string(),
            date,
            start_time,
            end_time: start_time + self.duration,
            duration: self.duration,
            status: BOOKING_STATUS_CONFIRMED.to_string(),
            payment_status: PAYMENT_STATUS_PAID.to_string(),
        })
    }

    /// `Submitting → Succeeded | Editing`
    ///
    /// 只有从 `Submitting` 转入 `Succeeded` 的那一次返回 `Navigate`。
    pub fn finish<R>(&mut self, result: ClientResult<R>) -> SubmitOutcome {
        if self.phase != BookingPhase::Submitting {
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(_) => {
                self.phase = BookingPhase::Succeeded;
                match self.pending_court.take() {
                    Some(court_id) => SubmitOutcome::Navigate { court_id },
                    None => SubmitOutcome::Ignored,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "booking failed");
                self.phase = BookingPhase::Editing;
                self.pending_court = None;
                self.error = Some(e.user_message());
                SubmitOutcome::Failed
            }
        }
    }
}

/// 校验、提交并推进状态机
///
/// 表单放在响应式容器中时，调用方分别使用 `begin_submit` 与 `finish`。
pub async fn submit_booking<T: HttpTransport>(
    form: &mut BookingForm,
    gateway: &ApiGateway<T>,
    user_id: &str,
    court_id: &str,
) -> SubmitOutcome {
    let request = match form.begin_submit(user_id, court_id) {
        SubmitStart::Ready(request) => request,
        SubmitStart::Invalid => return SubmitOutcome::Invalid,
        SubmitStart::Ignored => return SubmitOutcome::Ignored,
    };
    let result: Result<_, ClientError> = gateway.create_booking(&request).await;
    form.finish(result)
}
