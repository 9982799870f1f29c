use super::*;
use crate::request::{HttpMethod, MockTransport};
use serde_json::{Value, json};

const BOOKINGS_URL: &str = "http://api.test/api/v1/bookings";

fn gateway() -> ApiGateway<MockTransport> {
    ApiGateway::new("http://api.test/api/v1", MockTransport::new())
}

fn filled_form() -> BookingForm {
    let mut form = BookingForm::new();
    form.set_date_input("2025-08-14");
    form.set_start_input("10:00");
    form.increment_duration();
    form
}

// =========================================================
// Derived fields
// =========================================================

#[test]
fn test_defaults() {
    let form = BookingForm::new();
    assert_eq!(form.sport(), "Badminton");
    assert_eq!(form.duration(), DurationMins::from_minutes(60));
    assert_eq!(form.phase(), BookingPhase::Editing);
    assert!(form.end_time_preview().is_none());
}

#[test]
fn test_price_preview_tracks_duration() {
    let mut form = BookingForm::new();
    assert_eq!(form.price_preview(600.0), 600.0);
    form.increment_duration();
    assert_eq!(form.price_preview(600.0), 900.0);
    form.decrement_duration();
    form.decrement_duration();
    form.decrement_duration();
    assert_eq!(form.duration(), DurationMins::from_minutes(30));
    assert_eq!(form.price_preview(600.0), 300.0);
}

#[test]
fn test_end_time_wraps_in_payload() {
    let mut form = BookingForm::new();
    form.set_date_input("2025-08-14");
    form.set_start_input("23:45");
    form.set_duration(DurationMins::from_minutes(30));

    let SubmitStart::Ready(request) = form.begin_submit("u1", "c1") else {
        panic!("form should be ready");
    };
    assert_eq!(request.end_time.to_string(), "00:15:00");
}

// =========================================================
// Validation gate
// =========================================================

#[tokio::test]
async fn test_missing_fields_never_hit_network() {
    let gw = gateway();
    let cases: Vec<Box<dyn Fn(&mut BookingForm)>> = vec![
        Box::new(|f: &mut BookingForm| f.set_date(None)),
        Box::new(|f: &mut BookingForm| f.set_start_time(None)),
        Box::new(|f: &mut BookingForm| f.set_duration(DurationMins::from_minutes(0))),
    ];

    for clear in cases {
        let mut form = filled_form();
        clear(&mut form);
        let outcome = submit_booking(&mut form, &gw, "u1", "c1").await;
        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(form.phase(), BookingPhase::Editing);
        assert_eq!(form.error(), Some(FILL_ALL_FIELDS));
    }
    assert_eq!(gw.transport().request_count(), 0);
}

#[test]
fn test_invalid_date_input_counts_as_missing() {
    let mut form = filled_form();
    form.set_date_input("");
    assert_eq!(form.begin_submit("u1", "c1"), SubmitStart::Invalid);
}

// =========================================================
// Submission
// =========================================================

#[tokio::test]
async fn test_scenario_600_per_hour_ninety_minutes() {
    let gw = gateway();
    gw.transport()
        .mock_response(HttpMethod::Post, BOOKINGS_URL, 201, json!({"id": "b1"}));

    let mut form = filled_form();
    assert_eq!(form.end_time_preview().map(|t| t.hhmm()), Some("11:30".to_string()));
    assert_eq!(form.price_preview(600.0), 900.0);

    let outcome = submit_booking(&mut form, &gw, "u1", "court-a").await;
    assert_eq!(
        outcome,
        SubmitOutcome::Navigate {
            court_id: "court-a".into()
        }
    );
    assert_eq!(form.phase(), BookingPhase::Succeeded);

    // 再次完成或提交都不会产生第二次跳转
    assert_eq!(form.finish::<Value>(Ok(json!({}))), SubmitOutcome::Ignored);
    assert_eq!(
        submit_booking(&mut form, &gw, "u1", "court-a").await,
        SubmitOutcome::Ignored
    );
    assert_eq!(gw.transport().request_count(), 1);

    let requests = gw.transport().requests.borrow();
    let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["startTime"], "10:00:00");
    assert_eq!(body["endTime"], "11:30:00");
    assert_eq!(body["duration"], 90);
    assert_eq!(body["status"], "CONFIRMED");
    assert_eq!(body["paymentStatus"], "PAID");
}

#[tokio::test]
async fn test_failure_returns_to_editing_with_fields_intact() {
    let gw = gateway();
    gw.transport().mock_response(
        HttpMethod::Post,
        BOOKINGS_URL,
        409,
        json!({"message": "Court already booked for this slot"}),
    );

    let mut form = filled_form();
    form.set_sport("Tennis");
    let before = (form.sport().to_string(), form.date(), form.start_time(), form.duration());

    let outcome = submit_booking(&mut form, &gw, "u1", "c1").await;
    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(form.phase(), BookingPhase::Editing);
    assert_eq!(form.error(), Some("Court already booked for this slot"));
    assert_eq!(
        (form.sport().to_string(), form.date(), form.start_time(), form.duration()),
        before
    );

    // 可以重新提交，产生新的请求
    gw.transport()
        .mock_response(HttpMethod::Post, BOOKINGS_URL, 201, json!({"id": "b2"}));
    let outcome = submit_booking(&mut form, &gw, "u1", "c1").await;
    assert!(matches!(outcome, SubmitOutcome::Navigate { .. }));
    assert_eq!(gw.transport().request_count(), 2);
}

#[tokio::test]
async fn test_network_failure_message() {
    let gw = gateway();
    gw.transport().set_offline(true);

    let mut form = filled_form();
    assert_eq!(
        submit_booking(&mut form, &gw, "u1", "c1").await,
        SubmitOutcome::Failed
    );
    assert_eq!(
        form.error(),
        Some("No response from server. Please check your connection.")
    );
}

#[test]
fn test_second_submit_while_submitting_is_ignored() {
    let mut form = filled_form();
    assert!(matches!(form.begin_submit("u1", "c1"), SubmitStart::Ready(_)));
    assert!(form.is_submitting());
    assert_eq!(form.begin_submit("u1", "c1"), SubmitStart::Ignored);

    // 提交中字段被锁定
    form.set_start_input("18:00");
    assert_eq!(form.start_time().map(|t| t.hhmm()), Some("10:00".to_string()));
}
