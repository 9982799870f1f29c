use super::*;
use crate::request::{HttpMethod, MockTransport};
use crate::{BookingDate, ClockTime, DurationMins};
use serde_json::json;

const BASE: &str = "http://api.test/api/v1";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn gateway() -> ApiGateway<MockTransport> {
    ApiGateway::new(BASE, MockTransport::new())
}

fn sample_data() -> AdminData {
    AdminData {
        users: vec![
            User {
                id: "u1".into(),
                first_name: "Asha".into(),
                last_name: "Patel".into(),
                email: "asha@example.com".into(),
                created_at: Some("2025-03-04T09:00:00Z".into()),
                ..Default::default()
            },
            User {
                id: "u2".into(),
                first_name: "Ravi".into(),
                last_name: "Kumar".into(),
                email: "ravi@courts.in".into(),
                role: UserRole::Owner,
                ..Default::default()
            },
        ],
        facilities: vec![
            Facility {
                id: "f1".into(),
                name: "Smash Arena".into(),
                city: Some("Pune".into()),
                ..Default::default()
            },
            Facility {
                id: "f2".into(),
                name: "Green Dome".into(),
                ..Default::default()
            },
        ],
        courts: vec![
            Court {
                id: "c1".into(),
                name: "Court One".into(),
                sport_type: "Tennis".into(),
                price_per_hour: 600.0,
                facility_id: Some("f1".into()),
                ..Default::default()
            },
            Court {
                id: "c2".into(),
                name: "Court Two".into(),
                sport_type: "Badminton".into(),
                price_per_hour: 1250.5,
                facility_id: Some("gone".into()),
                ..Default::default()
            },
        ],
        bookings: vec![Booking {
            id: "b1".into(),
            user_id: Some("u1".into()),
            court_id: Some("c9".into()),
            date: BookingDate::parse("2025-08-14"),
            start_time: ClockTime::parse("10:00:00"),
            end_time: ClockTime::parse("11:30:00"),
            duration: DurationMins::from_minutes(90),
            status: "CONFIRMED".into(),
            payment_status: "PAID".into(),
            created_at: None,
        }],
        matches: vec![Match {
            id: "m1".into(),
            court_id: Some("c1".into()),
            current_players: 3,
            max_players: 4,
            status: "OPEN".into(),
            ..Default::default()
        }],
        reviews: vec![Review {
            id: "r1".into(),
            user_id: None,
            facility_id: Some("f2".into()),
            rating: 4,
            comment: "Great lighting and very clean changing rooms".into(),
            created_at: Some("2025-06-01T12:00:00Z".into()),
        }],
    }
}

// =========================================================
// Operation table
// =========================================================

#[test]
fn test_only_editable_resources_have_create_and_update() {
    for resource in AdminResource::ALL {
        let ops = resource.ops::<MockTransport>();
        let editable = matches!(
            resource,
            AdminResource::Users | AdminResource::Facilities | AdminResource::Courts
        );
        assert_eq!(ops.create.is_some(), editable, "{resource:?}");
        assert_eq!(ops.update.is_some(), editable, "{resource:?}");
        assert_eq!(!resource.fields().is_empty(), editable, "{resource:?}");
    }
}

#[tokio::test]
async fn test_every_resource_can_be_deleted() {
    let gw = gateway();
    for resource in AdminResource::ALL {
        let path = match resource {
            AdminResource::Users => "/users/x",
            AdminResource::Facilities => "/facilities/x",
            AdminResource::Courts => "/courts/x",
            AdminResource::Bookings => "/bookings/x",
            AdminResource::Matches => "/matches/x",
            AdminResource::Reviews => "/reviews/x",
        };
        gw.transport()
            .mock_raw(HttpMethod::Delete, &url(path), 200, "deleted");
        let action = AdminAction::Delete {
            resource,
            id: "x".into(),
        };
        action.execute(&gw).await.unwrap();
        assert_eq!(gw.transport().requests_to(HttpMethod::Delete, &url(path)), 1);
    }
}

#[tokio::test]
async fn test_creating_a_booking_is_rejected_without_request() {
    let gw = gateway();
    let action = AdminAction::Create {
        resource: AdminResource::Bookings,
        body: json!({}),
    };
    assert!(action.execute(&gw).await.is_err());
    assert_eq!(gw.transport().request_count(), 0);
}

#[tokio::test]
async fn test_update_court_puts_member_path() {
    let gw = gateway();
    gw.transport()
        .mock_response(HttpMethod::Put, &url("/courts/c1"), 200, json!({"id": "c1"}));
    let action = AdminAction::Update {
        resource: AdminResource::Courts,
        id: "c1".into(),
        body: json!({"name": "Center"}),
    };
    action.execute(&gw).await.unwrap();
    assert_eq!(gw.transport().requests_to(HttpMethod::Put, &url("/courts/c1")), 1);
}

#[test]
fn test_failure_messages() {
    let save = AdminAction::Create {
        resource: AdminResource::Facilities,
        body: json!({}),
    };
    assert_eq!(save.failure_message(), "Failed to save facility. Please try again.");
    let delete = AdminAction::Delete {
        resource: AdminResource::Users,
        id: "u1".into(),
    };
    assert_eq!(delete.failure_message(), "Failed to delete user. Please try again.");
}

// =========================================================
// Rows
// =========================================================

#[test]
fn test_cell_display_rules() {
    let data = sample_data();

    let users = data.rows(AdminResource::Users, "");
    assert_eq!(users[0].cells, vec!["Asha Patel", "asha@example.com", "N/A", "USER", "04 Mar 2025"]);
    assert_eq!(users[1].cells[3], "OWNER");

    let courts = data.rows(AdminResource::Courts, "");
    assert_eq!(courts[0].cells[2], "₹600.00");
    assert_eq!(courts[0].cells[3], "Smash Arena");
    // 设施已不存在时展示原始 id
    assert_eq!(courts[1].cells[3], "gone");

    let bookings = data.rows(AdminResource::Bookings, "");
    assert_eq!(
        bookings[0].cells,
        vec!["Asha Patel", "c9", "14 Aug 2025", "10:00 - 11:30", "CONFIRMED"]
    );

    let matches = data.rows(AdminResource::Matches, "");
    assert_eq!(matches[0].cells[0], "Court One");
    assert_eq!(matches[0].cells[1], "N/A");
    assert_eq!(matches[0].cells[3], "3 / 4");

    let reviews = data.rows(AdminResource::Reviews, "");
    assert_eq!(reviews[0].cells[0], "N/A");
    assert_eq!(reviews[0].cells[1], "Green Dome");
    assert_eq!(reviews[0].cells[2], "4 / 5");
    assert_eq!(reviews[0].cells[3], "Great lighting and very clean ...");
}

#[test]
fn test_search_users_by_name_or_email() {
    let data = sample_data();
    let by_name = data.rows(AdminResource::Users, "KUMAR");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, "u2");

    let by_email = data.rows(AdminResource::Users, "example.com");
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].id, "u1");
}

#[test]
fn test_search_facilities_by_name_only() {
    let data = sample_data();
    assert_eq!(data.rows(AdminResource::Facilities, "dome").len(), 1);
    assert!(data.rows(AdminResource::Facilities, "pune").is_empty());
}

#[test]
fn test_search_ignored_for_other_tabs() {
    let data = sample_data();
    let mut panel = AdminPanel::default();
    panel.select_tab(AdminTab::Resource(AdminResource::Courts));
    panel.search = "zzz".into();
    assert_eq!(panel.visible_rows(&data).len(), 2);
}

// =========================================================
// Sorting
// =========================================================

#[test]
fn test_sort_toggle() {
    let first = toggle_sort(None, 2);
    assert_eq!(first, SortState { column: 2, ascending: true });
    let second = toggle_sort(Some(first), 2);
    assert!(!second.ascending);
    let third = toggle_sort(Some(second), 2);
    assert!(third.ascending);
    let other = toggle_sort(Some(second), 0);
    assert_eq!(other, SortState { column: 0, ascending: true });
}

#[test]
fn test_sort_prices_numerically() {
    let data = sample_data();
    let mut panel = AdminPanel::default();
    panel.select_tab(AdminTab::Resource(AdminResource::Courts));

    panel.click_header(2);
    let ids: Vec<String> = panel.visible_rows(&data).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["c1", "c2"]);

    panel.click_header(2);
    let ids: Vec<String> = panel.visible_rows(&data).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["c2", "c1"]);
}

// =========================================================
// Panel flow
// =========================================================

#[test]
fn test_create_form_only_for_editable_tabs() {
    let mut panel = AdminPanel::default();
    assert!(!panel.open_create());

    panel.select_tab(AdminTab::Resource(AdminResource::Bookings));
    assert!(!panel.open_create());
    assert_eq!(panel.modal, AdminModal::Closed);

    panel.select_tab(AdminTab::Resource(AdminResource::Facilities));
    assert!(panel.open_create());
}

#[test]
fn test_create_requires_required_fields() {
    let mut panel = AdminPanel::default();
    panel.select_tab(AdminTab::Resource(AdminResource::Courts));
    panel.open_create();
    panel.set_field("name", "Center".into());
    assert_eq!(panel.submit(), None);
    assert_eq!(panel.error.as_deref(), Some("Facility is required"));

    panel.set_field("facilityId", "f1".into());
    panel.set_field("pricePerHour", "450".into());
    let action = panel.submit().unwrap();
    assert_eq!(
        action,
        AdminAction::Create {
            resource: AdminResource::Courts,
            body: json!({
                "name": "Center",
                "pricePerHour": 450.0,
                "operatingHours": "09:00-18:00",
                "facilityId": "f1"
            }),
        }
    );
    assert!(panel.error.is_none());
}

#[test]
fn test_court_payload_keeps_explicit_operating_hours() {
    let values = BTreeMap::from([
        ("name", "Center".to_string()),
        ("operatingHours", "06:00-22:00".to_string()),
        ("facilityId", "f1".to_string()),
    ]);
    let body = build_payload(AdminResource::Courts, &values).unwrap();
    assert_eq!(body["operatingHours"], "06:00-22:00");

    let blank = BTreeMap::from([
        ("name", "Center".to_string()),
        ("operatingHours", "  ".to_string()),
        ("facilityId", "f1".to_string()),
    ]);
    let body = build_payload(AdminResource::Courts, &blank).unwrap();
    assert_eq!(body["operatingHours"], "09:00-18:00");

    let facility = BTreeMap::from([("name", "Arena".to_string())]);
    let body = build_payload(AdminResource::Facilities, &facility).unwrap();
    assert!(body.get("operatingHours").is_none());
}

#[test]
fn test_edit_prefills_from_row() {
    let data = sample_data();
    let mut panel = AdminPanel::default();
    panel.select_tab(AdminTab::Resource(AdminResource::Users));
    let rows = panel.visible_rows(&data);
    assert!(panel.open_edit(&rows[1]));
    panel.set_field("lastName", "Sharma".into());

    let Some(AdminAction::Update { id, body, .. }) = panel.submit() else {
        panic!("expected update");
    };
    assert_eq!(id, "u2");
    assert_eq!(body["firstName"], "Ravi");
    assert_eq!(body["lastName"], "Sharma");
    assert_eq!(body["role"], "OWNER");
}

#[test]
fn test_delete_goes_through_confirmation() {
    let data = sample_data();
    let mut panel = AdminPanel::default();
    panel.select_tab(AdminTab::Resource(AdminResource::Reviews));
    assert_eq!(panel.submit(), None);

    let rows = panel.visible_rows(&data);
    panel.request_delete(&rows[0]);
    assert!(matches!(panel.modal, AdminModal::ConfirmDelete { .. }));

    assert_eq!(
        panel.submit(),
        Some(AdminAction::Delete {
            resource: AdminResource::Reviews,
            id: "r1".into(),
        })
    );
}

#[test]
fn test_confirm_ignored_while_delete_in_flight() {
    let data = sample_data();
    let mut panel = AdminPanel::default();
    panel.select_tab(AdminTab::Resource(AdminResource::Reviews));
    let rows = panel.visible_rows(&data);
    panel.request_delete(&rows[0]);

    assert!(panel.submit().is_some());
    assert!(panel.in_flight);
    // 第二次点击确认
    assert_eq!(panel.submit(), None);

    panel.finish_action(false);
    assert!(!panel.in_flight);
    assert!(matches!(panel.modal, AdminModal::ConfirmDelete { .. }));
    assert!(panel.submit().is_some());

    panel.finish_action(true);
    assert_eq!(panel.modal, AdminModal::Closed);
    assert!(!panel.in_flight);
}

#[test]
fn test_switching_tabs_resets_panel() {
    let mut panel = AdminPanel::default();
    panel.select_tab(AdminTab::Resource(AdminResource::Users));
    panel.search = "asha".into();
    panel.click_header(1);
    panel.open_create();

    panel.select_tab(AdminTab::Resource(AdminResource::Facilities));
    assert!(panel.search.is_empty());
    assert!(panel.sort.is_none());
    assert_eq!(panel.modal, AdminModal::Closed);
}

// =========================================================
// Loading
// =========================================================

#[tokio::test]
async fn test_load_admin_data_all_or_nothing() {
    let gw = gateway();
    for path in ["/users", "/facilities", "/courts", "/bookings", "/matches"] {
        gw.transport()
            .mock_response(HttpMethod::Get, &url(path), 200, json!([]));
    }
    assert!(load_admin_data(&gw).await.is_err());

    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/reviews"),
        200,
        json!({"success": true, "data": [{"id": "r1", "rating": 5}]}),
    );
    let data = load_admin_data(&gw).await.unwrap();
    assert_eq!(data.len_of(AdminResource::Reviews), 1);
    assert_eq!(data.len_of(AdminResource::Users), 0);
}
