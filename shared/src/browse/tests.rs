use super::*;
use crate::request::{HttpMethod, MockTransport};
use serde_json::json;

const BASE: &str = "http://api.test/api/v1";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn court(id: &str, sport: &str, price: f64) -> Court {
    Court {
        id: id.into(),
        name: format!("Court {id}"),
        sport_type: sport.into(),
        price_per_hour: price,
        ..Default::default()
    }
}

fn listing(court: Court, address: Option<&str>) -> CourtListing {
    CourtListing {
        facility: address.map(|a| Facility {
            id: "f".into(),
            address: Some(a.into()),
            ..Default::default()
        }),
        court,
    }
}

fn sample() -> Vec<CourtListing> {
    let mut indoor = court("1", "Tennis", 400.0);
    indoor.venue_type = Some(VenueType::Indoor);
    indoor.rating = Some(4.5);
    let mut outdoor = court("2", "Badminton", 250.0);
    outdoor.venue_type = Some(VenueType::Outdoor);
    outdoor.rating = Some(3.0);
    let unrated = court("3", "tennis", 600.0);
    vec![
        listing(indoor, Some("12 MG Road, Pune")),
        listing(outdoor, Some("Baner Hills")),
        listing(unrated, None),
    ]
}

fn ids(items: &[&CourtListing]) -> Vec<String> {
    items.iter().map(|l| l.court.id.clone()).collect()
}

// =========================================================
// Filters
// =========================================================

#[test]
fn test_sport_filter_is_exact_and_idempotent() {
    let all = sample();
    let filter = CourtFilter {
        sport: Some("Tennis".into()),
        ..Default::default()
    };
    let once = apply_filter(&all, &filter);
    assert_eq!(ids(&once), vec!["1"]);

    let owned: Vec<CourtListing> = once.into_iter().cloned().collect();
    let twice = apply_filter(&owned, &filter);
    assert_eq!(ids(&twice), vec!["1"]);
}

#[test]
fn test_query_matches_name_or_address_case_insensitive() {
    let all = sample();
    let by_address = CourtFilter {
        query: "mg road".into(),
        ..Default::default()
    };
    assert_eq!(ids(&apply_filter(&all, &by_address)), vec!["1"]);

    let by_name = CourtFilter {
        query: "COURT 3".into(),
        ..Default::default()
    };
    assert_eq!(ids(&apply_filter(&all, &by_name)), vec!["3"]);
}

#[test]
fn test_price_bounds_are_inclusive() {
    let all = sample();
    let filter = CourtFilter {
        min_price: Some(250.0),
        max_price: Some(400.0),
        ..Default::default()
    };
    assert_eq!(ids(&apply_filter(&all, &filter)), vec!["1", "2"]);
}

#[test]
fn test_venue_type_membership() {
    let all = sample();
    let mut filter = CourtFilter::default();
    assert_eq!(apply_filter(&all, &filter).len(), 3);

    filter.toggle_venue_type(VenueType::Outdoor);
    assert_eq!(ids(&apply_filter(&all, &filter)), vec!["2"]);
    filter.toggle_venue_type(VenueType::Indoor);
    assert_eq!(ids(&apply_filter(&all, &filter)), vec!["1", "2"]);
    filter.toggle_venue_type(VenueType::Outdoor);
    assert_eq!(ids(&apply_filter(&all, &filter)), vec!["1"]);
}

#[test]
fn test_min_rating_excludes_unrated() {
    let all = sample();
    let filter = CourtFilter {
        min_rating: Some(3.0),
        ..Default::default()
    };
    assert_eq!(ids(&apply_filter(&all, &filter)), vec!["1", "2"]);
}

// =========================================================
// Pagination
// =========================================================

#[test]
fn test_paginate_slices() {
    let items: Vec<u32> = (1..=19).collect();
    assert_eq!(paginate(&items, 1, 8), &items[0..8]);
    assert_eq!(paginate(&items, 3, 8), &[17, 18, 19]);
    assert!(paginate(&items, 4, 8).is_empty());
    assert_eq!(page_count(19, 8), 3);
    assert_eq!(page_count(0, 8), 1);
}

#[test]
fn test_filter_change_resets_page() {
    let mut state = BrowserState::new(2);
    let many: Vec<CourtListing> = (0..7)
        .map(|i| listing(court(&i.to_string(), "Tennis", 100.0), None))
        .collect();
    state.finish_loading(Ok(many));
    assert_eq!(state.page_count(), 4);

    state.set_page(3);
    assert_eq!(state.page(), 3);
    assert!(state.page_items().len() <= 2);

    state.update_filter(|f| f.max_price = Some(500.0));
    assert_eq!(state.page(), 1);

    state.set_page(99);
    assert_eq!(state.page(), 4);
    state.next_page();
    assert_eq!(state.page(), 4);
    assert_eq!(state.page_items().len(), 1);

    state.set_filter(CourtFilter::default());
    assert_eq!(state.page(), 1);
    state.prev_page();
    assert_eq!(state.page(), 1);
}

#[test]
fn test_load_failure_leaves_empty_listing() {
    let mut state = BrowserState::default();
    assert!(state.is_loading());
    state.finish_loading(Err(crate::ClientError::network("down")));
    assert!(!state.is_loading());
    assert_eq!(state.total(), 0);
    assert!(state.page_items().is_empty());
    assert_eq!(state.page_count(), 1);
}

// =========================================================
// Loading
// =========================================================

#[tokio::test]
async fn test_load_listings_fetches_each_facility_once() {
    let gw = ApiGateway::new(BASE, MockTransport::new());
    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/courts"),
        200,
        json!([
            {"id": "c1", "name": "A", "facilityId": "f1"},
            {"id": "c2", "name": "B", "facilityId": "f2"},
            {"id": "c3", "name": "C", "facilityId": "f1"},
            {"id": "c4", "name": "D", "facilityId": "f1"},
            {"id": "c5", "name": "E"}
        ]),
    );
    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/facilities/f1"),
        200,
        json!({"id": "f1", "name": "Arena", "address": "MG Road"}),
    );
    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/facilities/f2"),
        200,
        json!({"id": "f2", "name": "Dome"}),
    );

    let listings = load_listings(&gw).await.unwrap();
    assert_eq!(listings.len(), 5);
    assert_eq!(gw.transport().requests_to(HttpMethod::Get, &url("/facilities/f1")), 1);
    assert_eq!(gw.transport().requests_to(HttpMethod::Get, &url("/facilities/f2")), 1);
    assert_eq!(gw.transport().request_count(), 3);

    assert_eq!(listings[2].address(), "MG Road");
    assert!(listings[4].facility.is_none());
    assert_eq!(listings[4].location(), "N/A");
}

#[tokio::test]
async fn test_load_listings_tolerates_null_court_fields() {
    let gw = ApiGateway::new(BASE, MockTransport::new());
    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/courts"),
        200,
        json!([
            {"id": "c1", "name": "Centre", "sportType": "Tennis", "pricePerHour": 400},
            {"id": "c2", "name": "AdminMade", "sportType": null, "pricePerHour": null,
             "operatingHours": null, "bookings": null}
        ]),
    );

    let listings = load_listings(&gw).await.unwrap();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[1].court.name, "AdminMade");
    assert_eq!(listings[1].court.price_per_hour, 0.0);
    assert!(listings[1].court.operating_hours.is_empty());

    let mut state = BrowserState::new(8);
    state.finish_loading(Ok(listings));
    assert_eq!(state.total(), 2);
}

#[tokio::test]
async fn test_load_listings_fails_on_facility_error() {
    let gw = ApiGateway::new(BASE, MockTransport::new());
    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/courts"),
        200,
        json!([{"id": "c1", "facilityId": "gone"}]),
    );

    assert!(load_listings(&gw).await.is_err());
}

#[tokio::test]
async fn test_court_detail_with_reviews() {
    let gw = ApiGateway::new(BASE, MockTransport::new());
    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/courts/c1"),
        200,
        json!({"id": "c1", "name": "A", "pricePerHour": 600, "facilityId": "f1"}),
    );
    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/facilities/f1"),
        200,
        json!({"id": "f1", "name": "Arena"}),
    );
    gw.transport().mock_response(
        HttpMethod::Get,
        &url("/reviews/facility/f1"),
        200,
        json!([{"id": "r1", "rating": 4}, {"id": "r2", "rating": 5}]),
    );

    let detail = load_court_detail(&gw, "c1").await.unwrap();
    assert_eq!(detail.court.price_per_hour, 600.0);
    assert_eq!(detail.facility.as_ref().unwrap().name, "Arena");
    assert_eq!(format_rating(detail.average_rating()), "4.5");
}

#[test]
fn test_average_rating_empty() {
    assert_eq!(format_rating(average_rating(&[])), "0.0");
}
