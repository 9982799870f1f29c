//! 个人账户视图：我的预订、我的评论、我的场地收到的预订

use crate::error::ClientResult;
use crate::gateway::ApiGateway;
use crate::request::HttpTransport;
use crate::{Booking, Facility, Review, User, price_for};

/// 场地所有者看到的一条预订，附带场地信息与费用
#[derive(Debug, Clone, PartialEq)]
pub struct CourtBooking {
    pub court_name: String,
    pub sport_type: String,
    pub price: f64,
    pub booking: Booking,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountOverview {
    pub bookings: Vec<Booking>,
    pub reviews: Vec<Review>,
    pub facilities: Vec<Facility>,
    pub court_bookings: Vec<CourtBooking>,
}

impl AccountOverview {
    pub fn from_user(user: User) -> Self {
        let court_bookings = user
            .owned_facilities
            .iter()
            .flat_map(|f| f.courts.iter())
            .flat_map(|court| {
                court.bookings.iter().map(move |b| CourtBooking {
                    court_name: court.name.clone(),
                    sport_type: court.sport_type.clone(),
                    price: price_for(court.price_per_hour, b.duration),
                    booking: b.clone(),
                })
            })
            .collect();

        Self {
            bookings: user.bookings,
            reviews: user.reviews,
            facilities: user.owned_facilities,
            court_bookings,
        }
    }
}

/// `GET /users/:id`，响应内嵌预订、评论和拥有的设施
pub async fn load_account<T: HttpTransport>(
    gateway: &ApiGateway<T>,
    user_id: &str,
) -> ClientResult<AccountOverview> {
    let user: User = gateway.fetch(user_id).await?;
    Ok(AccountOverview::from_user(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_owner_court_bookings_are_flattened_with_price() {
        let gw = ApiGateway::new("http://api.test/api/v1", MockTransport::new());
        gw.transport().mock_response(
            HttpMethod::Get,
            "http://api.test/api/v1/users/u1",
            200,
            json!({
                "id": "u1",
                "role": "OWNER",
                "bookings": [{"id": "b0", "duration": 60}],
                "reviews": [{"id": "r1", "rating": 5, "comment": "Nice"}],
                "ownedFacilities": [{
                    "id": "f1",
                    "name": "Arena",
                    "courts": [
                        {"id": "c1", "name": "One", "sportType": "Tennis", "pricePerHour": 600,
                         "bookings": [{"id": "b1", "duration": 90}, {"id": "b2", "duration": 30}]},
                        {"id": "c2", "name": "Two", "sportType": "Cricket", "pricePerHour": 1200}
                    ]
                }]
            }),
        );

        let overview = load_account(&gw, "u1").await.unwrap();
        assert_eq!(overview.bookings.len(), 1);
        assert_eq!(overview.reviews[0].comment, "Nice");
        assert_eq!(overview.facilities[0].courts.len(), 2);

        let prices: Vec<f64> = overview.court_bookings.iter().map(|b| b.price).collect();
        assert_eq!(prices, vec![900.0, 300.0]);
        assert_eq!(overview.court_bookings[0].court_name, "One");
    }

    #[test]
    fn test_plain_user_has_no_court_bookings() {
        let overview = AccountOverview::from_user(User {
            id: "u2".into(),
            ..Default::default()
        });
        assert!(overview.court_bookings.is_empty());
        assert!(overview.bookings.is_empty());
    }
}
