//! 仪表盘统计
//!
//! 全部从已加载的 [`AdminData`] 计算，不额外请求。

use crate::admin::AdminData;
use crate::date::month_index;
use crate::{Booking, Court, Facility, User, price_for};
use std::collections::{BTreeMap, HashMap};

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_facilities: usize,
    pub active_courts: usize,
    pub total_bookings: usize,
    pub total_matches: usize,
    pub total_reviews: usize,
    pub total_revenue: f64,
    pub bookings_by_month: [u32; 12],
    pub user_growth: [u32; 12],
    /// (设施名, 收入)，按收入降序
    pub revenue_by_facility: Vec<(String, f64)>,
    /// (运动, 预订数)，按预订数降序
    pub bookings_by_sport: Vec<(String, u32)>,
}

impl DashboardStats {
    pub fn compute(data: &AdminData) -> Self {
        Self {
            total_users: data.users.len(),
            total_facilities: data.facilities.len(),
            active_courts: data.courts.len(),
            total_bookings: data.bookings.len(),
            total_matches: data.matches.len(),
            total_reviews: data.reviews.len(),
            total_revenue: total_revenue(&data.bookings, &data.courts),
            bookings_by_month: bookings_by_month(&data.bookings),
            user_growth: cumulative_user_growth(&data.users),
            revenue_by_facility: revenue_by_facility(&data.bookings, &data.courts, &data.facilities),
            bookings_by_sport: bookings_by_sport(&data.bookings, &data.courts),
        }
    }
}

fn courts_by_id(courts: &[Court]) -> HashMap<&str, &Court> {
    courts.iter().map(|c| (c.id.as_str(), c)).collect()
}

fn court_of<'a>(booking: &Booking, courts: &HashMap<&str, &'a Court>) -> Option<&'a Court> {
    booking
        .court_id
        .as_deref()
        .and_then(|id| courts.get(id).copied())
}

/// 单笔预订收入，场地未知时为 `None`
pub fn booking_revenue(booking: &Booking, court: Option<&Court>) -> Option<f64> {
    court.map(|c| price_for(c.price_per_hour, booking.duration))
}

/// 只统计场地已知的预订
pub fn total_revenue(bookings: &[Booking], courts: &[Court]) -> f64 {
    let by_id = courts_by_id(courts);
    bookings
        .iter()
        .filter_map(|b| booking_revenue(b, court_of(b, &by_id)))
        .sum()
}

/// 按创建月份分桶，无法解析的时间跳过
pub fn bookings_by_month(bookings: &[Booking]) -> [u32; 12] {
    let mut buckets = [0u32; 12];
    for month in bookings
        .iter()
        .filter_map(|b| b.created_at.as_deref().and_then(month_index))
    {
        buckets[month] += 1;
    }
    buckets
}

/// 按注册月份累计的用户数
pub fn cumulative_user_growth(users: &[User]) -> [u32; 12] {
    let mut buckets = [0u32; 12];
    for month in users
        .iter()
        .filter_map(|u| u.created_at.as_deref().and_then(month_index))
    {
        buckets[month] += 1;
    }
    let mut running = 0;
    for bucket in buckets.iter_mut() {
        running += *bucket;
        *bucket = running;
    }
    buckets
}

/// 只展示仍存在的设施
pub fn revenue_by_facility(bookings: &[Booking], courts: &[Court], facilities: &[Facility]) -> Vec<(String, f64)> {
    let by_id = courts_by_id(courts);
    let mut per_facility: HashMap<&str, f64> = HashMap::new();
    for booking in bookings {
        let Some(court) = court_of(booking, &by_id) else {
            continue;
        };
        let Some(facility_id) = court.facility_id.as_deref() else {
            continue;
        };
        *per_facility.entry(facility_id).or_default() += price_for(court.price_per_hour, booking.duration);
    }

    let mut rows: Vec<(String, f64)> = facilities
        .iter()
        .filter_map(|f| per_facility.get(f.id.as_str()).map(|r| (f.name.clone(), *r)))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// 每种运动的预订数，场地未知或运动为空时跳过
pub fn bookings_by_sport(bookings: &[Booking], courts: &[Court]) -> Vec<(String, u32)> {
    let by_id = courts_by_id(courts);
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for court in bookings.iter().filter_map(|b| court_of(b, &by_id)) {
        if !court.sport_type.is_empty() {
            *counts.entry(court.sport_type.as_str()).or_default() += 1;
        }
    }
    let mut rows: Vec<(String, u32)> = counts
        .into_iter()
        .map(|(sport, n)| (sport.to_string(), n))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DurationMins;

    fn court(id: &str, facility: &str, sport: &str, price: f64) -> Court {
        Court {
            id: id.into(),
            facility_id: Some(facility.into()),
            sport_type: sport.into(),
            price_per_hour: price,
            ..Default::default()
        }
    }

    fn booking(court_id: &str, minutes: u32, created_at: &str) -> Booking {
        Booking {
            id: format!("b-{court_id}-{minutes}"),
            user_id: None,
            court_id: Some(court_id.into()),
            date: None,
            start_time: None,
            end_time: None,
            duration: DurationMins::from_minutes(minutes),
            status: "CONFIRMED".into(),
            payment_status: "PAID".into(),
            created_at: Some(created_at.into()),
        }
    }

    fn user(created_at: &str) -> User {
        User {
            id: created_at.into(),
            created_at: Some(created_at.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_total_revenue_skips_unknown_courts() {
        let courts = vec![court("c1", "f1", "Tennis", 600.0)];
        let bookings = vec![
            booking("c1", 90, "2025-01-03T10:00:00Z"),
            booking("ghost", 60, "2025-01-03T10:00:00Z"),
        ];
        assert_eq!(total_revenue(&bookings, &courts), 900.0);
    }

    #[test]
    fn test_bookings_by_month_buckets() {
        let bookings = vec![
            booking("c1", 60, "2025-01-03T10:00:00Z"),
            booking("c1", 60, "2025-01-28"),
            booking("c1", 60, "2025-12-01T08:30:00.123"),
            booking("c1", 60, "not a date"),
        ];
        let months = bookings_by_month(&bookings);
        assert_eq!(months[0], 2);
        assert_eq!(months[11], 1);
        assert_eq!(months.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_user_growth_is_cumulative() {
        let users = vec![user("2025-02-01"), user("2025-02-10"), user("2025-05-05")];
        let growth = cumulative_user_growth(&users);
        assert_eq!(growth[0], 0);
        assert_eq!(growth[1], 2);
        assert_eq!(growth[4], 3);
        assert_eq!(growth[11], 3);
    }

    #[test]
    fn test_revenue_by_facility_only_existing() {
        let facilities = vec![
            Facility {
                id: "f1".into(),
                name: "Arena".into(),
                ..Default::default()
            },
            Facility {
                id: "f2".into(),
                name: "Dome".into(),
                ..Default::default()
            },
        ];
        let courts = vec![
            court("c1", "f1", "Tennis", 600.0),
            court("c2", "f2", "Badminton", 300.0),
            court("c3", "removed", "Cricket", 1000.0),
        ];
        let bookings = vec![
            booking("c1", 60, "2025-01-01"),
            booking("c2", 120, "2025-01-01"),
            booking("c2", 60, "2025-01-01"),
            booking("c3", 60, "2025-01-01"),
        ];
        assert_eq!(
            revenue_by_facility(&bookings, &courts, &facilities),
            vec![("Dome".to_string(), 900.0), ("Arena".to_string(), 600.0)]
        );
    }

    #[test]
    fn test_sport_popularity() {
        let courts = vec![
            court("c1", "f1", "Tennis", 600.0),
            court("c2", "f1", "Badminton", 300.0),
        ];
        let bookings = vec![
            booking("c2", 60, "2025-01-01"),
            booking("c1", 60, "2025-01-01"),
            booking("c2", 30, "2025-01-01"),
            booking("unknown", 30, "2025-01-01"),
        ];
        assert_eq!(
            bookings_by_sport(&bookings, &courts),
            vec![("Badminton".to_string(), 2), ("Tennis".to_string(), 1)]
        );
    }

    #[test]
    fn test_compute_counts() {
        let data = AdminData {
            users: vec![user("2025-03-01")],
            courts: vec![court("c1", "f1", "Tennis", 600.0)],
            bookings: vec![booking("c1", 30, "2025-03-02")],
            ..Default::default()
        };
        let stats = DashboardStats::compute(&data);
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.active_courts, 1);
        assert_eq!(stats.total_bookings, 1);
        assert_eq!(stats.total_revenue, 300.0);
        assert_eq!(stats.bookings_by_month[2], 1);
        assert!(stats.revenue_by_facility.is_empty());
    }
}
