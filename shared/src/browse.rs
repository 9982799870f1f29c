//! 场地浏览
//!
//! 加载全部场地及其所属设施（每个设施只请求一次），在客户端完成过滤与分页。

use crate::error::ClientResult;
use crate::gateway::ApiGateway;
use crate::request::HttpTransport;
use crate::{Court, Facility, Review, VenueType};
use std::collections::{BTreeSet, HashMap, HashSet};

#[cfg(test)]
mod tests;

pub const DEFAULT_PAGE_SIZE: usize = 8;

/// 列表中的一项：场地加上（可能缺失的）所属设施
#[derive(Debug, Clone, PartialEq)]
pub struct CourtListing {
    pub court: Court,
    pub facility: Option<Facility>,
}

impl CourtListing {
    pub fn address(&self) -> &str {
        self.facility
            .as_ref()
            .and_then(|f| f.address.as_deref())
            .unwrap_or("")
    }

    /// 卡片上展示的位置：场地自带位置优先，其次设施地址
    pub fn location(&self) -> &str {
        match self.court.location.as_deref() {
            Some(loc) if !loc.is_empty() => loc,
            _ => match self.address() {
                "" => "N/A",
                address => address,
            },
        }
    }
}

// =========================================================
// 过滤 (Filtering)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourtFilter {
    /// 场地名或设施地址的子串，大小写不敏感
    pub query: String,
    /// 精确匹配，大小写敏感
    pub sport: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// 为空表示不限
    pub venue_types: BTreeSet<VenueType>,
    /// 没有评分的场地不满足任何评分下限
    pub min_rating: Option<f64>,
}

impl CourtFilter {
    pub fn matches(&self, listing: &CourtListing) -> bool {
        let court = &listing.court;

        let query = self.query.trim().to_lowercase();
        if !query.is_empty()
            && !court.name.to_lowercase().contains(&query)
            && !listing.address().to_lowercase().contains(&query)
        {
            return false;
        }

        if self.sport.as_ref().is_some_and(|s| court.sport_type != *s) {
            return false;
        }

        if self.min_price.is_some_and(|min| court.price_per_hour < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| court.price_per_hour > max) {
            return false;
        }

        if !self.venue_types.is_empty()
            && !court
                .venue_type
                .is_some_and(|v| self.venue_types.contains(&v))
        {
            return false;
        }

        if self
            .min_rating
            .is_some_and(|min| !court.rating.is_some_and(|r| r >= min))
        {
            return false;
        }

        true
    }

    pub fn toggle_venue_type(&mut self, venue_type: VenueType) {
        if !self.venue_types.remove(&venue_type) {
            self.venue_types.insert(venue_type);
        }
    }
}

/// 过滤结果总是从完整集合重新计算
pub fn apply_filter<'a>(listings: &'a [CourtListing], filter: &CourtFilter) -> Vec<&'a CourtListing> {
    listings.iter().filter(|l| filter.matches(l)).collect()
}

// =========================================================
// 分页 (Pagination)
// =========================================================

/// 页数至少为 1
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// 第 `page` 页（从 1 开始）的切片，越界时为空
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

// =========================================================
// 浏览器状态 (Browser State)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserState {
    listings: Vec<CourtListing>,
    filter: CourtFilter,
    page: usize,
    page_size: usize,
    loading: bool,
}

impl BrowserState {
    pub fn new(page_size: usize) -> Self {
        Self {
            listings: Vec::new(),
            filter: CourtFilter::default(),
            page: 1,
            page_size: page_size.max(1),
            loading: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter(&self) -> &CourtFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.listings.len()
    }

    /// 加载结果：失败时列表为空，加载结束
    pub fn finish_loading(&mut self, result: ClientResult<Vec<CourtListing>>) {
        self.listings = match result {
            Ok(listings) => listings,
            Err(e) => {
                tracing::error!(error = %e, "failed to load courts");
                Vec::new()
            }
        };
        self.page = 1;
        self.loading = false;
    }

    /// 任何过滤条件变化都回到第一页
    pub fn set_filter(&mut self, filter: CourtFilter) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn update_filter(&mut self, f: impl FnOnce(&mut CourtFilter)) {
        f(&mut self.filter);
        self.page = 1;
    }

    pub fn filtered(&self) -> Vec<&CourtListing> {
        apply_filter(&self.listings, &self.filter)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered().len(), self.page_size)
    }

    pub fn page_items(&self) -> Vec<CourtListing> {
        let filtered = self.filtered();
        paginate(&filtered, self.page, self.page_size)
            .iter()
            .map(|l| (*l).clone())
            .collect()
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

// =========================================================
// 加载 (Loading)
// =========================================================

/// 按首次出现顺序去重的设施 id
pub fn distinct_facility_ids(courts: &[Court]) -> Vec<String> {
    let mut seen = HashSet::new();
    courts
        .iter()
        .filter_map(|c| c.facility_id.as_deref())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// 拉取全部场地，再并发拉取每个不同的设施各一次
pub async fn load_listings<T: HttpTransport>(gateway: &ApiGateway<T>) -> ClientResult<Vec<CourtListing>> {
    let courts: Vec<Court> = gateway.list().await?;
    let ids = distinct_facility_ids(&courts);
    tracing::debug!(courts = courts.len(), facilities = ids.len(), "loading facilities");

    let facilities =
        futures::future::try_join_all(ids.iter().map(|id| gateway.fetch::<Facility>(id))).await?;
    let by_id: HashMap<String, Facility> = facilities
        .into_iter()
        .map(|f| (f.id.clone(), f))
        .collect();

    Ok(courts
        .into_iter()
        .map(|court| {
            let facility = court
                .facility_id
                .as_ref()
                .and_then(|id| by_id.get(id))
                .cloned();
            CourtListing { court, facility }
        })
        .collect())
}

// =========================================================
// 场地详情 (Court Detail)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CourtDetail {
    pub court: Court,
    pub facility: Option<Facility>,
    pub reviews: Vec<Review>,
}

impl CourtDetail {
    pub fn average_rating(&self) -> f64 {
        average_rating(&self.reviews)
    }
}

/// 场地 → 设施与评论（后两者并发）
pub async fn load_court_detail<T: HttpTransport>(
    gateway: &ApiGateway<T>,
    court_id: &str,
) -> ClientResult<CourtDetail> {
    let court: Court = gateway.fetch(court_id).await?;

    let Some(facility_id) = court.facility_id.clone().filter(|id| !id.is_empty()) else {
        return Ok(CourtDetail {
            court,
            facility: None,
            reviews: Vec::new(),
        });
    };

    let (facility, reviews) = futures::join!(
        gateway.fetch::<Facility>(&facility_id),
        gateway.reviews_for_facility(&facility_id)
    );
    let facility = facility?;
    let reviews = reviews.unwrap_or_else(|e| {
        tracing::warn!(error = %e, %facility_id, "failed to load reviews");
        Vec::new()
    });

    Ok(CourtDetail {
        court,
        facility: Some(facility),
        reviews,
    })
}

/// 算术平均，没有评论时为 0
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    f64::from(sum) / reviews.len() as f64
}

pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}
