//! 后台管理
//!
//! 资源标签是封闭枚举，每个标签对应一张 `{create?, update?, delete}` 操作表。
//! 删除必须先经过确认步骤。

use crate::date::display_created_at;
use crate::error::ClientResult;
use crate::gateway::ApiGateway;
use crate::protocol::Resource;
use crate::request::HttpTransport;
use crate::validate::DEFAULT_OPERATING_HOURS;
use crate::{Booking, Court, Facility, Match, Review, User, UserRole};
use futures::future::LocalBoxFuture;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[cfg(test)]
mod tests;

// =========================================================
// 标签与资源 (Tabs & Resources)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminResource {
    Users,
    Facilities,
    Courts,
    Bookings,
    Matches,
    Reviews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdminTab {
    #[default]
    Dashboard,
    Resource(AdminResource),
}

impl AdminTab {
    pub const ALL: [AdminTab; 7] = [
        AdminTab::Dashboard,
        AdminTab::Resource(AdminResource::Users),
        AdminTab::Resource(AdminResource::Facilities),
        AdminTab::Resource(AdminResource::Courts),
        AdminTab::Resource(AdminResource::Bookings),
        AdminTab::Resource(AdminResource::Matches),
        AdminTab::Resource(AdminResource::Reviews),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminTab::Dashboard => "Dashboard",
            AdminTab::Resource(r) => r.label(),
        }
    }
}

/// 表单字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Role,
    /// 从已加载的设施中选择
    Facility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
    }
}

const USER_FIELDS: [FieldSpec; 5] = [
    field("firstName", "First Name", FieldKind::Text, true),
    field("lastName", "Last Name", FieldKind::Text, true),
    field("email", "Email", FieldKind::Email, true),
    field("phoneNumber", "Phone", FieldKind::Text, false),
    field("role", "Role", FieldKind::Role, false),
];

const FACILITY_FIELDS: [FieldSpec; 5] = [
    field("name", "Facility Name", FieldKind::Text, true),
    field("description", "Description", FieldKind::Text, false),
    field("address", "Address", FieldKind::Text, false),
    field("city", "City", FieldKind::Text, false),
    field("state", "State", FieldKind::Text, false),
];

const COURT_FIELDS: [FieldSpec; 5] = [
    field("name", "Court Name", FieldKind::Text, true),
    field("sportType", "Sport Type", FieldKind::Text, false),
    field("pricePerHour", "Price Per Hour", FieldKind::Number, false),
    field("operatingHours", "Operating Hours", FieldKind::Text, false),
    field("facilityId", "Facility", FieldKind::Facility, true),
];

impl AdminResource {
    pub const ALL: [AdminResource; 6] = [
        AdminResource::Users,
        AdminResource::Facilities,
        AdminResource::Courts,
        AdminResource::Bookings,
        AdminResource::Matches,
        AdminResource::Reviews,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminResource::Users => "Users",
            AdminResource::Facilities => "Facilities",
            AdminResource::Courts => "Courts",
            AdminResource::Bookings => "Bookings",
            AdminResource::Matches => "Matches",
            AdminResource::Reviews => "Reviews",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            AdminResource::Users => "user",
            AdminResource::Facilities => "facility",
            AdminResource::Courts => "court",
            AdminResource::Bookings => "booking",
            AdminResource::Matches => "match",
            AdminResource::Reviews => "review",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            AdminResource::Users => &["Name", "Email", "Phone", "Role", "Created At"],
            AdminResource::Facilities => &["Name", "Address", "City", "State"],
            AdminResource::Courts => &["Name", "Sport", "Price/Hour", "Facility"],
            AdminResource::Bookings => &["User", "Court", "Date", "Time", "Status"],
            AdminResource::Matches => &["Court", "Date", "Time", "Players", "Status"],
            AdminResource::Reviews => &["User", "Facility", "Rating", "Comment", "Date"],
        }
    }

    /// 可编辑资源的表单字段，只读资源为空
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            AdminResource::Users => &USER_FIELDS,
            AdminResource::Facilities => &FACILITY_FIELDS,
            AdminResource::Courts => &COURT_FIELDS,
            AdminResource::Bookings | AdminResource::Matches | AdminResource::Reviews => &[],
        }
    }

    /// 只有用户与设施支持搜索
    pub fn searchable(&self) -> bool {
        matches!(self, AdminResource::Users | AdminResource::Facilities)
    }

    /// 该资源的操作表
    pub fn ops<T: HttpTransport + 'static>(&self) -> CrudOps<T> {
        match self {
            AdminResource::Users => CrudOps::editable::<User>(),
            AdminResource::Facilities => CrudOps::editable::<Facility>(),
            AdminResource::Courts => CrudOps::editable::<Court>(),
            AdminResource::Bookings => CrudOps::delete_only::<Booking>(),
            AdminResource::Matches => CrudOps::delete_only::<Match>(),
            AdminResource::Reviews => CrudOps::delete_only::<Review>(),
        }
    }
}

// =========================================================
// 操作表 (Operation Table)
// =========================================================

pub type CreateFn<T> = for<'a> fn(&'a ApiGateway<T>, &'a Value) -> LocalBoxFuture<'a, ClientResult<Value>>;
pub type UpdateFn<T> =
    for<'a> fn(&'a ApiGateway<T>, &'a str, &'a Value) -> LocalBoxFuture<'a, ClientResult<Value>>;
pub type DeleteFn<T> = for<'a> fn(&'a ApiGateway<T>, &'a str) -> LocalBoxFuture<'a, ClientResult<()>>;

pub struct CrudOps<T: 'static> {
    pub create: Option<CreateFn<T>>,
    pub update: Option<UpdateFn<T>>,
    pub delete: DeleteFn<T>,
}

fn create_in<'a, R: Resource + 'static, T: HttpTransport + 'static>(
    gateway: &'a ApiGateway<T>,
    body: &'a Value,
) -> LocalBoxFuture<'a, ClientResult<Value>> {
    Box::pin(gateway.create::<R, Value>(body))
}

fn update_in<'a, R: Resource + 'static, T: HttpTransport + 'static>(
    gateway: &'a ApiGateway<T>,
    id: &'a str,
    body: &'a Value,
) -> LocalBoxFuture<'a, ClientResult<Value>> {
    Box::pin(gateway.update::<R, Value>(id, body))
}

fn delete_in<'a, R: Resource + 'static, T: HttpTransport + 'static>(
    gateway: &'a ApiGateway<T>,
    id: &'a str,
) -> LocalBoxFuture<'a, ClientResult<()>> {
    Box::pin(gateway.remove::<R>(id))
}

impl<T: HttpTransport + 'static> CrudOps<T> {
    fn editable<R: Resource + 'static>() -> Self {
        Self {
            create: Some(create_in::<R, T> as CreateFn<T>),
            update: Some(update_in::<R, T> as UpdateFn<T>),
            delete: delete_in::<R, T>,
        }
    }

    fn delete_only<R: Resource + 'static>() -> Self {
        Self {
            create: None,
            update: None,
            delete: delete_in::<R, T>,
        }
    }
}

// =========================================================
// 数据与表格行 (Data & Rows)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminData {
    pub users: Vec<User>,
    pub facilities: Vec<Facility>,
    pub courts: Vec<Court>,
    pub bookings: Vec<Booking>,
    pub matches: Vec<Match>,
    pub reviews: Vec<Review>,
}

/// 六个集合并发加载，任一失败则整体失败
pub async fn load_admin_data<T: HttpTransport>(gateway: &ApiGateway<T>) -> ClientResult<AdminData> {
    let (users, facilities, courts, bookings, matches, reviews) = futures::try_join!(
        gateway.list::<User>(),
        gateway.list::<Facility>(),
        gateway.list::<Court>(),
        gateway.list::<Booking>(),
        gateway.list::<Match>(),
        gateway.list::<Review>(),
    )?;
    Ok(AdminData {
        users,
        facilities,
        courts,
        bookings,
        matches,
        reviews,
    })
}

const NA: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct AdminRow {
    pub id: String,
    pub cells: Vec<String>,
    /// 编辑表单的初始值
    pub values: BTreeMap<&'static str, String>,
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NA.to_string(),
    }
}

fn truncate_comment(comment: &str) -> String {
    if comment.is_empty() {
        return NA.to_string();
    }
    let head: String = comment.chars().take(30).collect();
    if comment.chars().count() > 30 {
        format!("{head}...")
    } else {
        head
    }
}

fn time_range(start: Option<crate::ClockTime>, end: Option<crate::ClockTime>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{} - {}", s.hhmm(), e.hhmm()),
        _ => NA.to_string(),
    }
}

fn date_cell(created_at: Option<&str>, date: Option<crate::BookingDate>) -> String {
    match (created_at, date) {
        (Some(raw), _) if !raw.is_empty() => display_created_at(raw),
        (_, Some(d)) => d.display(),
        _ => NA.to_string(),
    }
}

impl AdminData {
    fn user_name(&self, id: Option<&str>) -> String {
        let Some(id) = id else {
            return NA.to_string();
        };
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(User::full_name)
            .unwrap_or_else(|| id.to_string())
    }

    fn court_name(&self, id: Option<&str>) -> String {
        let Some(id) = id else {
            return NA.to_string();
        };
        self.courts
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn facility_name(&self, id: Option<&str>) -> String {
        let Some(id) = id else {
            return NA.to_string();
        };
        self.facilities
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len_of(&self, resource: AdminResource) -> usize {
        match resource {
            AdminResource::Users => self.users.len(),
            AdminResource::Facilities => self.facilities.len(),
            AdminResource::Courts => self.courts.len(),
            AdminResource::Bookings => self.bookings.len(),
            AdminResource::Matches => self.matches.len(),
            AdminResource::Reviews => self.reviews.len(),
        }
    }

    /// 构造表格行并应用搜索（大小写不敏感）
    pub fn rows(&self, resource: AdminResource, search: &str) -> Vec<AdminRow> {
        let needle = search.trim().to_lowercase();
        match resource {
            AdminResource::Users => self
                .users
                .iter()
                .filter(|u| {
                    needle.is_empty()
                        || u.full_name().to_lowercase().contains(&needle)
                        || u.email.to_lowercase().contains(&needle)
                })
                .map(|u| AdminRow {
                    id: u.id.clone(),
                    cells: vec![
                        or_na(Some(u.full_name().as_str())),
                        or_na(Some(u.email.as_str())),
                        or_na(u.phone_number.as_deref()),
                        u.role.as_str().to_string(),
                        date_cell(u.created_at.as_deref(), None),
                    ],
                    values: BTreeMap::from([
                        ("firstName", u.first_name.clone()),
                        ("lastName", u.last_name.clone()),
                        ("email", u.email.clone()),
                        ("phoneNumber", u.phone_number.clone().unwrap_or_default()),
                        ("role", u.role.as_str().to_string()),
                    ]),
                })
                .collect(),
            AdminResource::Facilities => self
                .facilities
                .iter()
                .filter(|f| needle.is_empty() || f.name.to_lowercase().contains(&needle))
                .map(|f| AdminRow {
                    id: f.id.clone(),
                    cells: vec![
                        or_na(Some(f.name.as_str())),
                        or_na(f.address.as_deref()),
                        or_na(f.city.as_deref()),
                        or_na(f.state.as_deref()),
                    ],
                    values: BTreeMap::from([
                        ("name", f.name.clone()),
                        ("description", f.description.clone().unwrap_or_default()),
                        ("address", f.address.clone().unwrap_or_default()),
                        ("city", f.city.clone().unwrap_or_default()),
                        ("state", f.state.clone().unwrap_or_default()),
                    ]),
                })
                .collect(),
            AdminResource::Courts => self
                .courts
                .iter()
                .map(|c| AdminRow {
                    id: c.id.clone(),
                    cells: vec![
                        or_na(Some(c.name.as_str())),
                        or_na(Some(c.sport_type.as_str())),
                        format!("₹{:.2}", c.price_per_hour),
                        self.facility_name(c.facility_id.as_deref()),
                    ],
                    values: BTreeMap::from([
                        ("name", c.name.clone()),
                        ("sportType", c.sport_type.clone()),
                        ("pricePerHour", c.price_per_hour.to_string()),
                        ("operatingHours", c.operating_hours.clone()),
                        ("facilityId", c.facility_id.clone().unwrap_or_default()),
                    ]),
                })
                .collect(),
            AdminResource::Bookings => self
                .bookings
                .iter()
                .map(|b| AdminRow {
                    id: b.id.clone(),
                    cells: vec![
                        self.user_name(b.user_id.as_deref()),
                        self.court_name(b.court_id.as_deref()),
                        date_cell(None, b.date),
                        time_range(b.start_time, b.end_time),
                        or_na(Some(b.status.as_str())),
                    ],
                    values: BTreeMap::new(),
                })
                .collect(),
            AdminResource::Matches => self
                .matches
                .iter()
                .map(|m| AdminRow {
                    id: m.id.clone(),
                    cells: vec![
                        self.court_name(m.court_id.as_deref()),
                        date_cell(None, m.date),
                        time_range(m.start_time, m.end_time),
                        format!("{} / {}", m.current_players, m.max_players),
                        or_na(Some(m.status.as_str())),
                    ],
                    values: BTreeMap::new(),
                })
                .collect(),
            AdminResource::Reviews => self
                .reviews
                .iter()
                .map(|r| AdminRow {
                    id: r.id.clone(),
                    cells: vec![
                        self.user_name(r.user_id.as_deref()),
                        self.facility_name(r.facility_id.as_deref()),
                        if r.rating > 0 {
                            format!("{} / 5", r.rating)
                        } else {
                            NA.to_string()
                        },
                        truncate_comment(&r.comment),
                        date_cell(r.created_at.as_deref(), None),
                    ],
                    values: BTreeMap::new(),
                })
                .collect(),
        }
    }

    /// 设施下拉框选项 (id, name)
    pub fn facility_options(&self) -> Vec<(String, String)> {
        self.facilities
            .iter()
            .map(|f| (f.id.clone(), f.name.clone()))
            .collect()
    }
}

// =========================================================
// 排序 (Sorting)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub ascending: bool,
}

/// 点击表头：同一列升序时切换为降序，其余情况按该列升序
pub fn toggle_sort(current: Option<SortState>, column: usize) -> SortState {
    match current {
        Some(s) if s.column == column && s.ascending => SortState {
            column,
            ascending: false,
        },
        _ => SortState {
            column,
            ascending: true,
        },
    }
}

fn numeric_key(cell: &str) -> Option<f64> {
    cell.trim_start_matches('₹').replace(',', "").parse().ok()
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

pub fn sort_rows(rows: &mut [AdminRow], sort: SortState) {
    rows.sort_by(|a, b| {
        let ord = match (a.cells.get(sort.column), b.cells.get(sort.column)) {
            (Some(x), Some(y)) => compare_cells(x, y),
            _ => Ordering::Equal,
        };
        if sort.ascending { ord } else { ord.reverse() }
    });
}

// =========================================================
// 表单请求体 (Form Payload)
// =========================================================

/// 按字段定义把表单值转成 JSON，数字字段转为数值，空值省略；场地的营业时间留空时取默认值
pub fn build_payload(resource: AdminResource, values: &BTreeMap<&'static str, String>) -> Result<Value, String> {
    let mut body = Map::new();
    for spec in resource.fields() {
        let raw = values.get(spec.name).map(|v| v.trim()).unwrap_or("");
        if raw.is_empty() {
            if spec.required {
                return Err(format!("{} is required", spec.label));
            }
            continue;
        }
        let value = match spec.kind {
            FieldKind::Number => raw
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("{} must be a number", spec.label))?,
            FieldKind::Role => {
                let role = match raw.to_ascii_uppercase().as_str() {
                    "OWNER" => UserRole::Owner,
                    "ADMIN" => UserRole::Admin,
                    _ => UserRole::User,
                };
                Value::String(role.as_str().to_string())
            }
            FieldKind::Text | FieldKind::Email | FieldKind::Facility => Value::String(raw.to_string()),
        };
        body.insert(spec.name.to_string(), value);
    }
    if resource == AdminResource::Courts && !body.contains_key("operatingHours") {
        body.insert(
            "operatingHours".to_string(),
            Value::String(DEFAULT_OPERATING_HOURS.to_string()),
        );
    }
    Ok(Value::Object(body))
}

// =========================================================
// 面板状态 (Panel State)
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdminModal {
    #[default]
    Closed,
    Create {
        values: BTreeMap<&'static str, String>,
    },
    Edit {
        id: String,
        values: BTreeMap<&'static str, String>,
    },
    ConfirmDelete {
        id: String,
        label: String,
    },
}

/// 需要发出的写操作
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    Create { resource: AdminResource, body: Value },
    Update { resource: AdminResource, id: String, body: Value },
    Delete { resource: AdminResource, id: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminPanel {
    pub tab: AdminTab,
    pub search: String,
    pub sort: Option<SortState>,
    pub modal: AdminModal,
    pub error: Option<String>,
    /// 写操作已发出、尚未返回
    pub in_flight: bool,
}

impl AdminPanel {
    pub fn select_tab(&mut self, tab: AdminTab) {
        if self.tab != tab {
            *self = AdminPanel {
                tab,
                in_flight: self.in_flight,
                ..Default::default()
            };
        }
    }

    pub fn resource(&self) -> Option<AdminResource> {
        match self.tab {
            AdminTab::Resource(r) => Some(r),
            AdminTab::Dashboard => None,
        }
    }

    pub fn click_header(&mut self, column: usize) {
        self.sort = Some(toggle_sort(self.sort, column));
    }

    pub fn visible_rows(&self, data: &AdminData) -> Vec<AdminRow> {
        let Some(resource) = self.resource() else {
            return Vec::new();
        };
        let search = if resource.searchable() { self.search.as_str() } else { "" };
        let mut rows = data.rows(resource, search);
        if let Some(sort) = self.sort {
            sort_rows(&mut rows, sort);
        }
        rows
    }

    /// 只有支持创建的资源能打开新建表单
    pub fn open_create(&mut self) -> bool {
        let allowed = self
            .resource()
            .is_some_and(|r| !r.fields().is_empty());
        if allowed {
            self.modal = AdminModal::Create {
                values: BTreeMap::new(),
            };
        }
        allowed
    }

    pub fn open_edit(&mut self, row: &AdminRow) -> bool {
        let allowed = self
            .resource()
            .is_some_and(|r| !r.fields().is_empty());
        if allowed {
            self.modal = AdminModal::Edit {
                id: row.id.clone(),
                values: row.values.clone(),
            };
        }
        allowed
    }

    pub fn set_field(&mut self, name: &'static str, value: String) {
        if let AdminModal::Create { values } | AdminModal::Edit { values, .. } = &mut self.modal {
            values.insert(name, value);
        }
    }

    pub fn request_delete(&mut self, row: &AdminRow) {
        if self.resource().is_some() {
            self.modal = AdminModal::ConfirmDelete {
                id: row.id.clone(),
                label: row.cells.first().cloned().unwrap_or_else(|| row.id.clone()),
            };
        }
    }

    /// 提交当前弹窗，返回需要执行的写操作；上一个写操作未返回时忽略
    pub fn submit(&mut self) -> Option<AdminAction> {
        if self.in_flight {
            return None;
        }
        let resource = self.resource()?;
        let action = match &self.modal {
            AdminModal::Closed => return None,
            AdminModal::Create { values } => match build_payload(resource, values) {
                Ok(body) => AdminAction::Create { resource, body },
                Err(message) => {
                    self.error = Some(message);
                    return None;
                }
            },
            AdminModal::Edit { id, values } => match build_payload(resource, values) {
                Ok(body) => AdminAction::Update {
                    resource,
                    id: id.clone(),
                    body,
                },
                Err(message) => {
                    self.error = Some(message);
                    return None;
                }
            },
            AdminModal::ConfirmDelete { id, .. } => AdminAction::Delete {
                resource,
                id: id.clone(),
            },
        };
        self.error = None;
        self.in_flight = true;
        Some(action)
    }

    /// 写操作返回；成功时关闭弹窗，失败时保留弹窗以便重试
    pub fn finish_action(&mut self, succeeded: bool) {
        self.in_flight = false;
        if succeeded {
            self.close_modal();
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = AdminModal::Closed;
    }
}

impl AdminAction {
    pub fn resource(&self) -> AdminResource {
        match self {
            AdminAction::Create { resource, .. }
            | AdminAction::Update { resource, .. }
            | AdminAction::Delete { resource, .. } => *resource,
        }
    }

    /// 通过操作表执行；资源不支持该操作时不会发请求
    pub async fn execute<T: HttpTransport + 'static>(&self, gateway: &ApiGateway<T>) -> ClientResult<()> {
        let ops = self.resource().ops::<T>();
        match self {
            AdminAction::Create { resource, body } => match ops.create {
                Some(create) => create(gateway, body).await.map(|_| ()),
                None => Err(unsupported(*resource, "create")),
            },
            AdminAction::Update { resource, id, body } => match ops.update {
                Some(update) => update(gateway, id, body).await.map(|_| ()),
                None => Err(unsupported(*resource, "update")),
            },
            AdminAction::Delete { id, .. } => (ops.delete)(gateway, id).await,
        }
    }

    /// 失败时展示的文案
    pub fn failure_message(&self) -> String {
        let verb = match self {
            AdminAction::Create { .. } | AdminAction::Update { .. } => "save",
            AdminAction::Delete { .. } => "delete",
        };
        format!(
            "Failed to {verb} {}. Please try again.",
            self.resource().singular()
        )
    }
}

fn unsupported(resource: AdminResource, op: &str) -> crate::ClientError {
    crate::ClientError::validation(format!("{} cannot {op}", resource.label()))
}
