use crate::error::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// 设置 JSON 请求体并补上 Content-Type
    pub fn with_json_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self.with_header("Content-Type", "application/json")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析响应体，空响应体按 `null` 处理
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(ClientError::from)
    }
}

/// 传输层：浏览器里是 fetch，测试里是内存 mock
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    /// 只有拿不到响应时才返回 `Err(Network)`，非 2xx 也是 `Ok`
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
pub struct MockTransport {
    // ((Method, URL), (Status, Response Body))
    responses: RefCell<HashMap<(HttpMethod, String), (u16, String)>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
    offline: std::cell::Cell<bool>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            offline: std::cell::Cell::new(false),
        }
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, &body.to_string());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert((method, url.to_string()), (status, body.to_string()));
    }

    /// 模拟断网：所有请求都拿不到响应
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests_to(&self, method: HttpMethod, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        if self.offline.get() {
            return Err(ClientError::network("connection refused"));
        }

        let responses = self.responses.borrow();
        match responses.get(&(req.method, req.url)) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
