//! HTTP 传输层
//!
//! 使用 `web_sys::fetch` 实现 `HttpTransport`。请求总是携带 cookie
//! (`credentials: include`)，会话由服务端 cookie 维持。

use async_trait::async_trait;
use quickcourt_shared::ClientError;
use quickcourt_shared::request::{HttpRequest, HttpResponse, HttpTransport};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

fn js_error(context: &str, e: JsValue) -> ClientError {
    ClientError::network(format!("{context}: {e:?}"))
}

/// 浏览器 fetch 传输
#[derive(Debug, Clone, Copy, Default)]
pub struct WebTransport;

impl WebTransport {
    fn build(&self, req: &HttpRequest) -> Result<Request, ClientError> {
        let headers = Headers::new().map_err(|e| js_error("创建 Headers 失败", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_error("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        opts.set_credentials(RequestCredentials::Include);
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(|e| js_error("构建请求失败", e))
    }
}

#[async_trait(?Send)]
impl HttpTransport for WebTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ClientError> {
        let request = self.build(&req)?;

        let window = web_sys::window().ok_or_else(|| ClientError::network("无法获取 window 对象"))?;

        // fetch 只在网络层失败时 reject，HTTP 错误状态照常返回
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("网络错误", e))?;
        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ClientError::decode(format!("Response 类型转换失败: {e:?}")))?;

        let status = response.status();
        let text_promise = response
            .text()
            .map_err(|e| ClientError::decode(format!("读取响应体失败: {e:?}")))?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|e| ClientError::decode(format!("读取响应体失败: {e:?}")))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
