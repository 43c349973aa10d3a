use crate::error::{ClientError, ClientResult};
use crate::protocol::ApiRequest;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::rc::Rc;

// =========================================================
// 常量定义
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

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

/// 上传的文件内容
///
/// 浏览器端在提交前把 `File` 读成字节，保证共享层与 DOM 无关。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileBlob {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(FileBlob),
}

/// multipart 表单中的一个字段
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, blob: FileBlob) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File(blob),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
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

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        let text = serde_json::to_string(body)?;
        self.headers
            .insert(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string());
        self.body = Some(RequestBody::Json(text));
        Ok(self)
    }

    /// multipart 请求不设置 Content-Type，由浏览器生成 boundary
    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// JSON 请求体（测试与日志使用）
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            Some(RequestBody::Json(text)) => serde_json::from_str(text).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 空响应体（如 204）按 JSON `null` 处理
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        let text = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(text).map_err(ClientError::from)
    }

    /// 非 2xx 转换为 `ClientError::Status`
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.ok() {
            Ok(self)
        } else {
            Err(ClientError::from_status(self.status, &self.body))
        }
    }
}

/// HTTP 客户端特性
///
/// (?Send) 是因为浏览器环境下 fetch 的 Future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

// =========================================================
// 取消标记
// =========================================================

/// 与组件生命周期绑定的取消标记
///
/// 标记被置位后，尚未发出的请求直接失败，已发出的请求结果被丢弃。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =========================================================
// API 客户端
// =========================================================

/// 面向后端 REST 接口的客户端
///
/// 负责拼接 URL、附加 `Authorization: Bearer <token>`、
/// 把非 2xx 响应转换为错误。不做任何重试。
#[derive(Clone)]
pub struct ApiClient<C> {
    base_url: String,
    token: Option<String>,
    cancel: Option<CancelFlag>,
    client: C,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            cancel: None,
            client,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 相对路径拼接到 base_url；分页链接等绝对 URL 原样使用
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let req = HttpRequest::new(&self.url(path), method);
        match &self.token {
            Some(token) => req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)),
            None => req,
        }
    }

    fn check_cancelled(&self) -> ClientResult<()> {
        match &self.cancel {
            Some(flag) if flag.is_cancelled() => Err(ClientError::Cancelled),
            _ => Ok(()),
        }
    }

    /// 发送请求并检查状态码
    pub async fn execute(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        self.check_cancelled()?;
        log::debug!("{} {}", req.method.as_str(), req.url);

        let method = req.method;
        let url = req.url.clone();
        let response = self.client.send(req).await?;
        self.check_cancelled()?;

        response.error_for_status().inspect_err(|e| {
            log::warn!("{} {} failed: {}", method.as_str(), url, e);
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(HttpMethod::Get, path);
        self.execute(req).await?.json()
    }

    pub async fn send_json<B, T>(&self, method: HttpMethod, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(method, path).with_json(body)?;
        self.execute(req).await?.json()
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Post, path, body).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Put, path, body).await
    }

    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        parts: Vec<FormPart>,
    ) -> ClientResult<T> {
        let req = self.request(method, path).with_multipart(parts);
        self.execute(req).await?.json()
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> ClientResult<T> {
        self.send_multipart(HttpMethod::Post, path, parts).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> ClientResult<T> {
        self.send_multipart(HttpMethod::Put, path, parts).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let req = self.request(HttpMethod::Delete, path);
        self.execute(req).await.map(|_| ())
    }

    /// 调用一个类型化的接口定义
    pub async fn call<R: ApiRequest>(&self, request: &R) -> ClientResult<R::Response> {
        let path = request.path();
        let req = self.request(R::METHOD, &path);
        let req = match R::METHOD {
            HttpMethod::Get | HttpMethod::Delete => req,
            _ => req.with_json(request)?,
        };
        self.execute(req).await?.json()
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockHttpClient {
    // (Method, URL) -> (Status, Response Body)
    responses: Rc<RefCell<HashMap<(HttpMethod, String), (u16, String)>>>,
    // 记录发出的请求
    pub requests: Rc<RefCell<Vec<HttpRequest>>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        let text = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.responses
            .borrow_mut()
            .insert((method, url.to_string()), (status, text));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        let responses = self.responses.borrow();
        match responses.get(&(req.method, req.url.clone())) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: r#"{"detail":"Not found."}"#.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const BASE: &str = "http://127.0.0.1:8000";

    #[test]
    fn test_url_joins_relative_and_keeps_absolute() {
        let api = ApiClient::new("http://127.0.0.1:8000/", MockHttpClient::new());
        assert_eq!(api.url("/core/stocks/"), "http://127.0.0.1:8000/core/stocks/");
        assert_eq!(api.url("core/stocks/"), "http://127.0.0.1:8000/core/stocks/");
        assert_eq!(
            api.url("http://example.org/core/pharmaceuticals/list/?page=2"),
            "http://example.org/core/pharmaceuticals/list/?page=2"
        );
    }

    #[tokio::test]
    async fn test_bearer_header_is_attached() {
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Get, &format!("{}/core/staff/", BASE), 200, json!([]));
        let api = ApiClient::new(BASE, client.clone()).with_token(Some("abc".to_string()));

        let list: Vec<Value> = api.get_json("/core/staff/").await.unwrap();
        assert!(list.is_empty());

        let req = client.last_request().unwrap();
        assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Get, &format!("{}/core/staff/", BASE), 200, json!([]));
        let api = ApiClient::new(BASE, client.clone()).with_token(Some(String::new()));

        let _: Vec<Value> = api.get_json("/core/staff/").await.unwrap();
        assert!(client.last_request().unwrap().header(HEADER_AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_becomes_status_error() {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            &format!("{}/core/stocks/", BASE),
            400,
            json!({"price": ["A valid number is required."]}),
        );
        let api = ApiClient::new(BASE, client);

        let err = api
            .post_json::<_, Value>("/core/stocks/", &json!({"price": "x"}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Status {
                status: 400,
                message: "price: A valid number is required.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Delete,
            &format!("{}/core/stocks/3/", BASE),
            204,
            Value::Null,
        );
        let api = ApiClient::new(BASE, client);
        api.delete("/core/stocks/3/").await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_flag_blocks_request() {
        let client = MockHttpClient::new();
        let flag = CancelFlag::new();
        let api = ApiClient::new(BASE, client.clone()).with_cancel(flag.clone());

        flag.cancel();
        let err = api.get_json::<Value>("/core/stocks/").await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(client.request_count(), 0);
    }

    /// 在请求发出后、响应返回前置位取消标记的客户端
    struct CancelDuringSend {
        inner: MockHttpClient,
        flag: CancelFlag,
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for CancelDuringSend {
        async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
            let response = self.inner.send(req).await;
            self.flag.cancel();
            response
        }
    }

    #[tokio::test]
    async fn test_response_after_cancel_is_discarded() {
        let inner = MockHttpClient::new();
        inner.mock_response(HttpMethod::Get, &format!("{}/core/stocks/", BASE), 200, json!([{"id": 1}]));
        let flag = CancelFlag::new();
        let client = CancelDuringSend {
            inner: inner.clone(),
            flag: flag.clone(),
        };
        let api = ApiClient::new(BASE, client).with_cancel(flag);

        let err = api.get_json::<Value>("/core/stocks/").await.unwrap_err();
        assert_eq!(err, ClientError::Cancelled);
        assert_eq!(inner.request_count(), 1);
    }

    #[tokio::test]
    async fn test_multipart_has_no_json_content_type() {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            &format!("{}/common/upload-image/", BASE),
            201,
            json!({"id": 1}),
        );
        let api = ApiClient::new(BASE, client.clone());
        let blob = FileBlob {
            filename: "a.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };

        let _: Value = api
            .send_multipart(
                HttpMethod::Post,
                "/common/upload-image/",
                vec![FormPart::file("image", blob)],
            )
            .await
            .unwrap();

        let req = client.last_request().unwrap();
        assert!(req.header(HEADER_CONTENT_TYPE).is_none());
        assert!(matches!(req.body, Some(RequestBody::Multipart(ref p)) if p.len() == 1));
    }
}
