use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use thiserror::Error;

pub use carrent_shared::protocol::HttpMethod;

#[cfg(any(test, feature = "mock"))]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx 视为成功
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// 请求未能到达服务端（网络断开、CORS、请求构建失败等）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// HTTP 客户端特性 (Trait)
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下 JS 类型不是 Send 的
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 测试工具: MockHttpClient（test 或 `mock` feature）
// =========================================================

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
enum Canned {
    Respond(u16, String),
    Fail(String),
}

/// 记录下来的请求
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

#[cfg(any(test, feature = "mock"))]
impl RecordedRequest {
    pub fn body_json(&self) -> serde_json::Value {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(any(test, feature = "mock"))]
pub struct MockHttpClient {
    // ("METHOD URL", 预设响应)
    responses: RefCell<HashMap<String, Canned>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method, url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), Canned::Respond(status, body.to_string()));
    }

    pub fn mock_transport_error(&self, method: HttpMethod, url: &str, message: &str) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), Canned::Fail(message.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    /// 以 "METHOD URL" 形式返回请求记录，便于断言调用顺序
    pub fn request_lines(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| Self::key(r.method, &r.url))
            .collect()
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(RecordedRequest {
            method: req.method,
            url: req.url.clone(),
            headers: req.headers.clone(),
            body: req.body.clone(),
        });

        let responses = self.responses.borrow();
        match responses.get(&Self::key(req.method, &req.url)) {
            Some(Canned::Respond(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Canned::Fail(message)) => Err(TransportError(message.clone())),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let redirect = HttpResponse {
            status: 304,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }

    #[tokio::test]
    async fn test_mock_records_and_replays() {
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Get, "http://api/cars", 200, json!([]));

        let req = HttpRequest::new("http://api/cars", HttpMethod::Get).with_header("Accept", "application/json");
        let resp = client.send(req).await.unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.json::<Vec<serde_json::Value>>().unwrap().len(), 0);

        let missing = client
            .send(HttpRequest::new("http://api/nope", HttpMethod::Get))
            .await
            .unwrap();
        assert_eq!(missing.status, 404);

        assert_eq!(
            client.request_lines(),
            vec!["GET http://api/cars".to_string(), "GET http://api/nope".to_string()]
        );
        assert_eq!(client.requests()[0].headers["Accept"], "application/json");
    }
}
