use async_trait::async_trait;
use std::marker::PhantomData;

use carrent_shared::protocol::{
    ApiRequest, Creatable, CreateOne, DeleteOne, Deletable, GetOne, ListCars, ListCollaterals,
    ListPage, ListUserContracts, LoginRequest, Paginated, RegisterRequest, Retrievable,
    UpdateOne, Updatable,
};
use carrent_shared::{
    AuthResponse, Car, Collateral, Contract, Customer, EntityId, ListResponse, PageRequest, User,
    Violation,
};

use crate::config::ClientConfig;
use crate::draft::{CustomerDraft, UserDraft, ViolationDraft};
use crate::error::{ClientError, ClientResult};
use crate::form::{SaveOf, SaveRequest, SaveSink};
use crate::list::{ListSource, RemoveSource};
use crate::request::{HttpClient, HttpRequest};

// =========================================================
// API 客户端
// =========================================================

/// 租车服务 REST 客户端
///
/// 每个 (资源, 操作) 只发出一次请求，不重试、不缓存。
/// 接受任何实现了 HttpClient 的客户端，从而解耦具体的 HTTP 实现。
#[derive(Debug, Clone)]
pub struct RentalApi<C> {
    client: C,
    base_url: String,
    token: Option<String>,
}

impl<C: HttpClient> RentalApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(client: C, config: &ClientConfig) -> Self {
        Self::new(client, &config.api_base)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url<R: ApiRequest>(&self, req: &R) -> String {
        let mut url = format!("{}{}", self.base_url, req.path());
        let query = req.query();
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&query)
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    /// 发送一个类型化的请求
    ///
    /// - 非 2xx -> `RequestFailed`
    /// - 请求未到达服务端 -> `Transport`
    /// - 响应体无法解析 -> `Decode`
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ClientResult<R::Response> {
        let transport = |message: String| ClientError::Transport {
            resource: R::RESOURCE,
            operation: R::OPERATION,
            message,
        };

        let url = self.url(req);
        let mut http =
            HttpRequest::new(&url, R::METHOD).with_header("Accept", "application/json");
        if let Some(token) = &self.token {
            http = http.with_header("Authorization", &format!("Bearer {}", token));
        }
        if let Some(body) = req
            .body()
            .map_err(|e| transport(format!("invalid request body: {}", e)))?
        {
            http = http
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        let resp = self.client.send(http).await.map_err(|e| {
            tracing::warn!(method = %R::METHOD, %url, error = %e, "request did not complete");
            transport(e.0)
        })?;
        tracing::debug!(method = %R::METHOD, %url, status = resp.status, "api response");

        if !resp.is_success() {
            return Err(ClientError::RequestFailed {
                resource: R::RESOURCE,
                operation: R::OPERATION,
                status: resp.status,
            });
        }

        R::decode(&resp.body).map_err(|e| ClientError::Decode {
            resource: R::RESOURCE,
            operation: R::OPERATION,
            message: e.to_string(),
        })
    }

    // =========================================================
    // 认证
    // =========================================================

    /// 登录；服务端拒绝时统一报告为凭据错误
    pub async fn login(&self, req: &LoginRequest) -> ClientResult<AuthResponse> {
        match self.call(req).await {
            Err(ClientError::RequestFailed { status, .. }) => {
                tracing::info!(status, "login rejected");
                Err(ClientError::InvalidCredentials)
            }
            other => other,
        }
    }

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.call(req).await
    }

    // =========================================================
    // 资源入口
    // =========================================================

    fn resource<E>(&self) -> ResourceApi<'_, C, E> {
        ResourceApi {
            api: self,
            _marker: PhantomData,
        }
    }

    pub fn cars(&self) -> ResourceApi<'_, C, Car> {
        self.resource()
    }

    pub fn collaterals(&self) -> ResourceApi<'_, C, Collateral> {
        self.resource()
    }

    pub fn violations(&self) -> ResourceApi<'_, C, Violation> {
        self.resource()
    }

    pub fn customers(&self) -> ResourceApi<'_, C, Customer> {
        self.resource()
    }

    pub fn users(&self) -> ResourceApi<'_, C, User> {
        self.resource()
    }

    pub fn contracts(&self) -> ResourceApi<'_, C, Contract> {
        self.resource()
    }
}

/// 单个资源的操作集合
///
/// 可用的方法由实体实现的能力 trait 决定：
/// 例如 `Customer` 没有实现 `Creatable`，因此没有 `create`。
pub struct ResourceApi<'a, C, E> {
    api: &'a RentalApi<C>,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, C: HttpClient, E: Retrievable> ResourceApi<'a, C, E> {
    pub async fn get(&self, id: &EntityId) -> ClientResult<E> {
        self.api.call(&GetOne::<E>::new(id.clone())).await
    }
}

impl<'a, C: HttpClient, E: Paginated> ResourceApi<'a, C, E> {
    pub async fn list(&self, page: PageRequest) -> ClientResult<ListResponse<E>> {
        self.api.call(&ListPage::<E>::new(page)).await
    }
}

impl<'a, C: HttpClient, E: Creatable> ResourceApi<'a, C, E> {
    pub async fn create(&self, new: E::New) -> ClientResult<E> {
        self.api.call(&CreateOne::<E>::new(new)).await
    }
}

impl<'a, C: HttpClient, E: Updatable> ResourceApi<'a, C, E> {
    pub async fn update(&self, id: &EntityId, patch: E::Patch) -> ClientResult<E> {
        self.api.call(&UpdateOne::<E>::new(id.clone(), patch)).await
    }
}

impl<'a, C: HttpClient, E: Deletable> ResourceApi<'a, C, E> {
    pub async fn delete(&self, id: &EntityId) -> ClientResult<()> {
        self.api.call(&DeleteOne::<E>::new(id.clone())).await
    }
}

impl<'a, C: HttpClient> ResourceApi<'a, C, Car> {
    /// 全部车辆；给定时间窗时只返回该时段可租的车辆
    pub async fn all(&self, window: &ListCars) -> ClientResult<Vec<Car>> {
        self.api.call(window).await
    }
}

impl<'a, C: HttpClient> ResourceApi<'a, C, Collateral> {
    pub async fn all(&self) -> ClientResult<Vec<Collateral>> {
        self.api.call(&ListCollaterals).await
    }
}

impl<'a, C: HttpClient> ResourceApi<'a, C, Contract> {
    pub async fn list_for_user(
        &self,
        user_id: &EntityId,
        page: PageRequest,
    ) -> ClientResult<ListResponse<Contract>> {
        let req = ListUserContracts {
            user_id: user_id.clone(),
            page,
        };
        self.api.call(&req).await
    }

    /// 以某个用户的合同作为列表数据源
    pub fn of_user(&self, user_id: EntityId) -> UserContracts<'a, C> {
        UserContracts {
            api: self.api,
            user_id,
        }
    }
}

// =========================================================
// 列表数据源实现
// =========================================================

#[async_trait(?Send)]
impl<'a, C: HttpClient, E: Paginated> ListSource<E> for ResourceApi<'a, C, E> {
    async fn fetch(&self, page: PageRequest) -> ClientResult<ListResponse<E>> {
        self.list(page).await
    }
}

#[async_trait(?Send)]
impl<'a, C: HttpClient, E: Deletable> RemoveSource for ResourceApi<'a, C, E> {
    async fn remove(&self, id: &EntityId) -> ClientResult<()> {
        self.delete(id).await
    }
}

// =========================================================
// 保存目标实现
// =========================================================

#[async_trait(?Send)]
impl<'a, C: HttpClient> SaveSink<CustomerDraft> for ResourceApi<'a, C, Customer> {
    async fn save(&self, request: SaveOf<CustomerDraft>) -> ClientResult<()> {
        match request {
            SaveRequest::Update { id, patch } => self.update(&id, patch).await.map(drop),
            SaveRequest::Create(never) => match never {},
        }
    }
}

#[async_trait(?Send)]
impl<'a, C: HttpClient> SaveSink<UserDraft> for ResourceApi<'a, C, User> {
    async fn save(&self, request: SaveOf<UserDraft>) -> ClientResult<()> {
        match request {
            SaveRequest::Update { id, patch } => self.update(&id, patch).await.map(drop),
            SaveRequest::Create(never) => match never {},
        }
    }
}

#[async_trait(?Send)]
impl<'a, C: HttpClient> SaveSink<ViolationDraft> for ResourceApi<'a, C, Violation> {
    async fn save(&self, request: SaveOf<ViolationDraft>) -> ClientResult<()> {
        match request {
            SaveRequest::Create(new) => self.create(new).await.map(drop),
            SaveRequest::Update { id, patch } => self.update(&id, patch).await.map(drop),
        }
    }
}

/// 当前用户的合同列表
pub struct UserContracts<'a, C> {
    api: &'a RentalApi<C>,
    user_id: EntityId,
}

#[async_trait(?Send)]
impl<'a, C: HttpClient> ListSource<Contract> for UserContracts<'a, C> {
    async fn fetch(&self, page: PageRequest) -> ClientResult<ListResponse<Contract>> {
        self.api.contracts().list_for_user(&self.user_id, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use carrent_shared::protocol::{Operation, Resource};
    use carrent_shared::{CustomerPatch, NewViolation, RentalDate};
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn api() -> RentalApi<MockHttpClient> {
        RentalApi::new(MockHttpClient::new(), "http://api.test/")
    }

    #[tokio::test]
    async fn test_list_customers_page() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{}/customers?page=2&limit=10", BASE),
            200,
            json!({ "data": [{ "id": 11, "name": "K" }], "total": 11, "page": 2, "limit": 10 }),
        );

        let page = api.customers().list(PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(page.total, 11);
        assert_eq!(page.data[0].id.as_str(), "11");
        assert_eq!(
            api.client().request_lines(),
            vec!["GET http://api.test/customers?page=2&limit=10"]
        );
    }

    #[tokio::test]
    async fn test_non_2xx_names_resource_and_operation() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Delete,
            &format!("{}/users/3", BASE),
            500,
            json!({ "message": "boom" }),
        );

        let err = api.users().delete(&"3".into()).await.unwrap_err();
        assert_eq!(
            err,
            ClientError::RequestFailed {
                resource: Resource::Users,
                operation: Operation::Delete,
                status: 500,
            }
        );
    }

    #[tokio::test]
    async fn test_update_sends_patch_body() {
        let api = api().with_token(Some("t0k".to_string()));
        api.client().mock_response(
            HttpMethod::Patch,
            &format!("{}/customers/1", BASE),
            200,
            json!({ "id": "1", "name": "New" }),
        );

        let mut patch = CustomerPatch::default();
        patch.name = Some("New".to_string());
        let updated = api.customers().update(&"1".into(), patch).await.unwrap();
        assert_eq!(updated.name, "New");

        let sent = &api.client().requests()[0];
        assert_eq!(sent.body_json(), json!({ "name": "New" }));
        assert_eq!(sent.headers["Authorization"], "Bearer t0k");
        assert_eq!(sent.headers["Content-Type"], "application/json");
    }

    #[tokio::test]
    async fn test_create_violation() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Post,
            &format!("{}/violations", BASE),
            201,
            json!({ "id": 4, "name": "Trễ hạn", "price": 200000, "description": "" }),
        );

        let created = api
            .violations()
            .create(NewViolation {
                name: "Trễ hạn".to_string(),
                price: 200000,
                description: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(created.price, 200000);
        assert!(api.client().requests()[0].headers.get("Authorization").is_none());
    }

    #[tokio::test]
    async fn test_car_availability_window() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{}/cars?start=2025-01-01&end=2025-01-03", BASE),
            200,
            json!([{ "id": 9, "name": "Vios", "pricePerDay": 500000 }]),
        );

        let window = ListCars {
            start: RentalDate::from_ymd(2025, 1, 1),
            end: RentalDate::from_ymd(2025, 1, 3),
        };
        let cars = api.cars().all(&window).await.unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].price_per_day, 500000);
    }

    #[tokio::test]
    async fn test_login_rejection_is_invalid_credentials() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Post,
            &format!("{}/auth/login", BASE),
            401,
            json!({ "message": "Unauthorized" }),
        );

        let req = LoginRequest {
            email: "a@b.c".to_string(),
            password: "wrong".to_string(),
        };
        assert_eq!(api.login(&req).await, Err(ClientError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_transport_and_decode_errors() {
        let api = api();
        api.client()
            .mock_transport_error(HttpMethod::Get, &format!("{}/collaterals", BASE), "offline");
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{}/cars/1", BASE),
            200,
            json!("not a car"),
        );

        let err = api.collaterals().all().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport { resource: Resource::Collaterals, ref message, .. } if message == "offline"
        ));

        let err = api.cars().get(&"1".into()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Decode { resource: Resource::Cars, operation: Operation::Get, .. }
        ));
    }

    #[tokio::test]
    async fn test_user_contracts_query() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{}/contracts?page=1&limit=10&userId=u+1", BASE),
            200,
            json!({ "data": [], "total": 0 }),
        );

        let source = api.contracts().of_user("u 1".into());
        let page = source.fetch(PageRequest::default()).await.unwrap();
        assert!(page.data.is_empty());
    }
}
