use crate::patch::{CustomerPatch, NewContract, NewViolation, UserPatch, ViolationPatch};
use crate::{
    AuthResponse, Car, Collateral, Contract, Customer, EntityId, RentalDate, User, Violation,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use std::marker::PhantomData;

/// Default page size used by every list screen.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote resources exposed by the rental service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Auth,
    Cars,
    Collaterals,
    Violations,
    Customers,
    Users,
    Contracts,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Auth => "auth",
            Resource::Cars => "cars",
            Resource::Collaterals => "collaterals",
            Resource::Violations => "violations",
            Resource::Customers => "customers",
            Resource::Users => "users",
            Resource::Contracts => "contracts",
        }
    }

    /// 面向用户的名称
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Auth => "tài khoản",
            Resource::Cars => "xe",
            Resource::Collaterals => "tài sản thế chấp",
            Resource::Violations => "vi phạm",
            Resource::Customers => "khách hàng",
            Resource::Users => "người dùng",
            Resource::Contracts => "hợp đồng",
        }
    }

    /// Collection path, e.g. `/customers`.
    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// Member path, e.g. `/customers/1`.
    pub fn member_path(&self, id: &EntityId) -> String {
        format!("/{}/{}", self.as_str(), id)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation names, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Register => "register",
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::Login => "đăng nhập",
            Operation::Register => "đăng ký",
            Operation::List => "tải danh sách",
            Operation::Get => "tải",
            Operation::Create => "tạo",
            Operation::Update => "cập nhật",
            Operation::Delete => "xóa",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// Pagination
// =========================================================

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Page and limit are clamped to at least 1.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

/// List envelope: `{ data, total, page, limit }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Number of pages for `total` items, never less than 1.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

// =========================================================
// Resource capabilities
// =========================================================

/// An entity served under its own collection path.
pub trait RestResource: DeserializeOwned {
    const RESOURCE: Resource;
}

/// Members readable with `GET /{resource}/{id}`.
pub trait Retrievable: RestResource {}

/// Collections listed with `?page&limit`.
pub trait Paginated: RestResource {}

pub trait Creatable: RestResource {
    type New: Serialize;
}

pub trait Updatable: RestResource {
    type Patch: Serialize;
}

pub trait Deletable: RestResource {}

impl RestResource for Car {
    const RESOURCE: Resource = Resource::Cars;
}
impl Retrievable for Car {}

impl RestResource for Collateral {
    const RESOURCE: Resource = Resource::Collaterals;
}
impl Retrievable for Collateral {}

impl RestResource for Violation {
    const RESOURCE: Resource = Resource::Violations;
}
impl Retrievable for Violation {}
impl Paginated for Violation {}
impl Creatable for Violation {
    type New = NewViolation;
}
impl Updatable for Violation {
    type Patch = ViolationPatch;
}
impl Deletable for Violation {}

impl RestResource for Customer {
    const RESOURCE: Resource = Resource::Customers;
}
impl Retrievable for Customer {}
impl Paginated for Customer {}
impl Updatable for Customer {
    type Patch = CustomerPatch;
}
impl Deletable for Customer {}

impl RestResource for User {
    const RESOURCE: Resource = Resource::Users;
}
impl Retrievable for User {}
impl Paginated for User {}
impl Updatable for User {
    type Patch = UserPatch;
}
impl Deletable for User {}

impl RestResource for Contract {
    const RESOURCE: Resource = Resource::Contracts;
}
impl Creatable for Contract {
    type New = NewContract;
}

// =========================================================
// Endpoint trait
// =========================================================

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    const RESOURCE: Resource;
    const OPERATION: Operation;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path, relative to the API origin.
    fn path(&self) -> String;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// JSON body, if the endpoint takes one.
    fn body(&self) -> serde_json::Result<Option<String>> {
        Ok(None)
    }

    fn decode(body: &str) -> serde_json::Result<Self::Response> {
        serde_json::from_str(body)
    }
}

// =========================================================
// Request Definitions
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const RESOURCE: Resource = Resource::Auth;
    const OPERATION: Operation = Operation::Login;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        serde_json::to_string(self).map(Some)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    #[serde(rename = "cccd")]
    pub national_id: String,
    pub address: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const RESOURCE: Resource = Resource::Auth;
    const OPERATION: Operation = Operation::Register;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        serde_json::to_string(self).map(Some)
    }
}

/// All cars, optionally only those free during `[start, end]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListCars {
    pub start: Option<RentalDate>,
    pub end: Option<RentalDate>,
}

impl ApiRequest for ListCars {
    type Response = Vec<Car>;
    const RESOURCE: Resource = Resource::Cars;
    const OPERATION: Operation = Operation::List;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        Resource::Cars.path()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(start) = self.start {
            query.push(("start", start.to_string()));
        }
        if let Some(end) = self.end {
            query.push(("end", end.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListCollaterals;

impl ApiRequest for ListCollaterals {
    type Response = Vec<Collateral>;
    const RESOURCE: Resource = Resource::Collaterals;
    const OPERATION: Operation = Operation::List;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        Resource::Collaterals.path()
    }
}

/// One page of a paginated collection.
pub struct ListPage<E> {
    pub page: PageRequest,
    _marker: PhantomData<fn() -> E>,
}

impl<E> ListPage<E> {
    pub fn new(page: PageRequest) -> Self {
        Self {
            page,
            _marker: PhantomData,
        }
    }
}

impl<E: Paginated> ApiRequest for ListPage<E> {
    type Response = ListResponse<E>;
    const RESOURCE: Resource = E::RESOURCE;
    const OPERATION: Operation = Operation::List;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        E::RESOURCE.path()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.page.query()
    }
}

/// Contracts of one user, paginated.
#[derive(Debug, Clone, PartialEq)]
pub struct ListUserContracts {
    pub user_id: EntityId,
    pub page: PageRequest,
}

impl ApiRequest for ListUserContracts {
    type Response = ListResponse<Contract>;
    const RESOURCE: Resource = Resource::Contracts;
    const OPERATION: Operation = Operation::List;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        Resource::Contracts.path()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.page.query();
        query.push(("userId", self.user_id.to_string()));
        query
    }
}

pub struct GetOne<E> {
    pub id: EntityId,
    _marker: PhantomData<fn() -> E>,
}

impl<E> GetOne<E> {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<E: Retrievable> ApiRequest for GetOne<E> {
    type Response = E;
    const RESOURCE: Resource = E::RESOURCE;
    const OPERATION: Operation = Operation::Get;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        E::RESOURCE.member_path(&self.id)
    }
}

pub struct CreateOne<E: Creatable> {
    pub new: E::New,
}

impl<E: Creatable> CreateOne<E> {
    pub fn new(new: E::New) -> Self {
        Self { new }
    }
}

impl<E: Creatable> ApiRequest for CreateOne<E> {
    type Response = E;
    const RESOURCE: Resource = E::RESOURCE;
    const OPERATION: Operation = Operation::Create;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        E::RESOURCE.path()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        serde_json::to_string(&self.new).map(Some)
    }
}

pub struct UpdateOne<E: Updatable> {
    pub id: EntityId,
    pub patch: E::Patch,
}

impl<E: Updatable> UpdateOne<E> {
    pub fn new(id: EntityId, patch: E::Patch) -> Self {
        Self { id, patch }
    }
}

impl<E: Updatable> ApiRequest for UpdateOne<E> {
    type Response = E;
    const RESOURCE: Resource = E::RESOURCE;
    const OPERATION: Operation = Operation::Update;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        E::RESOURCE.member_path(&self.id)
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        serde_json::to_string(&self.patch).map(Some)
    }
}

pub struct DeleteOne<E> {
    pub id: EntityId,
    _marker: PhantomData<fn() -> E>,
}

impl<E> DeleteOne<E> {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<E: Deletable> ApiRequest for DeleteOne<E> {
    // The body of a successful delete is ignored.
    type Response = ();
    const RESOURCE: Resource = E::RESOURCE;
    const OPERATION: Operation = Operation::Delete;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        E::RESOURCE.member_path(&self.id)
    }

    fn decode(_body: &str) -> serde_json::Result<Self::Response> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0, 10, 1)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 10, 3)]
    #[case(5, 0, 1)]
    fn test_total_pages(#[case] total: u64, #[case] limit: u32, #[case] expected: u32) {
        assert_eq!(total_pages(total, limit), expected);
    }

    #[test]
    fn test_page_request_is_one_based() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page, PageRequest { page: 1, limit: 1 });
        assert_eq!(
            PageRequest::default().query(),
            vec![("page", "1".to_string()), ("limit", "10".to_string())]
        );
    }

    #[test]
    fn test_member_paths() {
        let get = GetOne::<Customer>::new("1".into());
        assert_eq!(get.path(), "/customers/1");
        let delete = DeleteOne::<Violation>::new("5".into());
        assert_eq!(delete.path(), "/violations/5");
        assert_eq!(<DeleteOne<Violation> as ApiRequest>::METHOD, HttpMethod::Delete);
    }

    #[test]
    fn test_contract_listing_query() {
        let req = ListUserContracts {
            user_id: "u1".into(),
            page: PageRequest::new(2, 10),
        };
        assert_eq!(
            req.query(),
            vec![
                ("page", "2".to_string()),
                ("limit", "10".to_string()),
                ("userId", "u1".to_string())
            ]
        );
    }

    #[test]
    fn test_car_window_query() {
        let req = ListCars {
            start: RentalDate::from_ymd(2025, 1, 1),
            end: RentalDate::from_ymd(2025, 1, 3),
        };
        assert_eq!(
            req.query(),
            vec![("start", "2025-01-01".to_string()), ("end", "2025-01-03".to_string())]
        );
        assert!(ListCars::default().query().is_empty());
    }

    #[test]
    fn test_list_envelope_tolerates_missing_page_fields() {
        let page: ListResponse<Customer> =
            serde_json::from_value(json!({ "data": [{ "id": 1, "name": "A" }], "total": 1 })).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id.as_str(), "1");
    }

    #[test]
    fn test_delete_ignores_body() {
        assert!(<DeleteOne<Customer> as ApiRequest>::decode("true").is_ok());
        assert!(<DeleteOne<Customer> as ApiRequest>::decode("").is_ok());
    }

    #[test]
    fn test_register_body_uses_cccd() {
        let req = RegisterRequest {
            email: "a@b.c".into(),
            password: "secret1".into(),
            name: "A".into(),
            phone: "1".into(),
            national_id: "0123".into(),
            address: "HN".into(),
        };
        let body: serde_json::Value = serde_json::from_str(&req.body().unwrap().unwrap()).unwrap();
        assert_eq!(body["cccd"], "0123");
    }
}
