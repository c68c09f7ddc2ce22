//! 租车管理前端的平台无关逻辑
//!
//! 这里不依赖浏览器：HTTP 与存储通过 trait 注入，
//! 页面状态（列表、表单弹窗、会话、路由守卫）都是纯数据结构，
//! 可以在原生环境下直接测试。

pub mod api;
pub mod cell;
pub mod config;
pub mod draft;
pub mod error;
pub mod form;
pub mod guard;
pub mod list;
pub mod rent;
pub mod request;
pub mod route;
pub mod session;

pub use api::{RentalApi, ResourceApi};
pub use cell::StateCell;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use request::{HttpClient, HttpRequest, HttpResponse, TransportError};
pub use session::{Session, SessionState, SessionStorage, SessionStore};
