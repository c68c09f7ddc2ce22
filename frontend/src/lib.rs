//! 租车管理前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `carrent_client`: 路由定义、守卫、列表与表单状态机（与浏览器无关）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话上下文
//! - `signal_cell`: 让客户端的异步流程直接读写页面信号
//! - `components`: UI 组件层

mod auth;
mod signal_cell;
mod components {
    pub mod admin_dashboard;
    mod confirm_dialog;
    pub mod customers;
    mod form_modal;
    pub mod layout;
    mod list_page;
    pub mod login;
    mod pagination;
    pub mod register;
    pub mod rent;
    mod toast;
    pub mod user_dashboard;
    pub mod users;
    pub mod violations;
}

use crate::auth::AuthContext;
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::customers::CustomersPage;
use crate::components::layout::ProtectedLayout;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::rent::RentPage;
use crate::components::user_dashboard::UserDashboardPage;
use crate::components::users::UsersPage;
use crate::components::violations::ViolationsPage;

use carrent_client::ClientConfig;
use carrent_client::route::AppRoute;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod console;
    mod http;
    pub mod router;
    mod storage;

    pub use console::init_logging;
    pub use http::FetchHttpClient;
    pub use storage::LocalStorage;
}

pub use web::init_logging;
use web::router::{PageLoading, Router, RouterOutlet, RouterService};

/// 路由匹配函数
///
/// 只在守卫放行后调用；受保护页面包在统一的外壳里。
fn route_matcher(route: AppRoute, auth: AuthContext, router: RouterService) -> AnyView {
    let page = match route {
        AppRoute::Login => return view! { <LoginPage auth=auth router=router /> }.into_any(),
        AppRoute::Register => return view! { <RegisterPage auth=auth router=router /> }.into_any(),
        AppRoute::NotFound => {
            return view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <div class="text-center">
                        <h1 class="text-6xl font-bold text-error">"404"</h1>
                        <p class="text-xl mt-4">"Không tìm thấy trang"</p>
                    </div>
                </div>
            }
            .into_any();
        }
        // 守卫总会把 Home 重定向到角色首页
        AppRoute::Home => return view! { <PageLoading /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::AdminCustomers => view! { <CustomersPage auth=auth /> }.into_any(),
        AppRoute::AdminUsers => view! { <UsersPage auth=auth /> }.into_any(),
        AppRoute::AdminViolations => view! { <ViolationsPage auth=auth /> }.into_any(),
        AppRoute::UserDashboard => view! { <UserDashboardPage auth=auth /> }.into_any(),
        AppRoute::UserRent => view! { <RentPage auth=auth router=router /> }.into_any(),
    };

    view! {
        <ProtectedLayout auth=auth router=router>
            {page}
        </ProtectedLayout>
    }
    .into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文
    let auth = AuthContext::new(ClientConfig::from_build_env());
    provide_context(auth);

    // 2. 从 LocalStorage 恢复会话
    auth.restore();

    // 3. 会话状态信号注入路由服务
    let session = auth.state_signal();

    view! {
        <Router session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
