//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问要求。

use std::fmt::Display;

use carrent_shared::Role;

/// 路由的访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 任何人
    Public,
    /// 仅未登录访客（登录、注册页），已登录用户被送回首页
    GuestOnly,
    /// 任意已登录用户
    Authenticated,
    /// 指定角色
    Role(Role),
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 首页，按角色分发到对应的面板
    #[default]
    Home,
    Login,
    Register,
    AdminDashboard,
    AdminCustomers,
    AdminUsers,
    AdminViolations,
    UserDashboard,
    /// 新建租车合同
    UserRent,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/admin" | "/admin/dashboard" => Self::AdminDashboard,
            "/admin/customers" => Self::AdminCustomers,
            "/admin/users" => Self::AdminUsers,
            "/admin/violations" => Self::AdminViolations,
            "/user" | "/user/dashboard" => Self::UserDashboard,
            "/user/rent" => Self::UserRent,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminCustomers => "/admin/customers",
            Self::AdminUsers => "/admin/users",
            Self::AdminViolations => "/admin/violations",
            Self::UserDashboard => "/user/dashboard",
            Self::UserRent => "/user/rent",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫数据：该路由的访问要求**
    pub fn access(&self) -> Access {
        match self {
            Self::Home => Access::Authenticated,
            Self::Login | Self::Register => Access::GuestOnly,
            Self::AdminDashboard
            | Self::AdminCustomers
            | Self::AdminUsers
            | Self::AdminViolations => Access::Role(Role::Admin),
            Self::UserDashboard | Self::UserRent => Access::Role(Role::User),
            Self::NotFound => Access::Public,
        }
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 角色不匹配或已登录访问访客页时的重定向目标
    pub fn root() -> Self {
        Self::Home
    }

    /// 各角色的首页
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::User => Self::UserDashboard,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
