//! 路由守卫
//!
//! 根据会话状态与路由的访问要求决定渲染还是重定向，按顺序：
//! 1. 会话加载中 -> 等待，不重定向
//! 2. 未登录 -> 登录页
//! 3. 已登录但角色不符 -> 首页
//! 4. 其余情况渲染子组件

use carrent_shared::Role;

use crate::route::{Access, AppRoute};
use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 显示中性的加载提示
    Wait,
    Redirect(AppRoute),
    Render,
}

/// 受保护区域的守卫：`required` 为 `None` 时只要求已登录
pub fn evaluate(state: &SessionState, required: Option<Role>) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Wait,
        SessionState::Anonymous => GuardDecision::Redirect(AppRoute::auth_failure_redirect()),
        SessionState::Authenticated(session) => match required {
            Some(role) if session.user.role != role => GuardDecision::Redirect(AppRoute::root()),
            _ => GuardDecision::Render,
        },
    }
}

/// 对某个路由做出决定
///
/// 首页本身不渲染内容，已登录时直接分发到对应角色的面板。
pub fn decide(route: AppRoute, state: &SessionState) -> GuardDecision {
    match route.access() {
        Access::Public => GuardDecision::Render,
        Access::GuestOnly => match state {
            SessionState::Loading => GuardDecision::Wait,
            SessionState::Anonymous => GuardDecision::Render,
            SessionState::Authenticated(_) => GuardDecision::Redirect(AppRoute::root()),
        },
        Access::Authenticated => match evaluate(state, None) {
            GuardDecision::Render if route == AppRoute::Home => match state.role() {
                Some(role) => GuardDecision::Redirect(AppRoute::home_for(role)),
                None => GuardDecision::Render,
            },
            decision => decision,
        },
        Access::Role(role) => evaluate(state, Some(role)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use carrent_shared::User;
    use rstest::rstest;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(Session {
            token: "t".to_string(),
            user: User {
                role,
                ..Default::default()
            },
        })
    }

    #[rstest]
    #[case(SessionState::Loading, Some(Role::Admin), GuardDecision::Wait)]
    #[case(SessionState::Loading, None, GuardDecision::Wait)]
    #[case(SessionState::Anonymous, Some(Role::User), GuardDecision::Redirect(AppRoute::Login))]
    #[case(SessionState::Anonymous, None, GuardDecision::Redirect(AppRoute::Login))]
    #[case(signed_in(Role::User), Some(Role::Admin), GuardDecision::Redirect(AppRoute::Home))]
    #[case(signed_in(Role::Admin), Some(Role::User), GuardDecision::Redirect(AppRoute::Home))]
    #[case(signed_in(Role::Admin), Some(Role::Admin), GuardDecision::Render)]
    #[case(signed_in(Role::User), None, GuardDecision::Render)]
    fn test_evaluate(
        #[case] state: SessionState,
        #[case] required: Option<Role>,
        #[case] expected: GuardDecision,
    ) {
        assert_eq!(evaluate(&state, required), expected);
    }

    #[rstest]
    #[case(AppRoute::Home, signed_in(Role::Admin), GuardDecision::Redirect(AppRoute::AdminDashboard))]
    #[case(AppRoute::Home, signed_in(Role::User), GuardDecision::Redirect(AppRoute::UserDashboard))]
    #[case(AppRoute::Home, SessionState::Anonymous, GuardDecision::Redirect(AppRoute::Login))]
    #[case(AppRoute::Login, SessionState::Anonymous, GuardDecision::Render)]
    #[case(AppRoute::Register, signed_in(Role::User), GuardDecision::Redirect(AppRoute::Home))]
    #[case(AppRoute::Login, SessionState::Loading, GuardDecision::Wait)]
    #[case(AppRoute::NotFound, SessionState::Loading, GuardDecision::Render)]
    #[case(AppRoute::UserRent, signed_in(Role::Admin), GuardDecision::Redirect(AppRoute::Home))]
    #[case(AppRoute::AdminViolations, signed_in(Role::Admin), GuardDecision::Render)]
    fn test_decide(
        #[case] route: AppRoute,
        #[case] state: SessionState,
        #[case] expected: GuardDecision,
    ) {
        assert_eq!(decide(route, &state), expected);
    }
}
