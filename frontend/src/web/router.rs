//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 守卫判断来自 `carrent_client::guard`，这里只负责执行重定向。

use carrent_client::guard::{GuardDecision, decide};
use carrent_client::route::AppRoute;
use carrent_client::SessionState;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use crate::auth::{AuthContext, try_use_auth};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（注入的信号）
    session: Signal<SessionState>,
}

impl RouterService {
    fn new(session: Signal<SessionState>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由的守卫结果（响应式）
    pub fn decision(&self) -> GuardDecision {
        let route = self.current_route.get();
        self.session.with(|state| decide(route, state))
    }

    /// 导航到指定路由；守卫会在随后的 Effect 中执行
    pub fn navigate(&self, route: AppRoute) {
        push_history_state(route.to_path());
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_route.set(AppRoute::from_path(&current_path()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 路由或会话变化时重新执行守卫
    fn setup_guard(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let route = current_route.get();
            let decision = session.with(|state| decide(route, state));

            if let GuardDecision::Redirect(target) = decision {
                tracing::info!(from = %route, to = %target, "guard redirect");
                replace_history_state(target.to_path());
                set_route.set(target);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<SessionState>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_guard();

    provide_context(router);
    router
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部、认证上下文之内使用。
#[component]
pub fn Router(
    /// 会话状态信号
    session: Signal<SessionState>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 页面匹配函数：接收当前路由及上下文，返回对应视图
pub type RouteMatcher = fn(AppRoute, AuthContext, RouterService) -> AnyView;

/// 路由出口组件
///
/// 守卫允许时渲染匹配的页面，否则显示加载提示（重定向由守卫 Effect 完成）。
#[component]
pub fn RouterOutlet(matcher: RouteMatcher) -> impl IntoView {
    let (Some(router), Ok(auth)) = (use_context::<RouterService>(), try_use_auth()) else {
        tracing::error!("RouterOutlet rendered outside of Router / AuthContext");
        return view! {
            <div class="alert alert-error m-8">"Ứng dụng chưa được khởi tạo"</div>
        }
        .into_any();
    };

    let outlet = Memo::new(move |_| (router.current_route().get(), router.decision()));

    view! {
        {move || match outlet.get() {
            (route, GuardDecision::Render) => matcher(route, auth, router),
            _ => view! { <PageLoading /> }.into_any(),
        }}
    }
    .into_any()
}

/// 中性的加载提示
#[component]
pub fn PageLoading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 应用内链接
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_context::<RouterService>();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        if let Some(router) = router {
            ev.prevent_default();
            router.navigate(to);
        }
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
