//! 认证模块
//!
//! 会话存储在 App 根部显式创建并通过 Context 提供，
//! 在提供范围之外访问会得到 `ClientError::NotInitialized`。
//! 路由服务只读取注入的会话信号，与认证实现解耦。

use carrent_client::session;
use carrent_client::{
    ClientConfig, ClientError, ClientResult, RentalApi, SessionState, SessionStore,
};
use carrent_shared::User;
use carrent_shared::validation::{LoginForm, RegistrationForm};
use leptos::prelude::*;

use crate::signal_cell::SignalCell;
use crate::web::{FetchHttpClient, LocalStorage};

pub type Api = RentalApi<FetchHttpClient>;

/// 认证上下文
///
/// 只包含信号句柄，可以自由复制到事件处理器与异步任务中。
#[derive(Clone, Copy)]
pub struct AuthContext {
    store: RwSignal<SessionStore<LocalStorage>>,
    config: StoredValue<ClientConfig>,
}

impl AuthContext {
    /// 创建新的认证上下文，初始状态为 `Loading`
    pub fn new(config: ClientConfig) -> Self {
        let store = RwSignal::new(SessionStore::new(LocalStorage, &config));
        Self {
            store,
            config: StoredValue::new(config),
        }
    }

    /// 从 LocalStorage 恢复上次的会话
    pub fn restore(&self) {
        self.store.update(|store| {
            store.restore();
        });
    }

    /// 会话状态信号（用于路由服务注入）
    pub fn state_signal(&self) -> Signal<SessionState> {
        let store = self.store;
        Signal::derive(move || store.with(|s| s.state().clone()))
    }

    pub fn user(&self) -> Option<User> {
        self.store.with(|s| s.state().user().cloned())
    }

    pub fn user_untracked(&self) -> Option<User> {
        self.store.with_untracked(|s| s.state().user().cloned())
    }

    pub fn page_limit(&self) -> u32 {
        self.config.with_value(|c| c.page_limit)
    }

    /// 带上当前 token 的 API 客户端
    pub fn api(&self) -> Api {
        let token = self
            .store
            .with_untracked(|s| s.state().token().map(str::to_string));
        self.config
            .with_value(|c| RentalApi::from_config(FetchHttpClient, c))
            .with_token(token)
    }

    /// 登录；成功后会话立即生效
    pub async fn login(self, form: &LoginForm) -> ClientResult<()> {
        session::login(&SignalCell(self.store), &self.api(), form).await
    }

    /// 注册并直接登录
    pub async fn register(self, form: &RegistrationForm) -> ClientResult<()> {
        session::register(&SignalCell(self.store), &self.api(), form).await
    }

    /// 注销并清除状态
    ///
    /// 导航由路由服务的守卫自动处理。
    pub fn logout(&self) {
        self.store.update(|store| store.logout());
    }
}

/// 从 Context 获取认证上下文
pub fn try_use_auth() -> ClientResult<AuthContext> {
    use_context::<AuthContext>().ok_or(ClientError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::prelude::Owner;

    #[test]
    fn test_access_outside_provider_fails() {
        let owner = Owner::new();
        owner.with(|| {
            assert!(matches!(try_use_auth(), Err(ClientError::NotInitialized)));

            let ctx = AuthContext::new(ClientConfig::default());
            provide_context(ctx);
            let found = try_use_auth().unwrap();
            assert_eq!(found.page_limit(), 10);
            assert!(found.state_signal().get_untracked().is_loading());
            assert!(found.user_untracked().is_none());
        });
    }
}
