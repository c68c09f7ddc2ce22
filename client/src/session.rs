//! 会话存储
//!
//! 状态机：`Loading -> {Authenticated, Anonymous}`。
//! 只有 restore / login / register / logout 会改写会话，
//! 持久化通过 `SessionStorage` 注入（浏览器中是 LocalStorage）。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use carrent_shared::validation::{LoginForm, RegistrationForm};
use carrent_shared::{AuthResponse, Role, User};

use crate::api::RentalApi;
use crate::cell::StateCell;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::request::HttpClient;

// =========================================================
// 存储抽象
// =========================================================

/// 键值存储，接口与浏览器 LocalStorage 一致
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    /// 写入失败时返回 `false`
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 内存存储，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

// =========================================================
// 会话状态
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// 尚未从存储中恢复
    #[default]
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }
}

/// 进程内唯一的会话持有者
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
    token_key: String,
    user_key: String,
    state: SessionState,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S, config: &ClientConfig) -> Self {
        Self {
            storage,
            token_key: config.token_key.clone(),
            user_key: config.user_key.clone(),
            state: SessionState::Loading,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 从存储中恢复会话
    ///
    /// token 与用户必须同时存在且可解析，否则两者都被清除。
    pub fn restore(&mut self) -> &SessionState {
        let token = self.storage.get(&self.token_key);
        let user = self.storage.get(&self.user_key);

        self.state = match (token, user) {
            (None, None) => SessionState::Anonymous,
            (Some(token), Some(raw)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&raw) {
                    Ok(user) => {
                        tracing::debug!(user = %user.id, role = %user.role, "session restored");
                        SessionState::Authenticated(Session { token, user })
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "stored user is corrupt, discarding session");
                        self.clear_storage();
                        SessionState::Anonymous
                    }
                }
            }
            _ => {
                tracing::warn!("stored session is incomplete, discarding");
                self.clear_storage();
                SessionState::Anonymous
            }
        };
        &self.state
    }

    /// 保存登录 / 注册成功后的身份
    pub fn establish(&mut self, auth: AuthResponse) {
        let AuthResponse { token, user } = auth;

        match serde_json::to_string(&user) {
            Ok(raw) => {
                let saved = self.storage.set(&self.token_key, &token)
                    && self.storage.set(&self.user_key, &raw);
                if !saved {
                    tracing::warn!("failed to persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize user"),
        }

        tracing::info!(user = %user.id, role = %user.role, "signed in");
        self.state = SessionState::Authenticated(Session { token, user });
    }

    /// 无条件清除会话
    pub fn logout(&mut self) {
        self.clear_storage();
        self.state = SessionState::Anonymous;
        tracing::info!("signed out");
    }

    fn clear_storage(&self) {
        self.storage.remove(&self.token_key);
        self.storage.remove(&self.user_key);
    }
}

/// 校验并登录，成功后写入会话
///
/// 失败时会话保持不变，错误交给页面内联显示。
pub async fn login<C, S, H>(session: &H, api: &RentalApi<C>, form: &LoginForm) -> ClientResult<()>
where
    C: HttpClient,
    S: SessionStorage,
    H: StateCell<SessionStore<S>> + ?Sized,
{
    let req = form.validate()?;
    let auth = api.login(&req).await?;
    session.update_state(|store| store.establish(auth));
    Ok(())
}

/// 校验并注册；校验失败时不会发出请求
pub async fn register<C, S, H>(
    session: &H,
    api: &RentalApi<C>,
    form: &RegistrationForm,
) -> ClientResult<()>
where
    C: HttpClient,
    S: SessionStorage,
    H: StateCell<SessionStore<S>> + ?Sized,
{
    let req = form.validate()?;
    let auth = api.register(&req).await?;
    session.update_state(|store| store.establish(auth));
    Ok(())
}
