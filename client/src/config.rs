use carrent_shared::protocol::DEFAULT_PAGE_LIMIT;

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，如果构建时没有设置对应的环境变量，则使用这些值
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";
pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_USER_KEY: &str = "user";

/// 客户端配置
///
/// WASM 没有运行时环境变量，配置在编译期通过 `option_env!` 注入：
/// - `CARRENT_API_BASE`: REST 服务地址
/// - `CARRENT_PAGE_LIMIT`: 列表每页条数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub page_limit: u32,
    /// 浏览器存储中保存 token 的键
    pub token_key: String,
    /// 浏览器存储中保存序列化用户的键
    pub user_key: String,
}

impl ClientConfig {
    /// 读取编译期注入的配置
    pub fn from_build_env() -> Self {
        Self::resolve(
            option_env!("CARRENT_API_BASE"),
            option_env!("CARRENT_PAGE_LIMIT"),
        )
    }

    /// 用给定值覆盖默认配置，空值或非法值回退到默认值
    pub fn resolve(api_base: Option<&str>, page_limit: Option<&str>) -> Self {
        let api_base = api_base
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string();

        let page_limit = page_limit
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT);

        Self {
            api_base,
            page_limit,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}
