//! 客户端配置

use crate::nav::MenuPolicy;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// 覆盖后端地址的存储键
pub const KEY_API_BASE: &str = "api_base_url";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub menu_policy: MenuPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            menu_policy: MenuPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// 按优先级合并：存储覆盖 > 编译期环境变量 > 默认值
    pub fn from_sources(
        stored_base: Option<&str>,
        env_base: Option<&str>,
        env_policy: Option<&str>,
    ) -> Self {
        let api_base = [stored_base, env_base]
            .into_iter()
            .flatten()
            .map(|s| s.trim().trim_end_matches('/'))
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .to_string();

        let menu_policy = match env_policy {
            Some(raw) => MenuPolicy::parse(raw).unwrap_or_else(|| {
                log::warn!("unknown menu policy {:?}, showing all entries", raw);
                MenuPolicy::ShowAll
            }),
            None => MenuPolicy::ShowAll,
        };

        Self {
            api_base,
            menu_policy,
        }
    }
}
