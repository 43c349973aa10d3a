//! 运行时配置
//!
//! 后端地址与菜单策略在启动时解析一次，通过 Context 提供给所有组件。

use crate::web::LocalStorage;
use clinic_shared::config::{ClientConfig, KEY_API_BASE};
use leptos::prelude::*;

/// 解析配置：LocalStorage 覆盖 > 编译期环境变量 > 默认值
pub fn load_config() -> ClientConfig {
    let stored = LocalStorage::get(KEY_API_BASE);
    let config = ClientConfig::from_sources(
        stored.as_deref(),
        option_env!("CLINIC_API_BASE"),
        option_env!("CLINIC_MENU_POLICY"),
    );
    log::debug!("api base {}, menu policy {:?}", config.api_base, config.menu_policy);
    config
}

pub fn provide_config() -> ClientConfig {
    let config = load_config();
    provide_context(config.clone());
    config
}

/// 从 Context 获取配置
pub fn use_config() -> ClientConfig {
    use_context::<ClientConfig>().expect("ClientConfig should be provided")
}
