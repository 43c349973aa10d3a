//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。
//! 会话本身（Token、用户名、角色）由共享层的 `SessionService` 存在 LocalStorage 中，
//! 这里只保存它在内存中的镜像。

use crate::web::{FetchClient, LocalStorage};
use clinic_shared::auth::AuthService;
use clinic_shared::config::ClientConfig;
use clinic_shared::date::Timestamp;
use clinic_shared::{ApiClient, CancelFlag, ClientError, ClientResult, Session, SessionService};
use leptos::prelude::*;

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 当前会话（仅在认证成功后存在）
    pub session: Option<Session>,
    /// 是否正在加载
    pub is_loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            session: None,
            is_loading: true,
        });
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_authenticated()))
    }

    /// 当前 Token（不追踪）
    pub fn token(&self) -> Option<String> {
        self.state
            .with_untracked(|s| s.session.as_ref().map(|s| s.access_token.clone()))
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

fn sessions() -> SessionService<LocalStorage> {
    SessionService::new(LocalStorage)
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复会话；Token 缺失或过期时清空存储，状态保持未认证。
pub fn init_auth(ctx: &AuthContext) {
    let session = sessions().active(Timestamp::now());
    ctx.set_state.set(AuthState {
        session,
        is_loading: false,
    });
}

/// 重新检查已保存的会话
///
/// 控制面板挂载时调用。返回 `false` 时状态已被清空，路由服务会重定向到登录页。
pub fn verify_session(ctx: &AuthContext) -> bool {
    match sessions().active(Timestamp::now()) {
        Some(session) => {
            ctx.set_state.update(|state| state.session = Some(session));
            true
        }
        None => {
            log::info!("session missing or expired");
            ctx.set_state.update(|state| state.session = None);
            false
        }
    }
}

/// 带 Token 的 API 客户端
pub fn api_client(ctx: &AuthContext, config: &ClientConfig) -> ApiClient<FetchClient> {
    ApiClient::new(config.api_base.clone(), FetchClient).with_token(ctx.token())
}

/// 不带 Token 的认证服务（注册、找回密码）
pub fn auth_service(config: &ClientConfig) -> AuthService<FetchClient, LocalStorage> {
    AuthService::new(ApiClient::new(config.api_base.clone(), FetchClient), sessions())
}

/// 登录并保存状态
///
/// # Arguments
/// * `ctx` - 认证上下文
/// * `config` - 客户端配置（后端地址）
/// * `cancel` - 登录页卸载时触发的取消标记
pub async fn login(
    ctx: &AuthContext,
    config: &ClientConfig,
    email: String,
    password: String,
    cancel: CancelFlag,
) -> ClientResult<Session> {
    let api = ApiClient::new(config.api_base.clone(), FetchClient).with_cancel(cancel);
    let service = AuthService::new(api, sessions());

    let session = service.login(&email, &password).await?;
    ctx.set_state.update(|state| {
        state.session = Some(session.clone());
        state.is_loading = false;
    });
    Ok(session)
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    sessions().clear();
    log::info!("logged out");
    ctx.set_state.update(|state| state.session = None);
    // 注意：不需要手动导航，路由服务会监听认证状态变化并自动重定向
}

/// 401 时注销；返回是否已处理
pub fn handle_unauthorized(ctx: &AuthContext, err: &ClientError) -> bool {
    if err.is_unauthorized() {
        log::warn!("request rejected as unauthenticated, signing out");
        logout(ctx);
        true
    } else {
        false
    }
}
