//! 诊所管理后台的共享层
//!
//! 与 DOM 无关的全部逻辑：会话、HTTP 封装、通知接口、
//! 声明式 CRUD 模型、导航状态和认证流程。浏览器端只负责把这些
//! 接到 Leptos 信号和 web-sys 上。

pub mod auth;
pub mod config;
pub mod crud;
pub mod date;
pub mod error;
pub mod http;
pub mod nav;
pub mod notify;
pub mod profile;
pub mod protocol;
pub mod report;
pub mod resources;
pub mod schema;
pub mod session;

pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, CancelFlag, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use notify::{NoticeKind, Notifier};
pub use session::{KeyValueStore, Role, Session, SessionService};
