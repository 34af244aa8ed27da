//! 共通の基本型とトレイト定義

pub mod context;
pub mod http;
pub mod traits;
pub mod utils;

pub use context::ViewContext;
pub use http::{Method, Request, Response, ResponseBuilder, Scheme, StatusCode};
pub use traits::{from_async_fn, from_fn, Controller};
