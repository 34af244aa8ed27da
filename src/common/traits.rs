//! コアトレイト定義（Controller）

use std::future::Future;

use async_trait::async_trait;

use crate::error::Error;
use crate::helpers::Helpers;
use super::http::{Request, Response};

/// コントローラーの特性
///
/// リクエストごとに構築されたヘルパーファサードを注入して呼び出される
#[async_trait]
pub trait Controller: Send + Sync {
    /// リクエストを処理
    async fn handle(&self, req: Request, helpers: &Helpers) -> Result<Response, Error>;
}

/// 同期関数をControllerに適合させるアダプタ
pub struct FnController<F>
where
    F: Fn(Request, &Helpers) -> Result<Response, Error> + Send + Sync + 'static,
{
    handler_fn: F,
}

#[async_trait]
impl<F> Controller for FnController<F>
where
    F: Fn(Request, &Helpers) -> Result<Response, Error> + Send + Sync + 'static,
{
    async fn handle(&self, req: Request, helpers: &Helpers) -> Result<Response, Error> {
        (self.handler_fn)(req, helpers)
    }
}

/// 非同期関数をControllerに適合させるアダプタ
///
/// futureがヘルパーを借用せずに済むよう、クローンを所有で渡す
pub struct AsyncFnController<F, Fut>
where
    F: Fn(Request, Helpers) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    handler_fn: F,
}

#[async_trait]
impl<F, Fut> Controller for AsyncFnController<F, Fut>
where
    F: Fn(Request, Helpers) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    async fn handle(&self, req: Request, helpers: &Helpers) -> Result<Response, Error> {
        (self.handler_fn)(req, helpers.clone()).await
    }
}

/// 同期コントローラー関数からControllerを作成
pub fn from_fn<F>(handler_fn: F) -> FnController<F>
where
    F: Fn(Request, &Helpers) -> Result<Response, Error> + Send + Sync + 'static,
{
    FnController { handler_fn }
}

/// 非同期コントローラー関数からControllerを作成
pub fn from_async_fn<F, Fut>(handler_fn: F) -> AsyncFnController<F, Fut>
where
    F: Fn(Request, Helpers) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    AsyncFnController { handler_fn }
}
