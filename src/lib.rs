//! CtrlBridge: コントローラー向け横断的リクエストヘルパーライブラリ
//!
//! ページメタデータ共有・https強制・404フォールバック・フラッシュ
//! メッセージ付きリダイレクト・計測ログ・複数例外のメッセージ解決を
//! 単一のファサードに束ね、コントローラーへ注入するためのライブラリ

pub mod clock;
pub mod common;
pub mod config;
pub mod error;
pub mod helpers;
pub mod lang;
pub mod routing;
pub mod session;
pub mod view;

pub use common::*;
pub use error::*;
pub use helpers::*;

use std::sync::Arc;

use log::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::common::http::{Request, Response};
use crate::common::traits::Controller;
use crate::config::AppConfig;
use crate::lang::Translator;
use crate::routing::RouteMap;
use crate::session::{MemorySession, SessionStore};
use crate::view::{TemplateRegistry, ViewRenderer};

/// アプリケーションを構築するためのビルダー
pub struct CtrlBridgeBuilder {
    config: AppConfig,
    lang: Arc<Translator>,
    views: Arc<dyn ViewRenderer>,
    session: Arc<dyn SessionStore>,
    routes: Arc<RouteMap>,
    clock: Arc<dyn Clock>,
}

impl Default for CtrlBridgeBuilder {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            lang: Arc::new(Translator::default()),
            views: Arc::new(TemplateRegistry::new()),
            session: Arc::new(MemorySession::new()),
            routes: Arc::new(RouteMap::new()),
            clock: Arc::new(SystemClock::new()),
        }
    }
}

impl CtrlBridgeBuilder {
    /// 新しいCtrlBridgeBuilderインスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// アプリケーション設定を指定
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// ローカライズカタログを指定
    pub fn lang(mut self, lang: Translator) -> Self {
        self.lang = Arc::new(lang);
        self
    }

    /// ビューレンダラーを指定
    pub fn views<V>(mut self, views: V) -> Self
    where
        V: ViewRenderer + 'static,
    {
        self.views = Arc::new(views);
        self
    }

    /// セッションストアを指定
    pub fn session<S>(mut self, session: S) -> Self
    where
        S: SessionStore + 'static,
    {
        self.session = Arc::new(session);
        self
    }

    /// 名前付きルートマップを指定
    pub fn routes(mut self, routes: RouteMap) -> Self {
        self.routes = Arc::new(routes);
        self
    }

    /// 時計を指定
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// アプリケーションをビルドして返却
    pub fn build(self) -> CtrlBridge {
        CtrlBridge {
            config: self.config,
            lang: self.lang,
            views: self.views,
            session: self.session,
            routes: self.routes,
            clock: self.clock,
        }
    }
}

/// コントローラーへヘルパーを注入して呼び出すアプリケーション
///
/// 共有コラボレーター（セッションストア・ルートマップ・レンダラー等）を
/// 保持し、リクエストごとに新しいヘルパーファサードを構築する
pub struct CtrlBridge {
    config: AppConfig,
    lang: Arc<Translator>,
    views: Arc<dyn ViewRenderer>,
    session: Arc<dyn SessionStore>,
    routes: Arc<RouteMap>,
    clock: Arc<dyn Clock>,
}

impl CtrlBridge {
    /// 新しいCtrlBridgeBuilderインスタンスを作成
    pub fn builder() -> CtrlBridgeBuilder {
        CtrlBridgeBuilder::new()
    }

    /// リクエスト用のヘルパーファサードを構築
    pub fn helpers_for(&self, request: Request) -> Helpers {
        Helpers::builder(request)
            .config(self.config.clone())
            .lang(Arc::clone(&self.lang))
            .views(Arc::clone(&self.views))
            .session(Arc::clone(&self.session))
            .routes(Arc::clone(&self.routes))
            .clock(Arc::clone(&self.clock))
            .build()
    }

    /// コントローラーを呼び出してリクエストを処理
    ///
    /// 設定でhttps強制が有効なら、非セキュアなリクエストは
    /// コントローラーを呼ばずにリダイレクトで短絡する。
    /// コントローラーがRouteNotFoundを返した場合は404ビューへ
    /// フォールバックする
    pub async fn dispatch(
        &self,
        controller: &dyn Controller,
        request: Request,
    ) -> Result<Response, Error> {
        let helpers = self.helpers_for(request.clone());

        if self.config.force_https {
            if let Some(redirect) = helpers.force_ssl() {
                info!("Dispatch short-circuited by SSL enforcement: {}", request.path);
                helpers.log_performance();
                return Ok(redirect);
            }
        }

        helpers.init_base_controller();

        let response = match controller.handle(request, &helpers).await {
            Ok(response) => response,
            Err(Error::RouteNotFound(target)) => {
                debug!("Controller reported missing route '{}', serving 404", target);
                helpers.force_404()
            }
            Err(e) => return Err(e),
        };

        helpers.log_performance();
        Ok(response)
    }
}
