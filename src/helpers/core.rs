use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::common::http::{Request, Response, ResponseBuilder, StatusCode};
use crate::common::ViewContext;
use crate::config::AppConfig;
use crate::error::Error;
use crate::lang::Translator;
use crate::routing::RouteMap;
use crate::session::{MemorySession, SessionStore};
use crate::view::{TemplateRegistry, ViewRenderer, NOT_FOUND_VIEW};

/// リクエストヘルパーファサード
///
/// リクエストごとに構築され、コントローラーへ注入される。
/// 可変状態はビューコンテキストとセッションのフラッシュ書き込みのみ
#[derive(Clone)]
pub struct Helpers {
    pub(crate) config: AppConfig,
    pub(crate) lang: Arc<Translator>,
    pub(crate) views: Arc<dyn ViewRenderer>,
    pub(crate) session: Arc<dyn SessionStore>,
    pub(crate) routes: Arc<RouteMap>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) view_context: Arc<ViewContext>,
    pub(crate) request: Request,
    /// ファサード構築時点のタイムスタンプ（リクエスト開始時刻とみなす）
    pub(crate) started_at: f64,
}

impl Helpers {
    /// 新しいHelpersBuilderインスタンスを作成
    pub fn builder(request: Request) -> HelpersBuilder {
        HelpersBuilder::new(request)
    }

    /// ベースコントローラーの初期化（全ビュー共通データの共有）
    ///
    /// タイトル既定値・アプリケーション名・デバッグフラグを共有する。
    /// 再呼び出ししても同じ値を共有し直すだけで状態は壊れない
    pub fn init_base_controller(&self) {
        debug!("Initializing base controller view data");
        let title = if self.lang.has("app.title") {
            self.lang.line("app.title")
        } else {
            self.config.app_name.clone()
        };
        self.view_context.share("title", title);
        self.view_context.share("app_name", self.config.app_name.clone());
        self.view_context.share("debug", self.config.debug);
        self.view_context.share("locale", self.config.locale.clone());
    }

    /// ページタイトルを設定（ビューへtitle変数を共有）
    pub fn set_page_title(&self, page_name: &str) {
        self.view_context.share("title", page_name);
    }

    /// https://リクエストを強制する
    ///
    /// 現在のリクエストが非セキュアなら同一URLのhttpsへの
    /// リダイレクトを返す。短絡させるかどうかは呼び出し側の責務
    pub fn force_ssl(&self) -> Option<Response> {
        if self.request.is_secure() {
            return None;
        }

        let secure_url = self.request.secure_url();
        match Response::redirect(secure_url.clone(), StatusCode::Found.as_u16()) {
            Ok(response) => {
                debug!("Forcing SSL: redirecting to {}", secure_url);
                Some(response)
            }
            Err(e) => {
                // リクエスト由来のURLが不正な場合はリダイレクトを構築しない
                warn!("force_ssl could not build redirect: {}", e);
                None
            }
        }
    }

    /// 404レスポンスを返す
    ///
    /// 404ビューをレンダリングして返す。レンダリングに失敗した場合は
    /// 組み込みの代替ボディへフォールバックし、失敗させない
    pub fn force_404(&self) -> Response {
        match self.views.render(NOT_FOUND_VIEW, &self.view_context) {
            Ok(html) => ResponseBuilder::with_status(StatusCode::NotFound).html(html).build(),
            Err(e) => {
                warn!("force_404 falling back to builtin body: {}", e);
                ResponseBuilder::with_status(StatusCode::NotFound)
                    .text("Not Found")
                    .build()
            }
        }
    }

    /// フラッシュメッセージを設定してリダイレクトレスポンスを構築する
    ///
    /// ルート名があれば解決先へ、なければ遷移元（Referer、無ければ `/`）へ。
    /// フラッシュは次のリクエストで1回だけ読める
    pub fn redirect_with_flash_message(
        &self,
        key: &str,
        message: &str,
        route: Option<&str>,
        parameters: &[&str],
        status: u16,
        headers: HashMap<String, String>,
    ) -> Result<Response, Error> {
        self.session.flash(key, message)?;

        let target = match route {
            Some(name) => self.routes.url_for(name, parameters)?,
            None => self.request.referrer().unwrap_or("/").to_string(),
        };

        debug!("Redirecting with flash '{}' to {}", key, target);
        let response = Response::redirect(target, status)?;
        Ok(ResponseBuilder::from(response).headers_checked(headers).build())
    }

    /// 共有中のビューコンテキストを取得
    pub fn view_context(&self) -> &ViewContext {
        &self.view_context
    }

    /// ビューレンダラーを取得
    pub fn views(&self) -> &dyn ViewRenderer {
        self.views.as_ref()
    }

    /// セッションストアを取得
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// 名前付きルートマップを取得
    pub fn routes(&self) -> &RouteMap {
        &self.routes
    }

    /// ローカライズカタログを取得
    pub fn lang(&self) -> &Translator {
        &self.lang
    }

    /// アプリケーション設定を取得
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 処理中のリクエストを取得
    pub fn request(&self) -> &Request {
        &self.request
    }
}

/// Helpersを構築するためのビルダー
///
/// 各コラボレーターには差し替え可能な既定実装が入る
pub struct HelpersBuilder {
    request: Request,
    config: AppConfig,
    lang: Arc<Translator>,
    views: Arc<dyn ViewRenderer>,
    session: Arc<dyn SessionStore>,
    routes: Arc<RouteMap>,
    clock: Arc<dyn Clock>,
}

impl HelpersBuilder {
    /// 対象リクエストから新しいHelpersBuilderを作成
    pub fn new(request: Request) -> Self {
        Self {
            request,
            config: AppConfig::default(),
            lang: Arc::new(Translator::default()),
            views: Arc::new(TemplateRegistry::new()),
            session: Arc::new(MemorySession::new()),
            routes: Arc::new(RouteMap::new()),
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// アプリケーション設定を指定
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// ローカライズカタログを指定
    pub fn lang(mut self, lang: Arc<Translator>) -> Self {
        self.lang = lang;
        self
    }

    /// ビューレンダラーを指定
    pub fn views(mut self, views: Arc<dyn ViewRenderer>) -> Self {
        self.views = views;
        self
    }

    /// セッションストアを指定
    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = session;
        self
    }

    /// 名前付きルートマップを指定
    pub fn routes(mut self, routes: Arc<RouteMap>) -> Self {
        self.routes = routes;
        self
    }

    /// 時計を指定
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Helpersを構築して返却（構築時刻をリクエスト開始時刻として記録）
    pub fn build(self) -> Helpers {
        let started_at = self.clock.now();
        Helpers {
            config: self.config,
            lang: self.lang,
            views: self.views,
            session: self.session,
            routes: self.routes,
            clock: self.clock,
            view_context: Arc::new(ViewContext::new()),
            request: self.request,
            started_at,
        }
    }
}
