//! ヘルパーファサードのユニットテスト

use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::{FixedClock, MockClock};
use crate::common::http::{Method, Request, Scheme};
use crate::common::ViewContext;
use crate::config::AppConfig;
use crate::error::Error;
use crate::helpers::{Helpers, MessageCatalog};
use crate::lang::Translator;
use crate::routing::RouteMap;
use crate::session::MockSessionStore;
use crate::view::ViewRenderer;

/// レンダリングが常に失敗するテスト用レンダラー
struct FailingRenderer;

impl ViewRenderer for FailingRenderer {
    fn exists(&self, _name: &str) -> bool {
        true
    }

    fn render(&self, name: &str, _context: &ViewContext) -> Result<String, Error> {
        Err(Error::RenderError(format!("render failed for {}", name)))
    }
}

fn fixed_helpers(request: Request) -> Helpers {
    Helpers::builder(request)
        .clock(Arc::new(FixedClock::at(1_000.0)))
        .build()
}

#[test]
fn test_current_time_difference_all_units() {
    let helpers = fixed_helpers(Request::new(Method::GET, "/".to_string()));

    // 90.5秒前のタイムスタンプ
    let record = 1_000.0 - 90.5;

    assert_eq!(helpers.current_time_difference(record, "ms").unwrap(), 90_500);
    assert_eq!(helpers.current_time_difference(record, "s").unwrap(), 90);
    assert_eq!(helpers.current_time_difference(record, "m").unwrap(), 1);
}

#[test]
fn test_current_time_difference_truncates() {
    let helpers = fixed_helpers(Request::new(Method::GET, "/".to_string()));

    // 59.9秒は0分に切り捨て
    assert_eq!(helpers.current_time_difference(1_000.0 - 59.9, "m").unwrap(), 0);
}

#[test]
fn test_current_time_difference_invalid_unit() {
    let helpers = fixed_helpers(Request::new(Method::GET, "/".to_string()));

    let err = helpers.current_time_difference(990.0, "hours").unwrap_err();
    assert!(matches!(err, Error::InvalidTimeUnit(ref u) if u == "hours"));
}

#[test]
fn test_current_time_difference_uses_injected_clock() {
    let mut clock = MockClock::new();
    // build時とcurrent_time_difference時の2回読まれる
    clock.expect_now().times(2).return_const(500.0f64);

    let helpers = Helpers::builder(Request::new(Method::GET, "/".to_string()))
        .clock(Arc::new(clock))
        .build();

    assert_eq!(helpers.current_time_difference(440.0, "s").unwrap(), 60);
}

#[test]
fn test_force_ssl_on_insecure_request() {
    let request = Request::new(Method::GET, "/dashboard".to_string())
        .with_host("example.com")
        .with_query_string("tab=settings");
    let helpers = fixed_helpers(request);

    let redirect = helpers.force_ssl().expect("insecure request should redirect");
    assert_eq!(redirect.status, 302);
    assert_eq!(
        redirect.location(),
        Some("https://example.com/dashboard?tab=settings")
    );
}

#[test]
fn test_force_ssl_on_secure_request() {
    let request = Request::new(Method::GET, "/dashboard".to_string())
        .with_scheme(Scheme::Https)
        .with_host("example.com");
    let helpers = fixed_helpers(request);

    assert!(helpers.force_ssl().is_none());
}

#[test]
fn test_force_404_renders_view() {
    let helpers = fixed_helpers(Request::new(Method::GET, "/missing".to_string()));
    helpers.init_base_controller();

    let response = helpers.force_404();

    assert_eq!(response.status, 404);
    assert_eq!(
        response.headers.get("Content-Type"),
        Some(&"text/html; charset=utf-8".to_string())
    );
    let body = String::from_utf8(response.body.unwrap()).unwrap();
    assert!(body.contains("404 Not Found"));
    // init_base_controllerが共有したタイトルが埋め込まれる
    assert!(body.contains("<title>ctrlbridge</title>"));
}

#[test]
fn test_force_404_falls_back_on_render_failure() {
    let helpers = Helpers::builder(Request::new(Method::GET, "/missing".to_string()))
        .views(Arc::new(FailingRenderer))
        .clock(Arc::new(FixedClock::at(1_000.0)))
        .build();

    let response = helpers.force_404();

    // 失敗しても404レスポンス自体は返る
    assert_eq!(response.status, 404);
    let body = String::from_utf8(response.body.unwrap()).unwrap();
    assert_eq!(body, "Not Found");
}

#[test]
fn test_redirect_with_flash_to_referrer() {
    let request = Request::new(Method::POST, "/settings".to_string())
        .with_header("Referer", "https://example.com/settings");
    let helpers = fixed_helpers(request);

    let response = helpers
        .redirect_with_flash_message("status", "Saved!", None, &[], 302, HashMap::new())
        .unwrap();

    assert_eq!(response.status, 302);
    assert_eq!(response.location(), Some("https://example.com/settings"));
    // フラッシュが書き込まれ、1回だけ読める
    assert_eq!(
        helpers.session().take_flash("status").unwrap(),
        Some("Saved!".to_string())
    );
    assert_eq!(helpers.session().take_flash("status").unwrap(), None);
}

#[test]
fn test_redirect_with_flash_without_referrer_goes_root() {
    let helpers = fixed_helpers(Request::new(Method::POST, "/settings".to_string()));

    let response = helpers
        .redirect_with_flash_message("status", "Saved!", None, &[], 302, HashMap::new())
        .unwrap();

    assert_eq!(response.location(), Some("/"));
}

#[test]
fn test_redirect_with_flash_to_named_route() {
    let routes = RouteMap::new().register("user.show", "/users/{id}");
    let helpers = Helpers::builder(Request::new(Method::POST, "/users".to_string()))
        .routes(Arc::new(routes))
        .clock(Arc::new(FixedClock::at(1_000.0)))
        .build();

    let response = helpers
        .redirect_with_flash_message("status", "Created!", Some("user.show"), &["7"], 303, HashMap::new())
        .unwrap();

    assert_eq!(response.status, 303);
    assert_eq!(response.location(), Some("/users/7"));
}

#[test]
fn test_redirect_with_flash_unknown_route_propagates() {
    let helpers = fixed_helpers(Request::new(Method::POST, "/users".to_string()));

    let err = helpers
        .redirect_with_flash_message("status", "Created!", Some("nope"), &[], 302, HashMap::new())
        .unwrap_err();

    assert!(matches!(err, Error::RouteNotFound(_)));
}

#[test]
fn test_redirect_with_flash_rejects_non_redirect_status() {
    let helpers = fixed_helpers(Request::new(Method::POST, "/settings".to_string()));

    let err = helpers
        .redirect_with_flash_message("status", "Saved!", None, &[], 200, HashMap::new())
        .unwrap_err();

    assert!(matches!(err, Error::InvalidRedirect(200)));
}

#[test]
fn test_redirect_with_flash_extra_headers_validated() {
    let helpers = fixed_helpers(Request::new(Method::POST, "/settings".to_string()));

    let mut headers = HashMap::new();
    headers.insert("X-Saved".to_string(), "1".to_string());
    headers.insert("X-Evil".to_string(), "bad\r\nvalue".to_string());

    let response = helpers
        .redirect_with_flash_message("status", "Saved!", None, &[], 302, headers)
        .unwrap();

    // 無効なヘッダーだけがスキップされる
    assert_eq!(response.headers.get("X-Saved"), Some(&"1".to_string()));
    assert_eq!(response.headers.get("X-Evil"), None);
}

#[test]
fn test_redirect_with_flash_propagates_session_error() {
    let mut session = MockSessionStore::new();
    session
        .expect_flash()
        .returning(|_, _| Err(Error::SessionError("store offline".to_string())));

    let helpers = Helpers::builder(Request::new(Method::POST, "/settings".to_string()))
        .session(Arc::new(session))
        .clock(Arc::new(FixedClock::at(1_000.0)))
        .build();

    let err = helpers
        .redirect_with_flash_message("status", "Saved!", None, &[], 302, HashMap::new())
        .unwrap_err();

    // コラボレーターのエラーは包み直さずそのまま伝播する
    assert!(matches!(err, Error::SessionError(ref m) if m == "store offline"));
}

#[test]
fn test_init_base_controller_shares_defaults() {
    let config = AppConfig::default().with_app_name("My Shop").with_debug(true);
    let lang = Translator::new("en").add_line("en", "app.title", "My Shop — Home");
    let helpers = Helpers::builder(Request::new(Method::GET, "/".to_string()))
        .config(config)
        .lang(Arc::new(lang))
        .clock(Arc::new(FixedClock::at(1_000.0)))
        .build();

    helpers.init_base_controller();

    let context = helpers.view_context();
    assert_eq!(context.get_string("title"), Some("My Shop — Home".to_string()));
    assert_eq!(context.get_string("app_name"), Some("My Shop".to_string()));
    assert_eq!(context.get("debug"), Some(serde_json::Value::from(true)));
}

#[test]
fn test_init_base_controller_without_lang_entry_uses_app_name() {
    let config = AppConfig::default().with_app_name("My Shop");
    let helpers = Helpers::builder(Request::new(Method::GET, "/".to_string()))
        .config(config)
        .clock(Arc::new(FixedClock::at(1_000.0)))
        .build();

    helpers.init_base_controller();

    assert_eq!(
        helpers.view_context().get_string("title"),
        Some("My Shop".to_string())
    );
}

#[test]
fn test_init_base_controller_twice_is_harmless() {
    let helpers = fixed_helpers(Request::new(Method::GET, "/".to_string()));

    helpers.init_base_controller();
    helpers.set_page_title("Changed");
    helpers.init_base_controller();

    // 再初期化は既定値を共有し直すだけで壊れない
    assert_eq!(
        helpers.view_context().get_string("title"),
        Some("ctrlbridge".to_string())
    );
    assert_eq!(helpers.view_context().keys().len(), 4);
}

#[test]
fn test_set_page_title() {
    let helpers = fixed_helpers(Request::new(Method::GET, "/about".to_string()));

    helpers.set_page_title("About Us");
    assert_eq!(
        helpers.view_context().get_string("title"),
        Some("About Us".to_string())
    );

    // 空文字列もそのまま受け付ける
    helpers.set_page_title("");
    assert_eq!(helpers.view_context().get_string("title"), Some(String::new()));
}

#[test]
fn test_handle_multiple_exceptions_via_facade() {
    let helpers = fixed_helpers(Request::new(Method::GET, "/".to_string()));
    let catalog = MessageCatalog::new().with_message("InvalidArgument", "Bad input");

    let message = helpers
        .handle_multiple_exceptions(Error::InvalidTimeUnit("h".to_string()), &catalog)
        .unwrap();
    assert_eq!(message, "Bad input");

    let err = helpers
        .handle_multiple_exceptions(Error::SessionError("boom".to_string()), &catalog)
        .unwrap_err();
    assert!(matches!(err, Error::SessionError(_)));
}

#[test]
fn test_log_performance_does_not_panic() {
    let mut clock = MockClock::new();
    clock.expect_now().times(2).return_const(1_000.0f64);

    let helpers = Helpers::builder(Request::new(Method::GET, "/".to_string()))
        .clock(Arc::new(clock))
        .build();

    helpers.log_performance();
}
