use std::collections::HashMap;

use log::info;

use ctrlbridge::common::http::{Method, Request, Response, ResponseBuilder, Scheme};
use ctrlbridge::common::{from_async_fn, from_fn};
use ctrlbridge::config::AppConfig;
use ctrlbridge::error::Error;
use ctrlbridge::helpers::Helpers;
use ctrlbridge::lang::Translator;
use ctrlbridge::routing::RouteMap;
use ctrlbridge::view::TemplateRegistry;
use ctrlbridge::CtrlBridge;

// ホーム画面を描画するコントローラー
fn home_controller(_req: Request, helpers: &Helpers) -> Result<Response, Error> {
    helpers.set_page_title("Home");

    // 直前のリクエストで設定されたフラッシュメッセージがあれば共有
    if let Some(status) = helpers.session().take_flash("status")? {
        helpers.view_context().share("status", status);
    }

    let html = helpers.views().render("home", helpers.view_context())?;
    Ok(ResponseBuilder::new(200).html(html).build())
}

// 設定を保存してフラッシュメッセージ付きでホームへ戻るコントローラー
async fn save_settings_controller(req: Request, helpers: Helpers) -> Result<Response, Error> {
    if let Some(body) = &req.body {
        info!("Saving settings payload of {} bytes", body.len());
    }

    helpers.redirect_with_flash_message(
        "status",
        "Settings saved!",
        Some("home"),
        &[],
        303,
        HashMap::new(),
    )
}

async fn run_demo(app: &CtrlBridge) -> Result<(), Error> {
    let home = from_fn(home_controller);
    let save = from_async_fn(save_settings_controller);

    // 非セキュアなリクエストはhttpsへリダイレクトされる
    let insecure = Request::new(Method::GET, "/".to_string()).with_host("demo.local");
    let response = app.dispatch(&home, insecure).await?;
    println!("GET / (http)   -> {} {:?}", response.status, response.location());

    // 設定保存はフラッシュメッセージ付きでホームへ303リダイレクト
    let save_req = Request::new(Method::POST, "/settings".to_string())
        .with_scheme(Scheme::Https)
        .with_host("demo.local")
        .with_header("Referer", "https://demo.local/settings")
        .with_body(b"theme=dark".to_vec());
    let response = app.dispatch(&save, save_req).await?;
    println!("POST /settings -> {} {:?}", response.status, response.location());

    // 次のリクエストでフラッシュメッセージが1回だけ表示される
    let next = Request::new(Method::GET, "/".to_string())
        .with_scheme(Scheme::Https)
        .with_host("demo.local");
    let response = app.dispatch(&home, next).await?;
    let body = response.body.map(|b| String::from_utf8_lossy(&b).into_owned());
    println!("GET / (https)  -> {} {}", response.status, body.unwrap_or_default());

    Ok(())
}

#[tokio::main]
async fn main() {
    // ロガーの初期化
    env_logger::init();

    // アプリケーションの構築
    let app = CtrlBridge::builder()
        .config(AppConfig::from_env().with_force_https(true))
        .lang(Translator::new("en").add_line("en", "app.title", "CtrlBridge Demo"))
        .routes(RouteMap::new().register("home", "/").register("user.show", "/users/{id}"))
        .views(TemplateRegistry::new().register(
            "home",
            "<html><head><title>{{ title }}</title></head>\
             <body><h1>{{ app_name }}</h1><p>{{ status }}</p></body></html>",
        ))
        .build();

    info!("Starting ctrlbridge demo");

    if let Err(e) = run_demo(&app).await {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}
