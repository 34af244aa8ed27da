//! インテグレーションテスト

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use ctrlbridge::common::http::{Method, Request, Response, ResponseBuilder, Scheme};
    use ctrlbridge::common::{from_async_fn, from_fn, Controller};
    use ctrlbridge::config::AppConfig;
    use ctrlbridge::error::Error;
    use ctrlbridge::helpers::Helpers;
    use ctrlbridge::lang::Translator;
    use ctrlbridge::routing::RouteMap;
    use ctrlbridge::view::TemplateRegistry;
    use ctrlbridge::CtrlBridge;

    fn demo_app() -> CtrlBridge {
        CtrlBridge::builder()
            .config(AppConfig::default().with_app_name("Demo Shop"))
            .lang(Translator::new("en").add_line("en", "app.title", "Demo Shop"))
            .routes(RouteMap::new().register("home", "/").register("user.show", "/users/{id}"))
            .views(TemplateRegistry::new().register(
                "home",
                "<title>{{ title }}</title><h1>{{ app_name }}</h1><p>{{ status }}</p>",
            ))
            .build()
    }

    // ホーム画面コントローラー（フラッシュがあれば表示）
    fn home_controller(_req: Request, helpers: &Helpers) -> Result<Response, Error> {
        if let Some(status) = helpers.session().take_flash("status")? {
            helpers.view_context().share("status", status);
        }
        let html = helpers.views().render("home", helpers.view_context())?;
        Ok(ResponseBuilder::new(200).html(html).build())
    }

    #[tokio::test]
    async fn test_flash_message_round_trip() {
        let app = demo_app();

        // 保存コントローラーはフラッシュを積んで名前付きルートへ303
        let save = from_fn(|_req: Request, helpers: &Helpers| {
            helpers.redirect_with_flash_message(
                "status",
                "Settings saved!",
                Some("home"),
                &[],
                303,
                HashMap::new(),
            )
        });

        let save_req = Request::new(Method::POST, "/settings".to_string())
            .with_header("Referer", "http://localhost/settings");
        let redirect = app.dispatch(&save, save_req).await.unwrap();

        assert_eq!(redirect.status, 303);
        assert_eq!(redirect.location(), Some("/"));

        // 次のリクエストでフラッシュが1回だけ表示される
        let home = from_fn(home_controller);
        let first = app
            .dispatch(&home, Request::new(Method::GET, "/".to_string()))
            .await
            .unwrap();
        let body = String::from_utf8(first.body.unwrap()).unwrap();
        assert!(body.contains("<p>Settings saved!</p>"));

        // 2回目のリクエストではもう消えている
        let second = app
            .dispatch(&home, Request::new(Method::GET, "/".to_string()))
            .await
            .unwrap();
        let body = String::from_utf8(second.body.unwrap()).unwrap();
        assert!(body.contains("<p></p>"));
    }

    #[tokio::test]
    async fn test_https_enforcement_short_circuits_controller() {
        let app = CtrlBridge::builder()
            .config(AppConfig::default().with_force_https(true))
            .build();

        let invoked = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&invoked);
        let controller = from_fn(move |_req: Request, _helpers: &Helpers| {
            flag.store(true, Ordering::SeqCst);
            Ok(Response::ok())
        });

        let insecure = Request::new(Method::GET, "/dashboard".to_string()).with_host("example.com");
        let response = app.dispatch(&controller, insecure).await.unwrap();

        assert_eq!(response.status, 302);
        assert_eq!(response.location(), Some("https://example.com/dashboard"));
        // コントローラーは呼ばれない
        assert!(!invoked.load(Ordering::SeqCst));

        // セキュアなリクエストはそのまま通る
        let secure = Request::new(Method::GET, "/dashboard".to_string())
            .with_scheme(Scheme::Https)
            .with_host("example.com");
        let response = app.dispatch(&controller, secure).await.unwrap();
        assert_eq!(response.status, 200);
        assert!(invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_route_not_found_falls_back_to_404_view() {
        let app = demo_app();

        let controller = from_fn(|req: Request, _helpers: &Helpers| {
            Err(Error::RouteNotFound(req.path))
        });

        let response = app
            .dispatch(&controller, Request::new(Method::GET, "/no/such/page".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        let body = String::from_utf8(response.body.unwrap()).unwrap();
        assert!(body.contains("404 Not Found"));
        // init_base_controllerの共有データがビューへ届いている
        assert!(body.contains("<title>Demo Shop</title>"));
    }

    #[tokio::test]
    async fn test_other_controller_errors_propagate() {
        let app = demo_app();

        let controller = from_fn(|_req: Request, helpers: &Helpers| {
            // 登録されていないビューのレンダリングは失敗する
            let html = helpers.views().render("missing", helpers.view_context())?;
            Ok(ResponseBuilder::new(200).html(html).build())
        });

        let err = app
            .dispatch(&controller, Request::new(Method::GET, "/".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ViewNotFound(_)));
    }

    #[tokio::test]
    async fn test_async_controller_adapter() {
        let app = demo_app();

        let controller = from_async_fn(|_req: Request, helpers: Helpers| async move {
            helpers.set_page_title("Async Page");
            let html = helpers.views().render("home", helpers.view_context())?;
            Ok(ResponseBuilder::new(200).html(html).build())
        });

        let response = app
            .dispatch(&controller, Request::new(Method::GET, "/".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let body = String::from_utf8(response.body.unwrap()).unwrap();
        assert!(body.contains("<title>Async Page</title>"));
    }

    /// Controllerを直接実装する構造体でも注入が受けられる
    struct ProfileController;

    #[async_trait::async_trait]
    impl Controller for ProfileController {
        async fn handle(&self, _req: Request, helpers: &Helpers) -> Result<Response, Error> {
            let url = helpers.routes().url_for("user.show", &["42"])?;
            Response::redirect(url, 302)
        }
    }

    #[tokio::test]
    async fn test_struct_controller_uses_named_routes() {
        let app = demo_app();

        let response = app
            .dispatch(&ProfileController, Request::new(Method::GET, "/me".to_string()))
            .await
            .unwrap();

        assert_eq!(response.location(), Some("/users/42"));
    }
}
