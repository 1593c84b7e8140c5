use anyhow::{Context, Result};
use axum::{extract::ws::WebSocketUpgrade, response::Html, routing::get, Router};
use indoc::formatdoc;
use tracing::{info, warn};

use super::app::app;
use crate::settings::Settings;

fn index_page(reachable_addr: &str) -> String {
    formatdoc! {r#"
        <!DOCTYPE html>
        <html>
            <head>
                <title>Neon</title>
                <meta name="viewport"
                content="width=device-width,
                initial-scale=1,
                minimum-scale=1,
                maximum-scale=1,
                user-scalable=no">
            </head>
            <body> <div id="main"></div> </body>
            {glue}
        </html>
        "#,
        glue = dioxus_liveview::interpreter_glue(&format!("ws://{reachable_addr}/ws"))
    }
}

pub async fn start_server() -> Result<()> {
    let settings = Settings::from_env()?;
    let addr = settings.listen_addr;
    let page = index_page(&settings.reachable_addr);

    let view = dioxus_liveview::LiveViewPool::new();

    let router = Router::new()
        .route("/", get(move || async move { Html(page) }))
        .route(
            "/ws",
            get(move |ws: WebSocketUpgrade| async move {
                ws.on_upgrade(move |socket| async move {
                    if let Err(err) = view.launch(dioxus_liveview::axum_socket(socket), app).await {
                        warn!(?err, "liveview session ended with an error");
                    }
                })
            }),
        );

    info!(
        "Listening on http://{addr}, replies from {}",
        settings.reply_endpoint
    );

    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .await
        .context("server stopped")
}
