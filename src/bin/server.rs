//! Preview a generated control panel in the browser. Setter calls from the
//! panel are applied to an in-process parameter store instead of a simulation.
//!
//! Usage: `paramgen-preview [parameters.json] [--bind ADDR] [--static-dir DIR]`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use paramgen::config::GeneratorConfig;
use paramgen::param::ParamSet;
use paramgen::store::{ParamStore, SetCall};

#[derive(Parser, Debug)]
#[command(name = "paramgen-preview")]
#[command(about = "Serve a generated control panel wired to an in-process parameter store")]
struct Cli {
    /// Parameter description (JSON object keyed by identifier)
    #[arg(default_value = "parameters.json")]
    input: PathBuf,

    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Extra static files served for unknown paths
    #[arg(long = "static-dir", default_value = "frontend")]
    static_dir: PathBuf,
}

#[derive(Clone)]
struct AppState {
    panel: Arc<String>,
    store: Arc<Mutex<ParamStore>>,
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>paramgen preview</title>
</head>
<body style="background-color:#202020; display:flex;">
<div id="controls" style="width:40%; padding:8px;"></div>
<pre id="state" style="color:#d0d0d0; width:60%; padding:8px;"></pre>
<script>
async function sendParam(call) {
    const res = await fetch("/api/param", {
        method: "POST",
        headers: {"Content-Type": "application/json"},
        body: JSON.stringify(call),
    });
    const body = await res.json();
    document.getElementById("state").textContent = JSON.stringify(body, null, 2);
}
const Module = {
    set_int_param: (code, value) =>
        sendParam({setter: "set_int_param", code, value}),
    set_float_param: (code, value) =>
        sendParam({setter: "set_float_param", code, value}),
    set_bool_param: (code, value) =>
        sendParam({setter: "set_bool_param", code, value}),
    set_vec_param: (code, elem_count, index, value) =>
        sendParam({setter: "set_vec_param", code, elem_count, index, value}),
    set_ivec_param: (code, elem_count, index, value) =>
        sendParam({setter: "set_ivec_param", code, elem_count, index, value}),
    set_string_param: (code, index, value) =>
        sendParam({setter: "set_string_param", code, index, value}),
};
fetch("/api/params").then(r => r.json()).then(body => {
    document.getElementById("state").textContent = JSON.stringify(body, null, 2);
});
</script>
<script src="/sliders.js"></script>
</body>
</html>
"#;

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn panel_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        state.panel.as_str().to_owned(),
    )
}

async fn params_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.lock().await.snapshot())
}

async fn set_param_handler(
    State(state): State<AppState>,
    Json(call): Json<SetCall>,
) -> impl IntoResponse {
    let mut store = state.store.lock().await;
    match store.apply(call.clone()) {
        Ok(()) => {
            info!("{:?}", call);
            (StatusCode::OK, Json(json!(store.snapshot())))
        }
        Err(err) => {
            warn!("Rejected {:?}: {err}", call);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}

#[tokio::main]
async fn main() {
    paramgen::init_logging();

    let cli = Cli::parse();

    let params = match ParamSet::load(&cli.input) {
        Ok(params) => params,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    let (artifacts, _) = match paramgen::generate(&params, &GeneratorConfig::default()) {
        Ok(out) => out,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    let state = AppState {
        panel: Arc::new(artifacts.panel),
        store: Arc::new(Mutex::new(ParamStore::new(&params))),
    };

    info!("Serving static files from: {}", cli.static_dir.display());

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/sliders.js", get(panel_handler))
        .route("/api/params", get(params_handler))
        .route("/api/param", post(set_param_handler))
        .fallback_service(ServeDir::new(cli.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(cli.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {}: {err}", cli.bind);
            std::process::exit(1);
        }
    };

    info!("paramgen preview at http://{}", cli.bind);

    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {err}");
    }
}
