//! Health-check handlers.
//!
//! | Check | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/health` | Is the process alive? Never consults the store. |
//! | **Readiness** | `/ready` | Can the record store be reached? |
//!
//! `/health` is what the reverse proxy and the deploy pipeline poll, so its
//! body is fixed: `{"status":"healthy","components":{"application":"running"}}`.

use http::StatusCode;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{Request, Response};

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
    components: Components,
}

#[derive(Serialize)]
struct Components {
    application: &'static str,
}

/// Liveness check handler.
///
/// `200 OK` with the healthy report; `503` with `{"status":"unhealthy","error":…}`
/// if the report cannot be built.
pub async fn liveness(_req: Request) -> Response {
    info!("application is running");
    let report = Liveness { status: "healthy", components: Components { application: "running" } };
    match serde_json::to_vec(&report) {
        Ok(body) => Response::json(body),
        Err(e) => unhealthy(&e.to_string()),
    }
}

fn unhealthy(error: &str) -> Response {
    warn!(error, "health report failed");
    Response::builder()
        .status(StatusCode::SERVICE_UNAVAILABLE)
        .json(json!({ "status": "unhealthy", "error": error }).to_string())
}

/// Readiness response for a store that did or did not answer its ping.
pub fn readiness(store_reachable: bool) -> Response {
    if store_reachable {
        Response::json(r#"{"status":"ready"}"#)
    } else {
        warn!("record store did not answer ping");
        Response::builder()
            .status(StatusCode::SERVICE_UNAVAILABLE)
            .json(r#"{"status":"unavailable"}"#)
    }
}
