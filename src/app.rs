//! The application core: person routes over an injected store and renderer.
//!
//! | Method | Path | Outcome |
//! |---|---|---|
//! | GET | `/` | `200` rendered list, `500` on store or render failure |
//! | DELETE | `/delete/{id:int}` | the store's status (`204` expected) |
//! | POST, PUT | `/add` | the store's status (`201` expected); `404` without a JSON body; `400` when a field is missing; `500` when a field has the wrong type |
//! | GET | `/health` | `200` liveness report |
//! | GET | `/ready` | `200` when the store answers `ping`, else `503` |
//! | GET | `/static/scripts.js` | page script |

use std::sync::Arc;

use http::{Method, StatusCode};
use serde_json::{Map, Value, json};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::health;
use crate::payload::Payload;
use crate::person::{FieldError, NewPerson};
use crate::request::Request;
use crate::response::{ContentType, IntoResponse, Response};
use crate::router::Router;
use crate::store::RecordStore;
use crate::view::{self, ViewRenderer};

/// Request handlers sharing one configuration, store, and renderer.
pub struct App<S, R> {
    config: Config,
    store: S,
    renderer: R,
}

impl<S: RecordStore, R: ViewRenderer> App<S, R> {
    pub fn new(config: Config, store: S, renderer: R) -> Self {
        Self { config, store, renderer }
    }

    /// Renders every record together with the display metadata.
    pub async fn index(self: Arc<Self>, _req: Request) -> Response {
        info!("entering list route");
        let data = match self.store.list().await {
            Ok(data) => data,
            Err(e) => return e.into_response(),
        };

        let context = json!({
            "host_name": self.config.host_name,
            "db_host": self.config.db_host,
            "backend": self.config.backend,
            "data": data,
        });
        self.renderer.render(view::INDEX, &context).map(Response::html).into_response()
    }

    /// Deletes by id. The store's status is returned unchanged.
    pub async fn delete(self: Arc<Self>, req: Request) -> Response {
        // The route's `int` converter has already vetted the segment.
        let Some(id) = req.param("id").and_then(|raw| raw.parse::<u64>().ok()) else {
            return Response::status(StatusCode::NOT_FOUND);
        };
        info!(id, "request to delete person");
        self.store.delete(id).await.into_response()
    }

    /// Creates a person from a JSON body. The store's status is returned unchanged.
    ///
    /// A missing key is the client's fault (`400`). A value of the wrong
    /// type, or a body that is JSON but not an object, fails like the store
    /// would: a bare `500`.
    pub async fn add(self: Arc<Self>, req: Request) -> Response {
        let fields = match req.json_body::<Map<String, Value>>() {
            Payload::Valid(fields) => fields,
            Payload::Absent => {
                error!("request body is empty");
                return Response::status(StatusCode::NOT_FOUND);
            }
            Payload::Invalid(e) => {
                error!("person body is not an object: {e}");
                return Response::status(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        match NewPerson::from_fields(fields) {
            Ok(new) => {
                info!(?new, "request to add person");
                self.store.insert(new.into_person()).await.into_response()
            }
            Err(e @ FieldError::Missing(_)) => {
                warn!("rejecting person body: {e}");
                Response::status(StatusCode::BAD_REQUEST)
            }
            Err(e @ FieldError::Mistyped { .. }) => {
                error!("cannot store person: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub async fn ready(self: Arc<Self>, _req: Request) -> Response {
        health::readiness(self.store.ping().await)
    }
}

/// Builds the router for `app`; the app becomes the router's shared state.
pub fn routes<S: RecordStore, R: ViewRenderer>(app: App<S, R>) -> Router<App<S, R>> {
    Router::with_state(app)
        .get("/", App::<S, R>::index)
        .delete("/delete/{id:int}", App::<S, R>::delete)
        .on_each(&[Method::POST, Method::PUT], "/add", App::<S, R>::add)
        .get("/health", health::liveness)
        .get("/ready", App::<S, R>::ready)
        .get("/static/scripts.js", script)
}

async fn script(_req: Request) -> Response {
    Response::builder().bytes(ContentType::Javascript, view::SCRIPT)
}
