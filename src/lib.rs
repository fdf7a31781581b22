//! # workprofile
//!
//! The web tier of a three-tier person directory: a reverse proxy in
//! front, this service in the middle, a record store behind it.
//!
//! ## The contract
//!
//! The proxy handles TLS, timeouts, and body-size limits. This crate
//! handles routing and the response contract of four operations on the
//! person record: list, create, delete, and liveness.
//!
//! The store and the page renderer are injected, so the application core
//! only knows the [`RecordStore`] and [`ViewRenderer`] traits. The assembled
//! [`App`] is the router's shared state; its methods are the handlers:
//!
//! ```rust,no_run
//! use workprofile::{App, Config, MemoryStore, PageRenderer, Server, routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), workprofile::Error> {
//!     let config = Config::default();
//!     let server = Server::bind(config.listen).await?;
//!     let app = App::new(config, MemoryStore::new(), PageRenderer);
//!     server.serve(routes(app)).await
//! }
//! ```
//!
//! The HTTP layer underneath is small: radix-tree routing via [`matchit`]
//! with typed `{id:int}` segments, hyper connections, and graceful
//! shutdown on SIGTERM / Ctrl-C.

mod app;
mod config;
mod error;
mod handler;
mod payload;
mod person;
mod request;
mod response;
mod router;
mod server;
mod store;
mod view;

pub mod health;

pub use app::{App, routes};
pub use config::{Args, Config, load_env_file};
pub use error::Error;
pub use handler::{Handler, Stateful, Stateless};
pub use payload::Payload;
pub use person::{FieldError, NewPerson, Person, REQUIRED_FIELDS};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use store::{MemoryStore, RecordStore, StoreError};
pub use view::{INDEX, PageRenderer, RenderError, SCRIPT, ViewRenderer};
