//! Route handlers and the shared state they see.
//!
//! A [`Router<St>`](crate::Router) owns one `Arc<St>`. Handlers come in two
//! shapes, told apart by a marker type so both can be registered on the
//! same router:
//!
//! ```text
//! async fn liveness(req: Request) -> Response                 ← Stateless
//! async fn add(self: Arc<App<S, R>>, req: Request) -> Response ← Stateful
//! ```
//!
//! Either shape is boxed into an `Arc<dyn ErasedHandler<St>>` at
//! registration, and every call receives a clone of the router's state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` because it appears in the return type of
/// [`Handler::into_boxed_handler`].
#[doc(hidden)]
pub trait ErasedHandler<St> {
    fn call(&self, state: Arc<St>, req: Request) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedHandler<St> = Arc<dyn ErasedHandler<St> + Send + Sync + 'static>;

/// Marker for handlers that ignore the router state: `Fn(Request)`.
pub enum Stateless {}

/// Marker for handlers that take the router state: `Fn(Arc<St>, Request)`.
pub enum Stateful {}

/// Implemented for every valid route handler on a `Router<St>`.
///
/// Never implemented by hand; the blanket impls below cover both shapes.
/// `M` is [`Stateless`] or [`Stateful`] and is always inferred.
pub trait Handler<M, St>: private::Sealed<M, St> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<St>;
}

mod private {
    pub trait Sealed<M, St> {}
}

impl<F, Fut, R, St> private::Sealed<Stateless, St> for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R, St> Handler<Stateless, St> for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    St: Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<St> {
        Arc::new(IgnoresState(self))
    }
}

impl<F, Fut, R, St> private::Sealed<Stateful, St> for F
where
    F: Fn(Arc<St>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R, St> Handler<Stateful, St> for F
where
    F: Fn(Arc<St>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    St: Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<St> {
        Arc::new(TakesState(self))
    }
}

/// Wraps an `Fn(Request)`; the state is dropped on the way in.
struct IgnoresState<F>(F);

impl<F, Fut, R, St> ErasedHandler<St> for IgnoresState<F>
where
    F: Fn(Request) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, _state: Arc<St>, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Wraps an `Fn(Arc<St>, Request)`.
struct TakesState<F>(F);

impl<F, Fut, R, St> ErasedHandler<St> for TakesState<F>
where
    F: Fn(Arc<St>, Request) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, state: Arc<St>, req: Request) -> BoxFuture {
        let fut = (self.0)(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}
