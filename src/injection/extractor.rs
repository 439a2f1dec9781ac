//! Axum extractors resolving services from a container per request.

use std::ops::Deref;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::container::{get_container, Container};
use crate::errors::AppError;

/// Resolves `T` from the `Arc<Container>` held in router state.
///
/// # Example
/// ```ignore
/// async fn send(Inject(mailer): Inject<dyn Mailer>) -> impl IntoResponse {
///     mailer.send("hi").await
/// }
/// ```
pub struct Inject<T: ?Sized>(pub Arc<T>);

#[async_trait]
impl<S, T> FromRequestParts<S> for Inject<T>
where
    S: Send + Sync,
    Arc<Container>: FromRef<S>,
    T: ?Sized + Send + Sync + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let container = Arc::<Container>::from_ref(state);
        container.get::<T>().map(Inject)
    }
}

impl<T: ?Sized> Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Resolves `T` from the process-wide container; works with any state.
pub struct InjectGlobal<T: ?Sized>(pub Arc<T>);

#[async_trait]
impl<S, T> FromRequestParts<S> for InjectGlobal<T>
where
    S: Send + Sync,
    T: ?Sized + Send + Sync + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        get_container().get::<T>().map(InjectGlobal)
    }
}

impl<T: ?Sized> Deref for InjectGlobal<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
