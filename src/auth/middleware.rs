use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedBusiness;
use crate::session::Session;

/// The authorization gate.
///
/// Wrapped on individual resources; routes without it stay public. The gate
/// consults the request's [`Session`] (inserted earlier by `SessionLayer`):
/// when the session identifies a business, that identity is exposed downstream
/// through request extensions; otherwise the request is rejected with 401 and
/// the inner service is never invoked.
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService { service }))
    }
}

pub struct RequireAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let business_id = req
            .extensions()
            .get::<Session>()
            .and_then(Session::business_id);

        match business_id {
            Some(id) => {
                req.extensions_mut().insert(AuthenticatedBusiness(id));
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            None => {
                let app_err =
                    crate::error::AppError::Unauthorized("Authentication required".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
