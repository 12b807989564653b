use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Extracts the authenticated business's id from request extensions.
///
/// This extractor is intended for routes wrapped by `RequireAuth`, which
/// validates the session and inserts the identity into request extensions.
///
/// If the identity is not present (e.g., the gate was not applied to the
/// route), this extractor returns `AppError::Unauthorized`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedBusiness(pub Uuid);

impl FromRequest for AuthenticatedBusiness {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedBusiness>().copied() {
            Some(identity) => ready(Ok(identity)),
            None => {
                // Only reachable when a handler that expects authentication is
                // registered without the gate. Unauthorized is the safe answer.
                let err = AppError::Unauthorized(
                    "Business identity not found in request. Ensure RequireAuth is active."
                        .to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
