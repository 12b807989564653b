use std::rc::Rc;

use actix_web::{
    cookie::Cookie,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::config::SessionConfig;
use crate::error::AppError;
use crate::session::{cookie, Session, SessionStore};

/// Session middleware.
///
/// Before the inner service runs, the incoming cookie (if any) is verified and
/// resolved against the store, and the resulting [`Session`] handle is placed
/// in request extensions. A missing, tampered, expired, or stale cookie yields
/// a fresh anonymous session; it is never an error by itself.
///
/// After the inner service responds, the session is persisted only if the
/// request changed it, and a `Set-Cookie` is attached only the first time a
/// session acquires an id.
pub struct SessionLayer {
    cookie_name: Rc<String>,
    secret: Rc<String>,
    store: SessionStore,
}

impl SessionLayer {
    /// Builds the layer from explicit configuration; nothing is read from the
    /// environment at request time.
    pub fn new(config: &SessionConfig, store: SessionStore) -> Self {
        SessionLayer {
            cookie_name: Rc::new(config.cookie_name.clone()),
            secret: Rc::new(config.secret.clone()),
            store,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionLayerService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionLayerService {
            service,
            cookie_name: self.cookie_name.clone(),
            secret: self.secret.clone(),
            store: self.store.clone(),
        }))
    }
}

pub struct SessionLayerService<S> {
    service: S,
    cookie_name: Rc<String>,
    secret: Rc<String>,
    store: SessionStore,
}

impl<S, B> Service<ServiceRequest> for SessionLayerService<S>
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
        let session = match req.cookie(self.cookie_name.as_str()) {
            Some(session_cookie) => match cookie::open(session_cookie.value(), &self.secret) {
                Ok(sid) => match self.store.load(&sid) {
                    Some(data) => Session::resumed(sid, data),
                    // Valid signature but the store no longer knows the id.
                    None => Session::anonymous(),
                },
                Err(e) => {
                    log::debug!("discarding session cookie: {}", e);
                    Session::anonymous()
                }
            },
            None => Session::anonymous(),
        };

        req.extensions_mut().insert(session.clone());

        let fut = self.service.call(req);
        let store = self.store.clone();
        let cookie_name = self.cookie_name.clone();
        let secret = self.secret.clone();

        Box::pin(async move {
            let mut res = fut.await?;

            if session.is_changed() {
                let is_new = session.id().is_none();
                let sid = session.ensure_id();
                store.save(sid, session.data());

                if is_new {
                    let token = cookie::seal(sid, &secret)?;
                    let session_cookie = Cookie::build(cookie_name.as_str(), token)
                        .path("/")
                        .http_only(true)
                        .finish();
                    res.response_mut().add_cookie(&session_cookie).map_err(|e| {
                        AppError::InternalServerError(format!(
                            "Failed to attach session cookie: {}",
                            e
                        ))
                    })?;
                }
            }

            Ok(res)
        })
    }
}
