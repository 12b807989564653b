//!
//! # Cookie-Backed Sessions
//!
//! Server-tracked sessions keyed by an opaque, signed token held by the client.
//! `SessionLayer` loads (or lazily creates) the per-request [`Session`] handle and
//! persists it after the response; handlers receive the handle through the
//! `FromRequest` extractor below, so session state is explicit per-request
//! context rather than ambient process state.
//!
//! Persistence rules match the classic session-middleware contract:
//! an unchanged session is never rewritten, and a session that was never
//! written to is never stored and produces no cookie.

pub mod cookie;
pub mod middleware;
pub mod store;

pub use middleware::SessionLayer;
pub use store::SessionStore;

use std::cell::RefCell;
use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Business;

/// State carried by one session record.
///
/// `user` is a JSON mapping: the empty mapping means unauthenticated, and
/// logout resets it to the empty mapping rather than deleting the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub user: Map<String, Value>,
}

#[derive(Debug)]
struct SessionInner {
    id: Option<Uuid>,
    data: SessionData,
    changed: bool,
}

/// Per-request session handle.
///
/// Cloning is cheap; all clones observe the same state for the duration of the
/// request. The middleware keeps one clone to decide, after the handler runs,
/// whether anything needs persisting.
#[derive(Debug, Clone)]
pub struct Session(Rc<RefCell<SessionInner>>);

impl Session {
    /// A fresh session with no backing store record yet.
    pub fn anonymous() -> Self {
        Session(Rc::new(RefCell::new(SessionInner {
            id: None,
            data: SessionData::default(),
            changed: false,
        })))
    }

    /// A session resumed from the store under a verified id.
    pub fn resumed(id: Uuid, data: SessionData) -> Self {
        Session(Rc::new(RefCell::new(SessionInner {
            id: Some(id),
            data,
            changed: false,
        })))
    }

    /// Snapshot of the `user` mapping.
    pub fn user(&self) -> Map<String, Value> {
        self.0.borrow().data.user.clone()
    }

    /// Records the given business as the session's authenticated principal.
    pub fn set_business(&self, business: &Business) {
        let mut user = Map::new();
        user.insert(
            "business_id".to_string(),
            Value::String(business.id.to_string()),
        );
        user.insert("name".to_string(), Value::String(business.name.clone()));
        self.set_user(user);
    }

    /// Replaces the `user` mapping. Marks the session changed only when the
    /// value actually differs.
    pub fn set_user(&self, user: Map<String, Value>) {
        let mut inner = self.0.borrow_mut();
        if inner.data.user != user {
            inner.data.user = user;
            inner.changed = true;
        }
    }

    /// Resets `user` to the empty mapping. Used by logout.
    pub fn clear_user(&self) {
        self.set_user(Map::new());
    }

    /// The authenticated business id, if the session carries one.
    pub fn business_id(&self) -> Option<Uuid> {
        self.0
            .borrow()
            .data
            .user
            .get("business_id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn is_authenticated(&self) -> bool {
        self.business_id().is_some()
    }

    /// The backing store id, once one exists.
    pub fn id(&self) -> Option<Uuid> {
        self.0.borrow().id
    }

    /// Whether the request mutated the session.
    pub fn is_changed(&self) -> bool {
        self.0.borrow().changed
    }

    /// Snapshot of the full session data for persisting.
    pub fn data(&self) -> SessionData {
        self.0.borrow().data.clone()
    }

    /// Returns the session id, minting one on first use.
    pub(crate) fn ensure_id(&self) -> Uuid {
        let mut inner = self.0.borrow_mut();
        *inner.id.get_or_insert_with(Uuid::new_v4)
    }
}

/// Extracts the request's [`Session`] handle from request extensions.
///
/// `SessionLayer` inserts the handle before any handler runs; if it is missing
/// the application was assembled without the session middleware, which is a
/// server misconfiguration rather than a client error.
impl FromRequest for Session {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Session>().cloned() {
            Some(session) => ready(Ok(session)),
            None => {
                let err = AppError::InternalServerError(
                    "Session not found in request. Ensure SessionLayer is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
