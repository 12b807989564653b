use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a business entity as stored in the database and returned by the API.
///
/// The password hash lives in the same table but is deliberately absent here;
/// credential checks query it separately so it can never leak through
/// serialization.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Business {
    /// Unique identifier for the business (UUID v4).
    pub id: Uuid,
    /// Display name of the business.
    pub name: String,
    /// Contact email, also the login identity. Unique.
    pub email: String,
    /// Category the business belongs to (e.g. "bakery", "plumber").
    pub business_type: String,
    /// Free-text location (address, neighborhood, city).
    pub location: String,
    /// Latitude in decimal degrees, when the business has been geocoded.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, when the business has been geocoded.
    pub longitude: Option<f64>,
    /// Optional longer description shown on the profile.
    pub description: Option<String>,
    /// Timestamp of when the business registered.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last profile update.
    pub updated_at: DateTime<Utc>,
}

/// Partial update payload for a business profile.
///
/// All fields are optional; only the ones present are written. Email and
/// password changes are out of scope for profile updates.
#[derive(Debug, Deserialize, Validate)]
pub struct BusinessUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub business_type: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub location: Option<String>,
    /// Bounds-checked by the handler.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl BusinessUpdate {
    /// Returns true when the payload carries no field at all, which a PATCH
    /// handler should reject rather than issue an empty UPDATE.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.business_type.is_none()
            && self.location.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.description.is_none()
    }
}
