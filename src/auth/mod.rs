pub mod extractors;
pub mod middleware;
pub mod password;

use lazy_static::lazy_static;
use serde::Deserialize;
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedBusiness;
pub use middleware::RequireAuth;
pub use password::{hash_password, verify_password};

lazy_static! {
    // Business names: letters, digits, spaces, and common punctuation.
    static ref BUSINESS_NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[\w][\w .,'&-]*$").unwrap();
}

/// Represents the payload for a business login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Business account email address.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Account password.
    /// Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
}

/// Represents the payload for registering a new business.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name of the business.
    /// Must be between 1 and 120 characters of word characters, spaces,
    /// or common punctuation.
    #[validate(
        length(min = 1, max = 120),
        regex(
            path = "BUSINESS_NAME_REGEX",
            message = "Business name contains invalid characters"
        )
    )]
    pub name: String,
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
    /// Category the business belongs to.
    #[validate(length(min = 1, max = 60))]
    pub business_type: String,
    /// Free-text location of the business.
    #[validate(length(min = 1, max = 160))]
    pub location: String,
    /// Latitude in decimal degrees, if known. Bounds-checked by the handler.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if known. Bounds-checked by the handler.
    pub longitude: Option<f64>,
    /// Optional profile description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            name: "Corner Bakery & Co.".to_string(),
            email: "owner@cornerbakery.example".to_string(),
            password: "password123".to_string(),
            business_type: "bakery".to_string(),
            location: "12 Baker St".to_string(),
            latitude: Some(51.52),
            longitude: Some(-0.15),
            description: Some("Fresh bread daily".to_string()),
        }
    }

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());

        let short_password_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "123".to_string(),
        };
        assert!(short_password_login.validate().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        assert!(valid_register().validate().is_ok());

        let mut bad_name = valid_register();
        bad_name.name = "<script>alert(1)</script>".to_string();
        assert!(bad_name.validate().is_err());

        let mut empty_type = valid_register();
        empty_type.business_type = "".to_string();
        assert!(empty_type.validate().is_err());

        let mut short_password = valid_register();
        short_password.password = "short".to_string();
        assert!(short_password.validate().is_err());
    }
}
