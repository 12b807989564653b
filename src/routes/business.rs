use crate::{
    auth::{
        hash_password, verify_password, AuthenticatedBusiness, LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::{Business, BusinessUpdate},
    session::Session,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Column list shared by every query that returns a `Business`.
/// `password_hash` is deliberately never part of it.
const BUSINESS_COLUMNS: &str = "id, name, email, business_type, location, latitude, longitude, \
                                description, created_at, updated_at";

/// Register a new business
///
/// Creates the account, hashes the password, and signs the caller in by
/// writing the session's `user` mapping.
pub async fn register(
    pool: web::Data<PgPool>,
    session: Session,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;
    check_coordinates(register_data.latitude, register_data.longitude)?;

    // Check if email already exists
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM businesses WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    // Hash password
    let password_hash = hash_password(&register_data.password)?;

    // Insert new business
    let business = sqlx::query_as::<_, Business>(&format!(
        "INSERT INTO businesses \
         (id, name, email, password_hash, business_type, location, latitude, longitude, description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {}",
        BUSINESS_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&register_data.name)
    .bind(&register_data.email)
    .bind(&password_hash)
    .bind(&register_data.business_type)
    .bind(&register_data.location)
    .bind(register_data.latitude)
    .bind(register_data.longitude)
    .bind(&register_data.description)
    .fetch_one(&**pool)
    .await?;

    session.set_business(&business);

    Ok(HttpResponse::Created().json(business))
}

/// Business login
///
/// Authenticates a business and writes the session's `user` mapping.
/// Unknown email and wrong password get the same answer.
pub async fn login(
    pool: web::Data<PgPool>,
    session: Session,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let credentials: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, password_hash FROM businesses WHERE email = $1")
            .bind(&login_data.email)
            .fetch_optional(&**pool)
            .await?;

    match credentials {
        Some((business_id, password_hash)) => {
            if verify_password(&login_data.password, &password_hash)? {
                let business = sqlx::query_as::<_, Business>(&format!(
                    "SELECT {} FROM businesses WHERE id = $1",
                    BUSINESS_COLUMNS
                ))
                .bind(business_id)
                .fetch_one(&**pool)
                .await?;

                session.set_business(&business);
                Ok(HttpResponse::Ok().json(business))
            } else {
                Err(AppError::Unauthorized("Invalid credentials".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}

/// Business logout
///
/// Resets the session's `user` to the empty mapping (the record itself is
/// kept) and acknowledges. Succeeds regardless of prior session state.
pub async fn logout(session: Session) -> Result<impl Responder, AppError> {
    session.clear_user();
    Ok(HttpResponse::Ok().json(json!({
        "message": "Logged out"
    })))
}

/// Get all businesses, newest first.
pub async fn get_all_businesses(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let businesses = sqlx::query_as::<_, Business>(&format!(
        "SELECT {} FROM businesses ORDER BY created_at DESC",
        BUSINESS_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(businesses))
}

/// A business profile.
///
/// The trailing path segment is optional: without it the authenticated
/// business's own profile is returned.
pub async fn get_business(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let business_id = path_or_own_id(&req, identity)?;

    let business = sqlx::query_as::<_, Business>(&format!(
        "SELECT {} FROM businesses WHERE id = $1",
        BUSINESS_COLUMNS
    ))
    .bind(business_id)
    .fetch_optional(&**pool)
    .await?;

    match business {
        Some(business) => Ok(HttpResponse::Ok().json(business)),
        None => Err(AppError::NotFound("Business not found".into())),
    }
}

/// Update a business profile.
///
/// PATCH semantics: only fields present in the payload are written. The
/// optional path segment may only name the caller's own business; anything
/// else is answered as not-found so profile ids aren't probeable.
pub async fn update_business(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    update_data: web::Json<BusinessUpdate>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    update_data.validate()?;
    check_coordinates(update_data.latitude, update_data.longitude)?;

    let business_id = path_or_own_id(&req, identity)?;
    if business_id != identity.0 {
        return Err(AppError::NotFound("Business not found".into()));
    }
    if update_data.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let mut sql = String::from("UPDATE businesses SET updated_at = NOW()");
    let mut param_count = 1;

    let mut assignments: Vec<String> = Vec::new();

    if update_data.name.is_some() {
        assignments.push(format!("name = ${}", param_count));
        param_count += 1;
    }
    if update_data.business_type.is_some() {
        assignments.push(format!("business_type = ${}", param_count));
        param_count += 1;
    }
    if update_data.location.is_some() {
        assignments.push(format!("location = ${}", param_count));
        param_count += 1;
    }
    if update_data.latitude.is_some() {
        assignments.push(format!("latitude = ${}", param_count));
        param_count += 1;
    }
    if update_data.longitude.is_some() {
        assignments.push(format!("longitude = ${}", param_count));
        param_count += 1;
    }
    if update_data.description.is_some() {
        assignments.push(format!("description = ${}", param_count));
        param_count += 1;
    }

    sql.push_str(", ");
    sql.push_str(&assignments.join(", "));
    sql.push_str(&format!(
        " WHERE id = ${} RETURNING {}",
        param_count, BUSINESS_COLUMNS
    ));

    let mut query_builder = sqlx::query_as::<_, Business>(&sql);

    if let Some(name) = &update_data.name {
        query_builder = query_builder.bind(name);
    }
    if let Some(business_type) = &update_data.business_type {
        query_builder = query_builder.bind(business_type);
    }
    if let Some(location) = &update_data.location {
        query_builder = query_builder.bind(location);
    }
    if let Some(latitude) = update_data.latitude {
        query_builder = query_builder.bind(latitude);
    }
    if let Some(longitude) = update_data.longitude {
        query_builder = query_builder.bind(longitude);
    }
    if let Some(description) = &update_data.description {
        query_builder = query_builder.bind(description);
    }
    query_builder = query_builder.bind(business_id);

    let business = query_builder.fetch_one(&**pool).await?;

    Ok(HttpResponse::Ok().json(business))
}

/// Delete a business.
///
/// A business may only delete itself. Posts and comments go with it
/// (schema-level cascade), and the session is signed out.
pub async fn delete_business(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    session: Session,
    business_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let business_id = business_id.into_inner();
    if business_id != identity.0 {
        return Err(AppError::NotFound("Business not found".into()));
    }

    let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
        .bind(business_id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Business not found".into()));
    }

    session.clear_user();

    Ok(HttpResponse::NoContent().finish())
}

/// Resolves the optional `business_id` path segment, defaulting to the
/// authenticated business.
fn path_or_own_id(req: &HttpRequest, identity: AuthenticatedBusiness) -> Result<Uuid, AppError> {
    match req.match_info().get("business_id") {
        Some(raw) => {
            Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid business id".into()))
        }
        None => Ok(identity.0),
    }
}

/// Bounds check for optional geographic coordinates.
fn check_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), AppError> {
    if let Some(latitude) = latitude {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::BadRequest("Latitude out of range".into()));
        }
    }
    if let Some(longitude) = longitude {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::BadRequest("Longitude out of range".into()));
        }
    }
    Ok(())
}
