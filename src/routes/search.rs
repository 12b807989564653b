use crate::{
    error::AppError,
    models::{Business, Comment, Post},
    security::normalize_search_term,
};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

const BUSINESS_COLUMNS: &str = "id, name, email, business_type, location, latitude, longitude, \
                                description, created_at, updated_at";
const POST_COLUMNS: &str = "id, business_id, title, content, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, post_id, business_id, content, created_at, updated_at";

/// Mean Earth radius in kilometers, for the haversine distance filter.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationSearch {
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    /// Search radius in kilometers.
    pub rad: f64,
    /// Latitude of the search origin, decimal degrees.
    pub lat: f64,
    /// Longitude of the search origin, decimal degrees.
    pub lng: f64,
}

/// Search businesses by name or description.
pub async fn find_business_by_name(
    pool: web::Data<PgPool>,
    query: web::Query<NameQuery>,
) -> Result<impl Responder, AppError> {
    let term = normalize_search_term(&query.search)?;
    let pattern = format!("%{}%", term);

    let businesses = sqlx::query_as::<_, Business>(&format!(
        "SELECT {} FROM businesses \
         WHERE name ILIKE $1 OR description ILIKE $1 \
         ORDER BY name",
        BUSINESS_COLUMNS
    ))
    .bind(&pattern)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(businesses))
}

/// Search posts and comments by content.
///
/// Returns both result sets side by side; either may be empty.
pub async fn match_posts_and_comments(
    pool: web::Data<PgPool>,
    query: web::Query<ContentQuery>,
) -> Result<impl Responder, AppError> {
    let term = normalize_search_term(&query.content)?;
    let pattern = format!("%{}%", term);

    let posts = sqlx::query_as::<_, Post>(&format!(
        "SELECT {} FROM posts \
         WHERE title ILIKE $1 OR content ILIKE $1 \
         ORDER BY created_at DESC",
        POST_COLUMNS
    ))
    .bind(&pattern)
    .fetch_all(&**pool)
    .await?;

    let comments = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments \
         WHERE content ILIKE $1 \
         ORDER BY created_at DESC",
        COMMENT_COLUMNS
    ))
    .bind(&pattern)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "comments": comments
    })))
}

/// All businesses in a category. The match is case-insensitive but exact.
pub async fn businesses_by_type(
    pool: web::Data<PgPool>,
    business_type: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let businesses = sqlx::query_as::<_, Business>(&format!(
        "SELECT {} FROM businesses \
         WHERE LOWER(business_type) = LOWER($1) \
         ORDER BY name",
        BUSINESS_COLUMNS
    ))
    .bind(business_type.into_inner())
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(businesses))
}

/// Search businesses by location text.
pub async fn locate_businesses(
    pool: web::Data<PgPool>,
    search: web::Json<LocationSearch>,
) -> Result<impl Responder, AppError> {
    let term = normalize_search_term(&search.location)?;
    let pattern = format!("%{}%", term);

    let businesses = sqlx::query_as::<_, Business>(&format!(
        "SELECT {} FROM businesses \
         WHERE location ILIKE $1 \
         ORDER BY name",
        BUSINESS_COLUMNS
    ))
    .bind(&pattern)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(businesses))
}

/// All businesses of a category within `rad` kilometers of an origin point.
///
/// Businesses without stored coordinates are excluded; the distance is
/// computed with the haversine formula in SQL.
pub async fn businesses_by_type_within(
    pool: web::Data<PgPool>,
    business_type: web::Path<String>,
    query: web::Query<DistanceQuery>,
) -> Result<impl Responder, AppError> {
    if query.rad <= 0.0 || !query.rad.is_finite() {
        return Err(AppError::BadRequest(
            "Search radius must be a positive number of kilometers".into(),
        ));
    }
    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lng) {
        return Err(AppError::BadRequest("Invalid search origin".into()));
    }

    let businesses = sqlx::query_as::<_, Business>(&format!(
        "SELECT {} FROM businesses \
         WHERE LOWER(business_type) = LOWER($1) \
           AND latitude IS NOT NULL AND longitude IS NOT NULL \
           AND 2 * $2 * asin(sqrt( \
                 pow(sin(radians(latitude - $3) / 2), 2) \
                 + cos(radians($3)) * cos(radians(latitude)) \
                   * pow(sin(radians(longitude - $4) / 2), 2))) <= $5 \
         ORDER BY name",
        BUSINESS_COLUMNS
    ))
    .bind(business_type.into_inner())
    .bind(EARTH_RADIUS_KM)
    .bind(query.lat)
    .bind(query.lng)
    .bind(query.rad)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(businesses))
}
