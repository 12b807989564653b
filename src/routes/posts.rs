use crate::{
    auth::AuthenticatedBusiness,
    error::AppError,
    models::{Comment, Post, PostInput, PostUpdate},
};
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const POST_COLUMNS: &str = "id, business_id, title, content, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, post_id, business_id, content, created_at, updated_at";

/// Create a post owned by the authenticated business.
pub async fn create_post(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    post_data: web::Json<PostInput>,
) -> Result<impl Responder, AppError> {
    // Validate input
    post_data.validate()?;

    let post = Post::new(post_data.into_inner(), identity.0);

    let result = sqlx::query_as::<_, Post>(&format!(
        "INSERT INTO posts (id, business_id, title, content) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {}",
        POST_COLUMNS
    ))
    .bind(post.id)
    .bind(post.business_id)
    .bind(post.title)
    .bind(post.content)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(result))
}

/// One post, together with the comments on it.
pub async fn get_post(
    pool: web::Data<PgPool>,
    _identity: AuthenticatedBusiness,
    post_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let post_id = post_id.into_inner();

    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {} FROM posts WHERE id = $1",
        POST_COLUMNS
    ))
    .bind(post_id)
    .fetch_optional(&**pool)
    .await?;

    let post = match post {
        Some(post) => post,
        None => return Err(AppError::NotFound("Post not found".into())),
    };

    let comments = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
        COMMENT_COLUMNS
    ))
    .bind(post_id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "post": post,
        "comments": comments
    })))
}

/// All posts belonging to a business, newest first.
pub async fn get_business_posts(
    pool: web::Data<PgPool>,
    _identity: AuthenticatedBusiness,
    business_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let business_id = business_id.into_inner();

    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM businesses WHERE id = $1")
        .bind(business_id)
        .fetch_optional(&**pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Business not found".into()));
    }

    let posts = sqlx::query_as::<_, Post>(&format!(
        "SELECT {} FROM posts WHERE business_id = $1 ORDER BY created_at DESC",
        POST_COLUMNS
    ))
    .bind(business_id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Update a post.
///
/// PATCH semantics over `title` and `content`. Only the owning business may
/// edit; a foreign post is answered as not-found.
pub async fn update_post(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    post_id: web::Path<Uuid>,
    post_data: web::Json<PostUpdate>,
) -> Result<impl Responder, AppError> {
    post_data.validate()?;
    if post_data.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let post_id = post_id.into_inner();

    // First, verify ownership
    let ownership_check: Option<(Uuid,)> =
        sqlx::query_as("SELECT business_id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&**pool)
            .await?;

    match ownership_check {
        Some((owner_id,)) => {
            if owner_id != identity.0 {
                return Err(AppError::NotFound(
                    "Post not found or not owned by business".into(),
                ));
            }
        }
        None => return Err(AppError::NotFound("Post not found".into())),
    }

    // If ownership is verified, proceed with update
    let mut sql = String::from("UPDATE posts SET updated_at = NOW()");
    let mut param_count = 1;

    let mut assignments: Vec<String> = Vec::new();
    if post_data.title.is_some() {
        assignments.push(format!("title = ${}", param_count));
        param_count += 1;
    }
    if post_data.content.is_some() {
        assignments.push(format!("content = ${}", param_count));
        param_count += 1;
    }

    sql.push_str(", ");
    sql.push_str(&assignments.join(", "));
    sql.push_str(&format!(
        " WHERE id = ${} AND business_id = ${} RETURNING {}",
        param_count,
        param_count + 1,
        POST_COLUMNS
    ));

    let mut query_builder = sqlx::query_as::<_, Post>(&sql);
    if let Some(title) = &post_data.title {
        query_builder = query_builder.bind(title);
    }
    if let Some(content) = &post_data.content {
        query_builder = query_builder.bind(content);
    }
    query_builder = query_builder.bind(post_id);
    query_builder = query_builder.bind(identity.0);

    let post = query_builder.fetch_one(&**pool).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post owned by the authenticated business.
pub async fn delete_post(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    post_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND business_id = $2")
        .bind(post_id.into_inner())
        .bind(identity.0)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Post not found or not owned by business".into(),
        ));
    }

    Ok(HttpResponse::NoContent().finish())
}
