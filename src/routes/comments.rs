use crate::{
    auth::AuthenticatedBusiness,
    error::AppError,
    models::{Comment, CommentInput, CommentUpdate},
};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const COMMENT_COLUMNS: &str = "id, post_id, business_id, content, created_at, updated_at";

/// All comments on a post, oldest first.
pub async fn get_post_comments(
    pool: web::Data<PgPool>,
    _identity: AuthenticatedBusiness,
    post_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let post_id = post_id.into_inner();

    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(&**pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Post not found".into()));
    }

    let comments = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
        COMMENT_COLUMNS
    ))
    .bind(post_id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// Comment on a post.
///
/// The path names the author; it must be the authenticated business itself.
pub async fn create_comment(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    path: web::Path<(Uuid, Uuid)>,
    comment_data: web::Json<CommentInput>,
) -> Result<impl Responder, AppError> {
    comment_data.validate()?;

    let (post_id, author_id) = path.into_inner();
    if author_id != identity.0 {
        return Err(AppError::Unauthorized(
            "Cannot comment as another business".into(),
        ));
    }

    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(&**pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Post not found".into()));
    }

    let comment = Comment::new(comment_data.into_inner(), post_id, author_id);

    let result = sqlx::query_as::<_, Comment>(&format!(
        "INSERT INTO comments (id, post_id, business_id, content) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {}",
        COMMENT_COLUMNS
    ))
    .bind(comment.id)
    .bind(comment.post_id)
    .bind(comment.business_id)
    .bind(comment.content)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(result))
}

/// Edit a comment.
///
/// The comment is looked up within the post scope of the path. Only the
/// author may edit; anything else is answered as not-found.
pub async fn update_comment(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    path: web::Path<(Uuid, Uuid)>,
    comment_data: web::Json<CommentUpdate>,
) -> Result<impl Responder, AppError> {
    comment_data.validate()?;
    if comment_data.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let (post_id, comment_id) = path.into_inner();

    let author_check: Option<(Uuid,)> =
        sqlx::query_as("SELECT business_id FROM comments WHERE id = $1 AND post_id = $2")
            .bind(comment_id)
            .bind(post_id)
            .fetch_optional(&**pool)
            .await?;

    match author_check {
        Some((author_id,)) => {
            if author_id != identity.0 {
                return Err(AppError::NotFound(
                    "Comment not found or not authored by business".into(),
                ));
            }
        }
        None => return Err(AppError::NotFound("Comment not found".into())),
    }

    let comment = sqlx::query_as::<_, Comment>(&format!(
        "UPDATE comments SET content = $1, updated_at = NOW() \
         WHERE id = $2 AND post_id = $3 AND business_id = $4 \
         RETURNING {}",
        COMMENT_COLUMNS
    ))
    .bind(comment_data.content.as_deref().unwrap_or_default())
    .bind(comment_id)
    .bind(post_id)
    .bind(identity.0)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment.
///
/// Allowed for the comment's author and for the owner of the post it is on;
/// any other authenticated business is refused.
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    identity: AuthenticatedBusiness,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (post_id, comment_id) = path.into_inner();

    let parties: Option<(Uuid, Uuid)> = sqlx::query_as(
        "SELECT c.business_id, p.business_id \
         FROM comments c JOIN posts p ON p.id = c.post_id \
         WHERE c.id = $1 AND c.post_id = $2",
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_optional(&**pool)
    .await?;

    let (author_id, post_owner_id) = match parties {
        Some(parties) => parties,
        None => return Err(AppError::NotFound("Comment not found".into())),
    };

    if identity.0 != author_id && identity.0 != post_owner_id {
        return Err(AppError::Unauthorized(
            "Only the comment author or the post owner may delete a comment".into(),
        ));
    }

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
