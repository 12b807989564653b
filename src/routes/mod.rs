//!
//! # Route Table
//!
//! The full HTTP surface of the application, declared once at startup in a
//! fixed order; first match wins per method. Routes that require an
//! authenticated session wrap [`RequireAuth`] on the individual resource, so
//! everything else stays public.
//!
//! Two resources carry an optional trailing `business_id` segment and are
//! registered under both patterns; the handler falls back to the session
//! business when the segment is absent.

pub mod business;
pub mod comments;
pub mod health;
pub mod posts;
pub mod search;

use actix_web::web;

use crate::auth::RequireAuth;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        // account
        .service(web::resource("/register").route(web::post().to(business::register)))
        .service(web::resource("/login").route(web::post().to(business::login)))
        .service(web::resource("/logout").route(web::get().to(business::logout)))
        // directory
        .service(web::resource("/all").route(web::get().to(business::get_all_businesses)))
        .service(
            web::resource(["/home/profile", "/home/profile/{business_id}"])
                .route(web::get().to(business::get_business))
                .wrap(RequireAuth),
        )
        .service(
            web::resource(["/home/update", "/home/update/{business_id}"])
                .route(web::patch().to(business::update_business))
                .wrap(RequireAuth),
        )
        .service(
            web::resource("/posts/post/{post_id}")
                .route(web::get().to(posts::get_post))
                .wrap(RequireAuth),
        )
        // search
        .service(web::resource("/find/name").route(web::get().to(search::find_business_by_name)))
        .service(
            web::resource("/find/content").route(web::get().to(search::match_posts_and_comments)),
        )
        .service(
            web::resource("/category/{business_type}")
                .route(web::get().to(search::businesses_by_type)),
        )
        .service(
            web::resource("/location-search").route(web::post().to(search::locate_businesses)),
        )
        .service(
            web::resource("/category/{business_type}/distance")
                .route(web::get().to(search::businesses_by_type_within)),
        )
        // posts
        .service(
            web::resource("/create-post")
                .route(web::post().to(posts::create_post))
                .wrap(RequireAuth),
        )
        .service(
            web::resource("/home/posts/{business_id}/all")
                .route(web::get().to(posts::get_business_posts))
                .wrap(RequireAuth),
        )
        // comments
        .service(
            web::resource("/posts/post/{post_id}/comments/all")
                .route(web::get().to(comments::get_post_comments))
                .wrap(RequireAuth),
        )
        .service(
            web::resource("/posts/post/{post_id}/comment/create/{business_id}")
                .route(web::post().to(comments::create_comment))
                .wrap(RequireAuth),
        )
        .service(
            web::resource("/posts/post/{post_id}/edit")
                .route(web::patch().to(posts::update_post))
                .wrap(RequireAuth),
        )
        .service(
            web::resource("/posts/post/{post_id}/comment/{comment_id}")
                .route(web::patch().to(comments::update_comment))
                .route(web::delete().to(comments::delete_comment))
                .wrap(RequireAuth),
        )
        // deletion
        .service(
            web::resource("/home/delete-business/{business_id}")
                .route(web::delete().to(business::delete_business))
                .wrap(RequireAuth),
        )
        .service(
            web::resource("/posts/post/{post_id}/remove")
                .route(web::delete().to(posts::delete_post))
                .wrap(RequireAuth),
        );
}
