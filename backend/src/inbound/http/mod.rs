//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod comments;
pub mod companies;
pub mod dto;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every API handler under `/api`, plus the extractor
/// configuration that turns malformed input into `invalid_request` errors.
///
/// Literal segments (`/users/me`, `/tickets/stats`) are registered before
/// their `{id}` siblings so they are matched first.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login)
                        .service(auth::logout)
                        .service(auth::join_company)
                        .service(auth::me),
                )
                .service(
                    web::scope("/users")
                        .service(users::list_users)
                        .service(users::current_profile)
                        .service(users::update_profile)
                        .service(users::user_profile),
                )
                .service(
                    web::scope("/companies")
                        .service(companies::verify_invite_code)
                        .service(companies::company_stats)
                        .service(companies::regenerate_invite_code)
                        .service(companies::find_company),
                )
                .service(
                    web::scope("/tickets")
                        .service(tickets::list_tickets)
                        .service(tickets::ticket_stats)
                        .service(tickets::create_ticket)
                        .service(tickets::find_ticket)
                        .service(tickets::update_ticket)
                        .service(tickets::patch_ticket)
                        .service(tickets::delete_ticket),
                )
                .service(
                    web::scope("/comments")
                        .service(comments::list_comments)
                        .service(comments::create_comment)
                        .service(comments::delete_comment),
                ),
        );
}
