//! Assemble HTTP state from the PostgreSQL adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use ticketclass::inbound::http::state::{HttpState, HttpStateAdapters};
use ticketclass::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselCompanyRepository, DieselTicketRepository,
    DieselUserRepository,
};
use ticketclass::outbound::security::{Argon2CredentialHasher, RandomInviteCodes};

/// Wire every domain service over repositories sharing `pool`.
pub(super) fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    let state = HttpState::from_adapters(HttpStateAdapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        companies: Arc::new(DieselCompanyRepository::new(pool.clone())),
        tickets: Arc::new(DieselTicketRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        hasher: Arc::new(Argon2CredentialHasher::new()),
        invite_codes: Arc::new(RandomInviteCodes),
        clock: Arc::new(DefaultClock),
    });
    web::Data::new(state)
}
