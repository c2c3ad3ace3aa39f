//! PostgreSQL-backed `CompanyRepository` implementation.
//!
//! Owner registration writes the user, the company and the user's membership
//! in one transaction: `companies.owner_id` references the user and
//! `users.company_id` references the company, so the membership is set after
//! both rows exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{CompanyPersistenceError, CompanyRepository};
use crate::domain::{Company, CompanyId, CompanyStats, InviteCode, TicketStats, User};

use super::error_mapping::{
    COMPANIES_INVITE_CODE_KEY, DbFailure, USERS_EMAIL_KEY, convert_row, impl_from_db_failure,
    map_diesel_error, map_pool_error,
};
use super::models::{CompanyRow, NewCompanyRow, UserRecord};
use super::pool::DbPool;
use super::schema::{companies, users};
use super::views::load_status_counts;

impl_from_db_failure!(CompanyPersistenceError);

fn map_write_failure(failure: DbFailure) -> CompanyPersistenceError {
    if failure.violates(USERS_EMAIL_KEY) {
        CompanyPersistenceError::duplicate_email()
    } else if failure.violates(COMPANIES_INVITE_CODE_KEY) {
        CompanyPersistenceError::duplicate_invite_code()
    } else {
        failure.into()
    }
}

/// Fold ticket counters and the member count into dashboard counters.
fn company_stats(ticket_stats: TicketStats, members: i64) -> CompanyStats {
    CompanyStats {
        total_tickets: ticket_stats.total,
        open_tickets: ticket_stats.open,
        in_progress_tickets: ticket_stats.in_progress,
        resolved_tickets: ticket_stats.resolved + ticket_stats.closed,
        total_members: u64::try_from(members).unwrap_or_default(),
    }
}

/// Diesel-backed implementation of the `CompanyRepository` port.
#[derive(Clone)]
pub struct DieselCompanyRepository {
    pool: DbPool,
}

impl DieselCompanyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for DieselCompanyRepository {
    async fn register_owner(
        &self,
        owner: &User,
        company: &Company,
    ) -> Result<(), CompanyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_row = UserRecord {
            company_id: None,
            ..UserRecord::from(owner)
        };
        let company_row = NewCompanyRow::from(company);
        let owner_id = *owner.id.as_uuid();
        let company_id = *company.id.as_uuid();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&owner_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(companies::table)
                    .values(&company_row)
                    .execute(conn)
                    .await?;
                diesel::update(users::table.find(owner_id))
                    .set(users::company_id.eq(company_id))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_write_failure(map_diesel_error(err)))
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = companies::table
            .find(id.as_uuid())
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(convert_row(row)?)
    }

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<Company>, CompanyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = companies::table
            .filter(companies::invite_code.eq(code.as_ref()))
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(convert_row(row)?)
    }

    async fn update_invite_code(
        &self,
        id: &CompanyId,
        code: &InviteCode,
        updated_at: DateTime<Utc>,
    ) -> Result<(), CompanyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(companies::table.find(id.as_uuid()))
            .set((
                companies::invite_code.eq(code.as_ref()),
                companies::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_failure(map_diesel_error(err)))?;
        Ok(())
    }

    async fn stats(&self, id: &CompanyId) -> Result<CompanyStats, CompanyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ticket_stats = load_status_counts(&mut conn, *id.as_uuid()).await?;
        let members: i64 = users::table
            .filter(users::company_id.eq(id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(company_stats(ticket_stats, members))
    }
}
