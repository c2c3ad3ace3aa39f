//! PostgreSQL-backed `TicketRepository` implementation.
//!
//! Views are assembled with three queries per call: the ticket rows, the
//! summaries of every creator and assignee, and grouped comment counts.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{TicketPersistenceError, TicketRepository};
use crate::domain::{CompanyId, Ticket, TicketId, TicketStats, TicketView, UserId};

use super::error_mapping::{
    DbFailure, collect_rows, convert_row, impl_from_db_failure, map_diesel_error, map_pool_error,
};
use super::models::{TicketRecord, TicketRow};
use super::pool::DbPool;
use super::schema::tickets;
use super::views::{load_comment_counts, load_status_counts, load_summaries, required_summary};

impl_from_db_failure!(TicketPersistenceError);

async fn assemble_views(
    conn: &mut AsyncPgConnection,
    rows: Vec<TicketRow>,
) -> Result<Vec<TicketView>, DbFailure> {
    let tickets: Vec<Ticket> = collect_rows(rows)?;
    let people: Vec<Uuid> = tickets
        .iter()
        .flat_map(|ticket| {
            std::iter::once(*ticket.created_by.as_uuid())
                .chain(ticket.assigned_to.map(|id| *id.as_uuid()))
        })
        .collect();
    let ticket_ids: Vec<Uuid> = tickets.iter().map(|ticket| *ticket.id.as_uuid()).collect();

    let summaries = load_summaries(conn, people).await?;
    let counts = load_comment_counts(conn, ticket_ids).await?;

    tickets
        .into_iter()
        .map(|ticket| {
            let created_by = required_summary(&summaries, ticket.created_by.as_uuid(), "creator")?;
            let assigned_to = ticket
                .assigned_to
                .map(|id| required_summary(&summaries, id.as_uuid(), "assignee"))
                .transpose()?;
            let comment_count = counts.get(ticket.id.as_uuid()).copied().unwrap_or_default();
            Ok(TicketView {
                ticket,
                created_by,
                assigned_to,
                comment_count,
            })
        })
        .collect()
}

/// Diesel-backed implementation of the `TicketRepository` port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tickets::table)
            .values(TicketRecord::from(ticket))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(tickets::table.find(ticket.id.as_uuid()))
            .set(TicketRecord::from(ticket))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: &TicketId) -> Result<(), TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(tickets::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tickets::table
            .find(id.as_uuid())
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(convert_row(row)?)
    }

    async fn find_view(&self, id: &TicketId) -> Result<Option<TicketView>, TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tickets::table
            .find(id.as_uuid())
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut views = assemble_views(&mut conn, vec![row]).await?;
        Ok(views.pop())
    }

    async fn list_views(
        &self,
        company_id: &CompanyId,
        involving: Option<UserId>,
    ) -> Result<Vec<TicketView>, TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = tickets::table
            .filter(tickets::company_id.eq(*company_id.as_uuid()))
            .into_boxed();
        if let Some(user_id) = involving {
            let user_id = *user_id.as_uuid();
            query = query.filter(
                tickets::created_by
                    .eq(user_id)
                    .or(tickets::assigned_to.eq(user_id)),
            );
        }
        let rows = query
            .order(tickets::created_at.desc())
            .select(TicketRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(assemble_views(&mut conn, rows).await?)
    }

    async fn stats(&self, company_id: &CompanyId) -> Result<TicketStats, TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        Ok(load_status_counts(&mut conn, *company_id.as_uuid()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DbFailure::Connection("refused".to_owned()), TicketPersistenceError::connection("refused"))]
    #[case(DbFailure::Query("boom".to_owned()), TicketPersistenceError::query("boom"))]
    #[case(
        DbFailure::UniqueViolation("tickets_pkey".to_owned()),
        TicketPersistenceError::query("unique constraint tickets_pkey violated")
    )]
    fn failures_convert_to_port_errors(
        #[case] failure: DbFailure,
        #[case] expected: TicketPersistenceError,
    ) {
        assert_eq!(TicketPersistenceError::from(failure), expected);
    }
}
