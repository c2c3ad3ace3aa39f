//! PostgreSQL-backed `CommentRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, CommentId, CommentView, TicketId};

use super::error_mapping::{
    DbFailure, collect_rows, convert_row, impl_from_db_failure, map_diesel_error, map_pool_error,
};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::comments;
use super::views::{load_summaries, required_summary};

impl_from_db_failure!(CommentPersistenceError);

async fn attach_authors(
    conn: &mut AsyncPgConnection,
    rows: Vec<CommentRow>,
) -> Result<Vec<CommentView>, DbFailure> {
    let comments: Vec<Comment> = collect_rows(rows)?;
    let authors = load_summaries(
        conn,
        comments
            .iter()
            .map(|comment| *comment.author_id.as_uuid())
            .collect(),
    )
    .await?;
    comments
        .into_iter()
        .map(|comment| {
            let author = required_summary(&authors, comment.author_id.as_uuid(), "author")?;
            Ok(CommentView { comment, author })
        })
        .collect()
}

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comments::table)
            .values(NewCommentRow::from(comment))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: &CommentId) -> Result<(), CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(comments::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = comments::table
            .find(id.as_uuid())
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(convert_row(row)?)
    }

    async fn find_view(
        &self,
        id: &CommentId,
    ) -> Result<Option<CommentView>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = comments::table
            .find(id.as_uuid())
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut views = attach_authors(&mut conn, vec![row]).await?;
        Ok(views.pop())
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<CommentView>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = comments::table
            .filter(comments::ticket_id.eq(ticket_id.as_uuid()))
            .order(comments::created_at.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(attach_authors(&mut conn, rows).await?)
    }
}
