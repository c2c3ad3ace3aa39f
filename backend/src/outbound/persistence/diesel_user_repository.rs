//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{CompanyId, User, UserId};

use super::error_mapping::{
    DbFailure, USERS_EMAIL_KEY, collect_rows, convert_row, impl_from_db_failure,
    map_diesel_error, map_pool_error,
};
use super::models::{UserRecord, UserRow};
use super::pool::DbPool;
use super::schema::users;

impl_from_db_failure!(UserPersistenceError);

fn map_write_failure(failure: DbFailure) -> UserPersistenceError {
    if failure.violates(USERS_EMAIL_KEY) {
        UserPersistenceError::duplicate_email()
    } else {
        failure.into()
    }
}

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(UserRecord::from(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_failure(map_diesel_error(err)))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(user.id.as_uuid()))
            .set(UserRecord::from(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_failure(map_diesel_error(err)))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(convert_row(row)?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.to_lowercase()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(convert_row(row)?)
    }

    async fn list_by_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .filter(users::company_id.eq(company_id.as_uuid()))
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(collect_rows(rows)?)
    }
}
