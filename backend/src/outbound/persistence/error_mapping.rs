//! Shared Diesel error mapping for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Unique constraint on `users.email`.
pub(super) const USERS_EMAIL_KEY: &str = "users_email_key";
/// Unique constraint on `companies.invite_code`.
pub(super) const COMPANIES_INVITE_CODE_KEY: &str = "companies_invite_code_key";

/// Classified database failure, before conversion into a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum DbFailure {
    /// The pool or connection is unavailable.
    Connection(String),
    /// A named unique constraint rejected the write.
    UniqueViolation(String),
    /// Anything else.
    Query(String),
}

impl DbFailure {
    /// Whether a unique violation hit the named constraint.
    pub(super) fn violates(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation(name) if name == constraint)
    }
}

/// Map pool errors into a connection failure.
pub(super) fn map_pool_error(error: PoolError) -> DbFailure {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    DbFailure::Connection(message)
}

/// Map a Diesel error, keeping the constraint name of unique violations.
pub(super) fn map_diesel_error(error: DieselError) -> DbFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbFailure::UniqueViolation(info.constraint_name().unwrap_or_default().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error".to_owned()),
        _ => DbFailure::Query("database error".to_owned()),
    }
}

/// Implement `From<DbFailure>` for a port error with `connection`/`query`
/// constructors. Unique violations not handled by the caller become query
/// errors.
macro_rules! impl_from_db_failure {
    ($error:ty) => {
        impl From<$crate::outbound::persistence::error_mapping::DbFailure> for $error {
            fn from(failure: $crate::outbound::persistence::error_mapping::DbFailure) -> Self {
                use $crate::outbound::persistence::error_mapping::DbFailure;
                match failure {
                    DbFailure::Connection(message) => Self::connection(message),
                    DbFailure::UniqueViolation(constraint) => {
                        Self::query(format!("unique constraint {constraint} violated"))
                    }
                    DbFailure::Query(message) => Self::query(message),
                }
            }
        }
    };
}

pub(super) use impl_from_db_failure;

/// Collect row conversions, reporting the first invalid row as a query failure.
pub(super) fn collect_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, DbFailure>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbFailure::Query)
}

/// Convert an optional row, reporting an invalid row as a query failure.
pub(super) fn convert_row<R, T>(row: Option<R>) -> Result<Option<T>, DbFailure>
where
    T: TryFrom<R, Error = String>,
{
    row.map(T::try_from).transpose().map_err(DbFailure::Query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PoolError::checkout("timed out"), "timed out")]
    #[case(PoolError::build("bad url"), "bad url")]
    fn pool_errors_become_connection_failures(#[case] error: PoolError, #[case] message: &str) {
        assert_eq!(map_pool_error(error), DbFailure::Connection(message.to_owned()));
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            DbFailure::Query("record not found".to_owned())
        );
    }

    #[rstest]
    fn violates_matches_constraint_name() {
        let failure = DbFailure::UniqueViolation(USERS_EMAIL_KEY.to_owned());
        assert!(failure.violates(USERS_EMAIL_KEY));
        assert!(!failure.violates(COMPANIES_INVITE_CODE_KEY));
        assert!(!DbFailure::Query("x".to_owned()).violates(USERS_EMAIL_KEY));
    }

    #[derive(Debug, PartialEq)]
    struct Even(u8);

    impl TryFrom<u8> for Even {
        type Error = String;

        fn try_from(value: u8) -> Result<Self, Self::Error> {
            if value % 2 == 0 {
                Ok(Self(value))
            } else {
                Err(format!("invalid stored value: {value}"))
            }
        }
    }

    #[rstest]
    fn invalid_rows_surface_as_query_failures() {
        assert_eq!(collect_rows::<u8, Even>(vec![2, 4]), Ok(vec![Even(2), Even(4)]));
        assert_eq!(
            collect_rows::<u8, Even>(vec![2, 3]),
            Err(DbFailure::Query("invalid stored value: 3".to_owned()))
        );
        assert_eq!(convert_row::<u8, Even>(None), Ok(None));
    }
}
