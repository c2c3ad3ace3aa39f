//! Read-side helpers that join related rows into domain views.

use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::{TicketStats, TicketStatus, UserSummary};

use super::error_mapping::{DbFailure, collect_rows, map_diesel_error};
use super::models::UserRow;
use super::schema::{comments, tickets, users};

/// Load public summaries for the given users, keyed by id.
pub(super) async fn load_summaries(
    conn: &mut AsyncPgConnection,
    mut ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, UserSummary>, DbFailure> {
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = users::table
        .filter(users::id.eq_any(ids))
        .select(UserRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let summaries: Vec<UserSummary> = collect_rows(rows)?;
    Ok(summaries
        .into_iter()
        .map(|summary| (*summary.id.as_uuid(), summary))
        .collect())
}

/// Count comments per ticket. Tickets without comments are absent.
pub(super) async fn load_comment_counts(
    conn: &mut AsyncPgConnection,
    ticket_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, u64>, DbFailure> {
    if ticket_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let counts: Vec<(Uuid, i64)> = comments::table
        .filter(comments::ticket_id.eq_any(ticket_ids))
        .group_by(comments::ticket_id)
        .select((comments::ticket_id, count_star()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(counts
        .into_iter()
        .map(|(id, count)| (id, u64::try_from(count).unwrap_or_default()))
        .collect())
}

/// Look up a summary that a foreign key guarantees to exist.
pub(super) fn required_summary(
    summaries: &HashMap<Uuid, UserSummary>,
    id: &Uuid,
    role: &str,
) -> Result<UserSummary, DbFailure> {
    summaries
        .get(id)
        .cloned()
        .ok_or_else(|| DbFailure::Query(format!("{role} {id} not found")))
}

/// Count a company's tickets per status in the database.
pub(super) async fn load_status_counts(
    conn: &mut AsyncPgConnection,
    company_id: Uuid,
) -> Result<TicketStats, DbFailure> {
    let counts: Vec<(String, i64)> = tickets::table
        .filter(tickets::company_id.eq(company_id))
        .group_by(tickets::status)
        .select((tickets::status, count_star()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    tally_status_counts(counts)
}

/// Parse grouped status rows into counters.
pub(super) fn tally_status_counts(rows: Vec<(String, i64)>) -> Result<TicketStats, DbFailure> {
    let counts = rows
        .into_iter()
        .map(|(status, count)| {
            status
                .parse::<TicketStatus>()
                .map(|parsed| (parsed, u64::try_from(count).unwrap_or_default()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| DbFailure::Query(format!("invalid stored status: {err}")))?;
    Ok(TicketStats::from_counts(counts))
}
