//! In-memory implementation of the user, company, ticket and comment
//! repositories sharing one consistent state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, CompanyPersistenceError, CompanyRepository,
    TicketPersistenceError, TicketRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentId, CommentView, Company, CompanyId, CompanyStats, InviteCode, Ticket,
    TicketId, TicketStats, TicketStatus, TicketView, User, UserId, UserSummary,
};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    companies: Vec<Company>,
    tickets: Vec<Ticket>,
    comments: Vec<Comment>,
}

impl State {
    fn email_taken(&self, user: &User) -> bool {
        self.users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
    }

    fn summary(&self, id: &UserId) -> Option<UserSummary> {
        self.users.iter().find(|u| u.id == *id).map(User::summary)
    }

    fn ticket_view(&self, ticket: &Ticket) -> Option<TicketView> {
        Some(TicketView {
            ticket: ticket.clone(),
            created_by: self.summary(&ticket.created_by)?,
            assigned_to: ticket.assigned_to.as_ref().and_then(|id| self.summary(id)),
            comment_count: self
                .comments
                .iter()
                .filter(|c| c.ticket_id == ticket.id)
                .count() as u64,
        })
    }

    fn comment_view(&self, comment: &Comment) -> Option<CommentView> {
        Some(CommentView {
            comment: comment.clone(),
            author: self.summary(&comment.author_id)?,
        })
    }
}

/// Shared in-memory store. Wrap in an `Arc` and hand the same instance to
/// every service so writes through one port are visible through the others.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored companies.
    pub fn company_count(&self) -> usize {
        self.state().companies.len()
    }

    /// Snapshot of a stored ticket, bypassing tenancy checks.
    pub fn ticket(&self, id: &TicketId) -> Option<Ticket> {
        self.state().tickets.iter().find(|t| t.id == *id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        if state.email_taken(user) {
            return Err(UserPersistenceError::duplicate_email());
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        if state.email_taken(user) {
            return Err(UserPersistenceError::duplicate_email());
        }
        match state.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user does not exist")),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state().users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|u| u.email.as_ref() == email)
            .cloned())
    }

    async fn list_by_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut members: Vec<User> = self
            .state()
            .users
            .iter()
            .filter(|u| u.company_id.as_ref() == Some(company_id))
            .cloned()
            .collect();
        members.sort_by_key(|u| u.created_at);
        Ok(members)
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn register_owner(
        &self,
        owner: &User,
        company: &Company,
    ) -> Result<(), CompanyPersistenceError> {
        let mut state = self.state();
        if state.email_taken(owner) {
            return Err(CompanyPersistenceError::duplicate_email());
        }
        if state
            .companies
            .iter()
            .any(|c| c.invite_code == company.invite_code)
        {
            return Err(CompanyPersistenceError::duplicate_invite_code());
        }
        let mut owner = owner.clone();
        owner.company_id = Some(company.id);
        state.users.push(owner);
        state.companies.push(company.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyPersistenceError> {
        Ok(self.state().companies.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<Company>, CompanyPersistenceError> {
        Ok(self
            .state()
            .companies
            .iter()
            .find(|c| c.invite_code == *code)
            .cloned())
    }

    async fn update_invite_code(
        &self,
        id: &CompanyId,
        code: &InviteCode,
        updated_at: DateTime<Utc>,
    ) -> Result<(), CompanyPersistenceError> {
        let mut state = self.state();
        if state
            .companies
            .iter()
            .any(|c| c.id != *id && c.invite_code == *code)
        {
            return Err(CompanyPersistenceError::duplicate_invite_code());
        }
        let company = state
            .companies
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| CompanyPersistenceError::query("company does not exist"))?;
        company.invite_code = code.clone();
        company.updated_at = updated_at;
        Ok(())
    }

    async fn stats(&self, id: &CompanyId) -> Result<CompanyStats, CompanyPersistenceError> {
        let state = self.state();
        let statuses: Vec<TicketStatus> = state
            .tickets
            .iter()
            .filter(|t| t.company_id == *id)
            .map(|t| t.status)
            .collect();
        let tickets = TicketStats::from_statuses(statuses);
        Ok(CompanyStats {
            total_tickets: tickets.total,
            open_tickets: tickets.open,
            in_progress_tickets: tickets.in_progress,
            resolved_tickets: tickets.resolved + tickets.closed,
            total_members: state
                .users
                .iter()
                .filter(|u| u.company_id.as_ref() == Some(id))
                .count() as u64,
        })
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError> {
        self.state().tickets.push(ticket.clone());
        Ok(())
    }

    async fn update(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError> {
        let mut state = self.state();
        let existing = state
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket.id)
            .ok_or_else(|| TicketPersistenceError::query("ticket does not exist"))?;
        *existing = ticket.clone();
        Ok(())
    }

    async fn delete(&self, id: &TicketId) -> Result<(), TicketPersistenceError> {
        let mut state = self.state();
        state.tickets.retain(|t| t.id != *id);
        state.comments.retain(|c| c.ticket_id != *id);
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketPersistenceError> {
        Ok(self.ticket(id))
    }

    async fn find_view(&self, id: &TicketId) -> Result<Option<TicketView>, TicketPersistenceError> {
        let state = self.state();
        Ok(state
            .tickets
            .iter()
            .find(|t| t.id == *id)
            .and_then(|t| state.ticket_view(t)))
    }

    async fn list_views(
        &self,
        company_id: &CompanyId,
        involving: Option<UserId>,
    ) -> Result<Vec<TicketView>, TicketPersistenceError> {
        let state = self.state();
        let mut views: Vec<TicketView> = state
            .tickets
            .iter()
            .filter(|t| t.company_id == *company_id)
            .filter(|t| {
                involving.is_none_or(|user| t.created_by == user || t.assigned_to == Some(user))
            })
            .filter_map(|t| state.ticket_view(t))
            .collect();
        views.sort_by(|a, b| b.ticket.created_at.cmp(&a.ticket.created_at));
        Ok(views)
    }

    async fn stats(&self, company_id: &CompanyId) -> Result<TicketStats, TicketPersistenceError> {
        Ok(TicketStats::from_statuses(
            self.state()
                .tickets
                .iter()
                .filter(|t| t.company_id == *company_id)
                .map(|t| t.status)
                .collect::<Vec<_>>(),
        ))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        self.state().comments.push(comment.clone());
        Ok(())
    }

    async fn delete(&self, id: &CommentId) -> Result<(), CommentPersistenceError> {
        self.state().comments.retain(|c| c.id != *id);
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentPersistenceError> {
        Ok(self.state().comments.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_view(
        &self,
        id: &CommentId,
    ) -> Result<Option<CommentView>, CommentPersistenceError> {
        let state = self.state();
        Ok(state
            .comments
            .iter()
            .find(|c| c.id == *id)
            .and_then(|c| state.comment_view(c)))
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<CommentView>, CommentPersistenceError> {
        let state = self.state();
        let mut views: Vec<CommentView> = state
            .comments
            .iter()
            .filter(|c| c.ticket_id == *ticket_id)
            .filter_map(|c| state.comment_view(c))
            .collect();
        views.sort_by_key(|v| v.comment.created_at);
        Ok(views)
    }
}
