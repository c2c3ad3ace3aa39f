//! Builders shared by the domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Comment, CommentContent, CommentId, CommentView, Company, CompanyId, CompanyName,
    EmailAddress, InviteCode, PasswordHash, PersonName, Role, Ticket, TicketDescription,
    TicketId, TicketPriority, TicketStatus, TicketTitle, TicketView, User, UserId,
};

pub(crate) struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock(fixed_now()))
}

pub(crate) fn user(role: Role, company_id: Option<CompanyId>) -> User {
    let id = UserId::random();
    User {
        id,
        email: EmailAddress::new(format!("user-{id}@example.com")).expect("fixture email"),
        password_hash: PasswordHash::new("$argon2id$fixture"),
        first_name: PersonName::new("Ada").expect("fixture name"),
        last_name: PersonName::new("Lovelace").expect("fixture name"),
        phone: None,
        role,
        avatar: None,
        company_id,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

pub(crate) fn company(owner: &User) -> Company {
    Company {
        id: owner.company_id.unwrap_or_else(CompanyId::random),
        name: CompanyName::new("Analytical Engines Ltd").expect("fixture company"),
        tax_id: "PENDING".to_owned(),
        address: "PENDING".to_owned(),
        phone: None,
        email: None,
        invite_code: InviteCode::new("ENG1NE").expect("fixture code"),
        owner_id: owner.id,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

pub(crate) fn ticket(company_id: CompanyId, creator: &User) -> Ticket {
    Ticket {
        id: TicketId::random(),
        title: TicketTitle::new("Printer jammed").expect("fixture title"),
        description: TicketDescription::new("Paper stuck in tray two again").expect("fixture"),
        status: TicketStatus::Open,
        priority: TicketPriority::Medium,
        category: None,
        created_by: creator.id,
        assigned_to: None,
        company_id,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

pub(crate) fn ticket_view(ticket: Ticket, creator: &User) -> TicketView {
    TicketView {
        ticket,
        created_by: creator.summary(),
        assigned_to: None,
        comment_count: 0,
    }
}

pub(crate) fn comment(ticket: &Ticket, author: &User) -> Comment {
    Comment {
        id: CommentId::random(),
        content: CommentContent::new("Tried turning it off and on").expect("fixture comment"),
        ticket_id: ticket.id,
        author_id: author.id,
        created_at: fixed_now(),
    }
}

pub(crate) fn comment_view(comment: Comment, author: &User) -> CommentView {
    CommentView {
        comment,
        author: author.summary(),
    }
}
