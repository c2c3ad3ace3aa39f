//! Tests for the comments service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockCommentRepository, MockTicketRepository, MockUserRepository};
use crate::domain::service_test_helpers::{
    comment, comment_view, fixed_now, fixture_clock, ticket, user,
};
use crate::domain::{CommentContent, CompanyId, Role, User};

fn make_service(
    users: MockUserRepository,
    tickets: MockTicketRepository,
    comments: MockCommentRepository,
) -> CommentsService<MockUserRepository, MockTicketRepository, MockCommentRepository> {
    CommentsService::new(
        Arc::new(users),
        Arc::new(tickets),
        Arc::new(comments),
        fixture_clock(),
    )
}

fn users_with(records: Vec<User>) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |id| Ok(records.iter().find(|u| u.id == *id).cloned()));
    users
}

fn tickets_with(record: Ticket) -> MockTicketRepository {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(move |_| Ok(Some(record.clone())));
    tickets
}

#[tokio::test]
async fn list_comments_checks_ticket_tenant() {
    let creator = user(Role::Employee, Some(CompanyId::random()));
    let outsider = user(Role::Employee, Some(CompanyId::random()));
    let record = ticket(creator.company_id.expect("company"), &creator);
    let ticket_id = record.id;
    let mut comments = MockCommentRepository::new();
    comments.expect_list_for_ticket().never();

    let service = make_service(
        users_with(vec![outsider.clone()]),
        tickets_with(record),
        comments,
    );
    let err = service
        .list_comments(&outsider.id, &ticket_id)
        .await
        .expect_err("cross-tenant");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn create_comment_on_missing_ticket_is_not_found() {
    let actor = user(Role::Employee, Some(CompanyId::random()));
    let mut tickets = MockTicketRepository::new();
    tickets.expect_find_by_id().return_once(|_| Ok(None));

    let service = make_service(
        users_with(vec![actor.clone()]),
        tickets,
        MockCommentRepository::new(),
    );
    let request = NewComment {
        ticket_id: TicketId::random(),
        content: CommentContent::new("any update?").expect("content"),
    };
    let err = service
        .create_comment(&actor.id, request)
        .await
        .expect_err("missing ticket");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn create_comment_records_author_and_timestamp() {
    let actor = user(Role::Technician, Some(CompanyId::random()));
    let record = ticket(actor.company_id.expect("company"), &actor);
    let ticket_id = record.id;
    let actor_id = actor.id;
    let author = actor.clone();
    let stored = comment(&record, &actor);

    let mut comments = MockCommentRepository::new();
    comments
        .expect_insert()
        .withf(move |c| {
            c.author_id == actor_id && c.ticket_id == ticket_id && c.created_at == fixed_now()
        })
        .times(1)
        .return_once(|_| Ok(()));
    comments
        .expect_find_view()
        .return_once(move |_| Ok(Some(comment_view(stored, &author))));

    let service = make_service(users_with(vec![actor]), tickets_with(record), comments);
    let request = NewComment {
        ticket_id,
        content: CommentContent::new("Replaced the cable").expect("content"),
    };
    let view = service
        .create_comment(&actor_id, request)
        .await
        .expect("created");
    assert_eq!(view.author.id, actor_id);
}

#[tokio::test]
async fn delete_comment_is_author_only() {
    let company_id = CompanyId::random();
    let author = user(Role::Employee, Some(company_id));
    let colleague = user(Role::CompanyAdmin, Some(company_id));
    let record = ticket(company_id, &author);
    let stored = comment(&record, &author);
    let comment_id = stored.id;

    let mut comments = MockCommentRepository::new();
    comments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    comments.expect_delete().never();

    let service = make_service(
        users_with(vec![author, colleague.clone()]),
        tickets_with(record),
        comments,
    );
    let err = service
        .delete_comment(&colleague.id, &comment_id)
        .await
        .expect_err("not author");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn delete_comment_by_author_succeeds() {
    let company_id = CompanyId::random();
    let author = user(Role::Employee, Some(company_id));
    let record = ticket(company_id, &author);
    let stored = comment(&record, &author);
    let comment_id = stored.id;

    let mut comments = MockCommentRepository::new();
    comments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    comments
        .expect_delete()
        .withf(move |id| *id == comment_id)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(
        users_with(vec![author.clone()]),
        tickets_with(record),
        comments,
    );
    service
        .delete_comment(&author.id, &comment_id)
        .await
        .expect("deleted");
}

#[tokio::test]
async fn delete_missing_comment_is_not_found() {
    let actor = user(Role::Employee, Some(CompanyId::random()));
    let mut comments = MockCommentRepository::new();
    comments.expect_find_by_id().return_once(|_| Ok(None));

    let service = make_service(
        users_with(vec![actor.clone()]),
        MockTicketRepository::new(),
        comments,
    );
    let err = service
        .delete_comment(&actor.id, &CommentId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
