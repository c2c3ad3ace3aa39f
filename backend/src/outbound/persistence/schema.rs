//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts. `email` is stored lower-case and is unique.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        phone -> Nullable<Varchar>,
        /// `COMPANY_ADMIN`, `EMPLOYEE` or `TECHNICIAN`.
        role -> Varchar,
        avatar -> Nullable<Text>,
        /// Set on registration as admin or when joining with an invite code.
        company_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tenants.
    companies (id) {
        id -> Uuid,
        name -> Varchar,
        tax_id -> Varchar,
        address -> Varchar,
        phone -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        /// Six upper-case alphanumerics, unique across companies.
        invite_code -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets. Deleting a company deletes its tickets.
    tickets (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        status -> Varchar,
        priority -> Varchar,
        category -> Nullable<Varchar>,
        created_by -> Uuid,
        assigned_to -> Nullable<Uuid>,
        company_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ticket comments. Deleting a ticket deletes its comments.
    comments (id) {
        id -> Uuid,
        content -> Text,
        ticket_id -> Uuid,
        author_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(comments -> tickets (ticket_id));
diesel::joinable!(tickets -> companies (company_id));

diesel::allow_tables_to_appear_in_same_query!(users, companies, tickets, comments);
