//! Tests for the authentication service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockCompanyRepository, MockCredentialHasher, MockInviteCodeSource, MockUserRepository,
    UserPersistenceError,
};
use crate::domain::service_test_helpers::{company, fixed_now, fixture_clock, user};
use crate::domain::{
    CompanyName, EmailAddress, INVITE_CODE_ATTEMPTS, Password, PasswordHash, PersonName,
};
use rstest::rstest;

type Service = AuthService<MockUserRepository, MockCompanyRepository, MockCredentialHasher>;

fn make_service(
    users: MockUserRepository,
    companies: MockCompanyRepository,
    hasher: MockCredentialHasher,
    codes: MockInviteCodeSource,
) -> Service {
    AuthService::new(
        Arc::new(users),
        Arc::new(companies),
        Arc::new(hasher),
        Arc::new(codes),
        fixture_clock(),
    )
}

fn registration(role: Role, company: Option<&str>) -> Registration {
    Registration {
        email: EmailAddress::new("Ada@Example.com").expect("email"),
        password: Password::new("correct horse").expect("password"),
        first_name: PersonName::new("Ada").expect("name"),
        last_name: PersonName::new("Lovelace").expect("name"),
        phone: None,
        role,
        company: company.map(|name| CompanyRegistration {
            name: CompanyName::new(name).expect("company name"),
            tax_id: None,
            address: Some("   ".to_owned()),
            phone: None,
            email: None,
        }),
    }
}

fn hashing_hasher() -> MockCredentialHasher {
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$argon2id$hashed")));
    hasher
}

fn codes(sequence: &'static [&'static str]) -> MockInviteCodeSource {
    let mut codes = MockInviteCodeSource::new();
    let mut iter = sequence.iter();
    codes.expect_next_code().returning(move || {
        let raw = iter.next().expect("enough fixture codes");
        InviteCode::new(raw).expect("fixture code")
    });
    codes
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let existing = user(Role::Employee, None);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email == "ada@example.com")
        .return_once(move |_| Ok(Some(existing)));
    users.expect_insert().never();

    let service = make_service(
        users,
        MockCompanyRepository::new(),
        MockCredentialHasher::new(),
        MockInviteCodeSource::new(),
    );
    let err = service
        .register(registration(Role::Employee, None))
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn register_employee_creates_companyless_user() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users
        .expect_insert()
        .withf(|user| user.company_id.is_none() && user.password_hash.as_str() == "$argon2id$hashed")
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(
        users,
        MockCompanyRepository::new(),
        hashing_hasher(),
        MockInviteCodeSource::new(),
    );
    let profile = service
        .register(registration(Role::Employee, None))
        .await
        .expect("registered");
    assert_eq!(profile.user.email.as_ref(), "ada@example.com");
    assert_eq!(profile.user.created_at, fixed_now());
    assert!(profile.company.is_none());
}

#[tokio::test]
async fn register_admin_requires_company_name() {
    let service = make_service(
        MockUserRepository::new(),
        MockCompanyRepository::new(),
        MockCredentialHasher::new(),
        MockInviteCodeSource::new(),
    );
    let err = service
        .register(registration(Role::CompanyAdmin, None))
        .await
        .expect_err("missing company");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
        Some("companyName")
    );
}

#[tokio::test]
async fn register_admin_creates_company_and_links_owner() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users.expect_insert().never();
    let mut companies = MockCompanyRepository::new();
    companies
        .expect_register_owner()
        .withf(|owner, company| {
            owner.company_id == Some(company.id)
                && company.owner_id == owner.id
                && company.tax_id == PENDING_FIELD
                && company.address == PENDING_FIELD
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = make_service(users, companies, hashing_hasher(), codes(&["ABC123"]));
    let profile = service
        .register(registration(Role::CompanyAdmin, Some("Engines Ltd")))
        .await
        .expect("registered");

    let summary = profile.company.expect("company summary");
    assert_eq!(profile.user.company_id, Some(summary.id));
    assert_eq!(summary.name.as_ref(), "Engines Ltd");
}

#[tokio::test]
async fn register_admin_retries_invite_code_collisions() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    let mut companies = MockCompanyRepository::new();
    let mut seq = mockall::Sequence::new();
    companies
        .expect_register_owner()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(CompanyPersistenceError::duplicate_invite_code()));
    companies
        .expect_register_owner()
        .withf(|_, company| company.invite_code.as_ref() == "SECOND")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));

    let service = make_service(
        users,
        companies,
        hashing_hasher(),
        codes(&["FIRST1", "SECOND"]),
    );
    service
        .register(registration(Role::CompanyAdmin, Some("Engines Ltd")))
        .await
        .expect("second code succeeds");
}

#[tokio::test]
async fn register_admin_gives_up_after_repeated_collisions() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    let mut companies = MockCompanyRepository::new();
    companies
        .expect_register_owner()
        .times(INVITE_CODE_ATTEMPTS as usize)
        .returning(|_, _| Err(CompanyPersistenceError::duplicate_invite_code()));

    let service = make_service(
        users,
        companies,
        hashing_hasher(),
        codes(&["AAAAAA", "BBBBBB", "CCCCCC", "DDDDDD", "EEEEEE"]),
    );
    let err = service
        .register(registration(Role::CompanyAdmin, Some("Engines Ltd")))
        .await
        .expect_err("exhausted");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn login_rejects_bad_credentials(#[case] user_exists: bool) {
    let stored = user(Role::Employee, None);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(user_exists.then_some(stored)));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$argon2id$decoy")));
    hasher.expect_verify().times(1).returning(|_, _| Ok(false));

    let service = make_service(
        users,
        MockCompanyRepository::new(),
        hasher,
        MockInviteCodeSource::new(),
    );
    let credentials = LoginCredentials::try_from_parts("ada@example.com", "wrong").expect("creds");
    let err = service.login(&credentials).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[tokio::test]
async fn unknown_email_verifies_against_a_cached_decoy() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(2).returning(|_| Ok(None));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Ok(PasswordHash::new("$argon2id$decoy")));
    hasher
        .expect_verify()
        .withf(|candidate, stored| {
            (candidate == "guess-one" || candidate == "guess-two")
                && stored.as_str() == "$argon2id$decoy"
        })
        .times(2)
        .returning(|_, _| Ok(true));

    let service = make_service(
        users,
        MockCompanyRepository::new(),
        hasher,
        MockInviteCodeSource::new(),
    );
    for guess in ["guess-one", "guess-two"] {
        let credentials =
            LoginCredentials::try_from_parts("nobody@example.com", guess).expect("creds");
        let err = service.login(&credentials).await.expect_err("unknown email");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }
}

#[tokio::test]
async fn login_returns_profile_with_company() {
    let company_id = CompanyId::random();
    let stored = user(Role::Technician, Some(company_id));
    let owner = stored.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored)));
    let mut companies = MockCompanyRepository::new();
    companies
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(company(&owner))));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(true));

    let service = make_service(users, companies, hasher, MockInviteCodeSource::new());
    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "correct").expect("creds");
    let profile = service.login(&credentials).await.expect("logged in");
    assert_eq!(profile.company.map(|c| c.id), Some(company_id));
}

#[tokio::test]
async fn join_company_links_user_to_inviting_company() {
    let joiner = user(Role::Employee, None);
    let joiner_id = joiner.id;
    let owner = user(Role::CompanyAdmin, Some(CompanyId::random()));
    let target = company(&owner);
    let target_id = target.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(joiner)));
    users
        .expect_update()
        .withf(move |user| user.id == joiner_id && user.company_id == Some(target_id))
        .times(1)
        .return_once(|_| Ok(()));
    let mut companies = MockCompanyRepository::new();
    companies
        .expect_find_by_invite_code()
        .withf(|code| code.as_ref() == "ENG1NE")
        .return_once(move |_| Ok(Some(target)));

    let service = make_service(
        users,
        companies,
        MockCredentialHasher::new(),
        MockInviteCodeSource::new(),
    );
    let code = InviteCode::new("eng1ne").expect("code");
    let profile = service
        .join_company(&joiner_id, &code)
        .await
        .expect("joined");
    assert_eq!(profile.user.company_id, Some(target_id));
    assert_eq!(profile.user.updated_at, fixed_now());
}

#[tokio::test]
async fn join_company_rejects_unknown_code() {
    let joiner = user(Role::Employee, None);
    let joiner_id = joiner.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(joiner)));
    users.expect_update().never();
    let mut companies = MockCompanyRepository::new();
    companies
        .expect_find_by_invite_code()
        .return_once(|_| Ok(None));

    let service = make_service(
        users,
        companies,
        MockCredentialHasher::new(),
        MockInviteCodeSource::new(),
    );
    let code = InviteCode::new("ZZZZZZ").expect("code");
    let err = service
        .join_company(&joiner_id, &code)
        .await
        .expect_err("unknown code");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn current_maps_connection_failures_to_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let service = make_service(
        users,
        MockCompanyRepository::new(),
        MockCredentialHasher::new(),
        MockInviteCodeSource::new(),
    );
    let err = service
        .current(&UserId::random())
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
