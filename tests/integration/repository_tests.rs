//! Repository and service tests against a migrated Postgres database
//!
//! Each test reloads the fixture set, so point `TEST_DATABASE_URL` (or
//! `DATABASE_URL`) at a throwaway database. Run with: cargo test -- --ignored

use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::{Mutex, MutexGuard};

use lectern_server::{
    config::AppConfig,
    error::AppError,
    models::{
        user::{CreateUser, LoginRequest},
        CheckoutRequest, Role,
    },
    repository::Repository,
    seed,
    services::Services,
};

/// Seeded ids
const ROB: i32 = 2;
const BRIAN: i32 = 3;

static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Fresh fixtures behind a lock, since every test rewrites the same tables
async fn setup() -> (MutexGuard<'static, ()>, PgPool, Services) {
    let guard = DB_LOCK.lock().await;
    dotenvy::dotenv().ok();

    let config = AppConfig::default();
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| config.database.url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    seed::load(&pool).await.expect("Failed to seed");

    let services = Services::new(Repository::new(pool.clone()), &config);
    (guard, pool, services)
}

fn request(user_id: i32, book_id: i32) -> CheckoutRequest {
    CheckoutRequest { user_id, book_id }
}

#[tokio::test]
#[ignore]
async fn test_users_decode_from_schema() {
    let (_guard, pool, _services) = setup().await;
    let repository = Repository::new(pool);

    let rob = repository
        .users
        .get_by_email("ROB@pt.com")
        .await
        .expect("Failed to load user")
        .expect("rob is seeded");
    assert_eq!(rob.id, ROB);
    assert_eq!(rob.role, Role::Admin);

    let brian = repository.users.get_by_id(BRIAN).await.expect("Failed to load user");
    assert_eq!(brian.role, Role::User);

    let users = repository.users.list(100).await.expect("Failed to list users");
    assert_eq!(users.len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_login_and_signup() {
    let (_guard, _pool, services) = setup().await;

    let (token, user) = services
        .users
        .authenticate(LoginRequest {
            email: "brian@pt.com".to_string(),
            password: "brian123".to_string(),
        })
        .await
        .expect("Login failed");
    assert_eq!(user.id, BRIAN);
    assert_eq!(services.users.verify_token(&token).unwrap().user_id, BRIAN);

    let wrong = services
        .users
        .authenticate(LoginRequest {
            email: "brian@pt.com".to_string(),
            password: "nope".to_string(),
        })
        .await;
    assert!(matches!(wrong, Err(AppError::Authentication(_))));

    let created = services
        .users
        .signup(
            CreateUser {
                email: "reader@pt.com".to_string(),
                password: "reader123".to_string(),
                role: "user".to_string(),
            },
            None,
        )
        .await
        .expect("Signup failed");
    assert_eq!(created.role, Role::User);

    let duplicate = services
        .users
        .signup(
            CreateUser {
                email: "Reader@PT.com".to_string(),
                password: "reader123".to_string(),
                role: "user".to_string(),
            },
            None,
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
#[ignore]
async fn test_checkout_quota_holder_and_checkin() {
    let (_guard, pool, services) = setup().await;
    let repository = Repository::new(pool);

    // Rob holds books 1 to 4; book 5 is the fifth and last allowed
    let checkout = services
        .checkouts
        .checkout(request(ROB, 5))
        .await
        .expect("Checkout failed");
    assert!(!checkout.checked_in);
    assert!(checkout.checked_in_at.is_none());
    assert!(!repository.books.get_by_id(5).await.unwrap().available);

    let over_quota = services.checkouts.checkout(request(ROB, 6)).await;
    assert!(matches!(over_quota, Err(AppError::CheckoutLimitReached(_))));
    assert!(repository.books.get_by_id(6).await.unwrap().available);

    let held = services.checkouts.checkout(request(BRIAN, 1)).await;
    assert!(matches!(held, Err(AppError::BookUnavailable(_))));

    let not_holder = services.checkouts.checkin(request(BRIAN, 5)).await;
    assert!(matches!(not_holder, Err(AppError::NotCheckedOut(_))));

    let returned = services
        .checkouts
        .checkin(request(ROB, 5))
        .await
        .expect("Checkin failed");
    assert!(returned.checked_in);
    assert!(returned.checked_in_at.is_some());
    assert!(repository.books.get_by_id(5).await.unwrap().available);

    // A second checkin of the same book has nothing open to close
    let again = services.checkouts.checkin(request(ROB, 5)).await;
    assert!(matches!(again, Err(AppError::NotCheckedOut(_))));

    let current = services.checkouts.current_books(ROB).await.unwrap();
    assert_eq!(current.len(), 4);
    assert!(current.iter().all(|book| !book.available));

    let history = services.checkouts.user_history(ROB).await.unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].book_id, 5);
    assert!(history[0].checked_in.is_some());

    let borrowers = services.checkouts.book_history(5).await.unwrap();
    assert_eq!(borrowers.len(), 1);
    assert_eq!(borrowers[0].email, "rob@pt.com");

    // Freed book moves to the next reader
    services
        .checkouts
        .checkout(request(BRIAN, 5))
        .await
        .expect("Checkout after return failed");
}

#[tokio::test]
#[ignore]
async fn test_checkout_of_unknown_book_or_user() {
    let (_guard, _pool, services) = setup().await;

    let missing_book = services.checkouts.checkout(request(BRIAN, 999_999)).await;
    assert!(matches!(missing_book, Err(AppError::NotFound(_))));

    let missing_user = services.checkouts.checkout(request(999_999, 6)).await;
    assert!(matches!(missing_user, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn test_deletes_refused_while_books_are_out() {
    let (_guard, _pool, services) = setup().await;

    let user = services.users.delete_user(ROB).await;
    assert!(matches!(user, Err(AppError::Conflict(_))));

    let book = services.books.delete_book(1).await;
    assert!(matches!(book, Err(AppError::Conflict(_))));

    services.books.delete_book(6).await.expect("Delete failed");
    assert!(matches!(
        services.books.get_book(6).await,
        Err(AppError::NotFound(_))
    ));

    services.users.delete_user(BRIAN).await.expect("Delete failed");
    assert!(matches!(
        services.users.get_by_id(BRIAN).await,
        Err(AppError::NotFound(_))
    ));
}
