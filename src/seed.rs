//! Development fixtures

use sqlx::{PgPool, Postgres, Transaction};

use crate::{error::AppResult, models::user::Role, services::users::hash_password};

/// (email, password, role)
const USERS: [(&str, &str, Role); 3] = [
    ("batya@pt.com", "batya123", Role::Admin),
    ("rob@pt.com", "rob123", Role::Admin),
    ("brian@pt.com", "brian123", Role::User),
];

/// (title, author)
const BOOKS: [(&str, &str); 6] = [
    ("A Little Life", "Hanya Yanagihara"),
    ("The Anthropocene Reviewed", "John Green"),
    ("The Handmaid's Tale", "Margaret Atwood"),
    ("The Perks of Being a Wallflower", "Stephen Chbosky"),
    ("Memoirs of a Geisha", "Arthur Golden"),
    ("The Souls of Black Folk", "W. E. B. Du Bois"),
];

/// Borrower of the seeded open checkouts
const BORROWER: usize = 1;

/// Number of seeded books the borrower holds
const BORROWED: usize = 4;

/// Replace all data with the fixture set.
///
/// Users get ids 1..=3 and books 1..=6. User 2 holds books 1 to 4, and those
/// books are marked unavailable in the same transaction.
pub async fn load(pool: &PgPool) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("TRUNCATE checkouts, books, users RESTART IDENTITY CASCADE")
        .execute(&mut *tx)
        .await?;

    let mut user_ids = Vec::with_capacity(USERS.len());
    for (email, password, role) in USERS {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO users (email, password, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(email)
        .bind(hash_password(password)?)
        .bind(role.as_str())
        .fetch_one(&mut *tx)
        .await?;
        user_ids.push(id);
    }

    let mut book_ids = Vec::with_capacity(BOOKS.len());
    for (title, author) in BOOKS {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author, isbn, description)
            VALUES ($1, $2, 'isbn', 'description')
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(author)
        .fetch_one(&mut *tx)
        .await?;
        book_ids.push(id);
    }

    for &book_id in &book_ids[..BORROWED] {
        checkout(&mut tx, user_ids[BORROWER], book_id).await?;
    }

    tx.commit().await?;

    tracing::info!(
        "Seeded {} users, {} books and {} checkouts",
        user_ids.len(),
        book_ids.len(),
        BORROWED
    );
    Ok(())
}

async fn checkout(tx: &mut Transaction<'_, Postgres>, user_id: i32, book_id: i32) -> AppResult<()> {
    sqlx::query("INSERT INTO checkouts (user_id, book_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(book_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("UPDATE books SET available = FALSE, updated_at = NOW() WHERE id = $1")
        .bind(book_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
