//! Data models for Lectern

pub mod book;
pub mod checkout;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookInput, BookQuery};
pub use checkout::{BookRecord, Checkout, CheckoutRequest, UserRecord};
pub use user::{Role, User, UserClaims};
