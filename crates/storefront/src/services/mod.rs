//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration, user login and admin login
//! - `account` - Session-gated changes to a user's own record
//! - `basket` - The per-session shopping basket

pub mod account;
pub mod auth;
pub mod basket;

pub use account::AccountService;
pub use auth::{AuthError, AuthService};
pub use basket::{Basket, BasketError, BasketItem};
