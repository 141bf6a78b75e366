//! Identity Domain
//!
//! Staff and admin accounts: argon2 credentials, JWT login sessions (HttpOnly
//! cookie + bearer), OTP-based password reset over email, and the admin staff
//! management surface.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::{admin_router, auth_router, UsersApiDoc, UsersApiState};
pub use models::{CreateUser, LoginRequest, UpdateUser, User, UserProfile, UserRole};
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
