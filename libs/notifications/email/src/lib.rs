//! Transactional email delivery.
//!
//! Provides an [`EmailProvider`] trait with an SMTP implementation (lettre)
//! and a mock for tests. The billing service only sends short transactional
//! messages (password-reset OTP codes), so there is no queueing layer.

pub mod models;
pub mod provider;

pub use models::Email;
pub use provider::{EmailProvider, MockSmtpProvider, SendResult, SmtpProvider};
