//! Mock email provider for testing

use super::{EmailProvider, SendResult};
use crate::models::Email;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock email provider that captures sent emails
pub struct MockSmtpProvider {
    sent_emails: Arc<Mutex<Vec<Email>>>,
    should_fail: bool,
    failure_message: Option<String>,
}

impl MockSmtpProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self {
            sent_emails: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
            failure_message: None,
        }
    }

    /// Create a mock provider that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent_emails: Arc::new(Mutex::new(Vec::new())),
            should_fail: true,
            failure_message: Some(message.into()),
        }
    }

    /// Get all sent emails
    pub async fn sent_emails(&self) -> Vec<Email> {
        self.sent_emails.lock().await.clone()
    }

    /// Get the count of sent emails
    pub async fn sent_count(&self) -> usize {
        self.sent_emails.lock().await.len()
    }

    /// Check if an email was sent to a specific address
    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent_emails.lock().await.iter().any(|e| e.to == email)
    }
}

impl Default for MockSmtpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockSmtpProvider {
    async fn send(&self, email: &Email) -> Result<SendResult> {
        if self.should_fail {
            let message = self
                .failure_message
                .clone()
                .unwrap_or_else(|| "mock failure".to_string());
            eyre::bail!(message);
        }

        self.sent_emails.lock().await.push(email.clone());

        Ok(SendResult {
            message_id: format!("mock-{}", email.id),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_captures_sent_emails() {
        let provider = MockSmtpProvider::new();
        let email = Email::plain_text("jo@example.com", "Your code", "123456");

        provider.send(&email).await.unwrap();

        assert_eq!(provider.sent_count().await, 1);
        assert!(provider.was_sent_to("jo@example.com").await);
    }

    #[tokio::test]
    async fn test_failing_mock_errors() {
        let provider = MockSmtpProvider::failing("smtp down");
        let email = Email::plain_text("jo@example.com", "Your code", "123456");

        let err = provider.send(&email).await.unwrap_err();
        assert!(err.to_string().contains("smtp down"));
        assert_eq!(provider.sent_count().await, 0);
    }
}
