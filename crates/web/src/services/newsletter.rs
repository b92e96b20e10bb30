//! Newsletter broadcast.

use serde::{Deserialize, Serialize};

use cornerstone_core::Email;

use super::email::Mailer;

/// A newsletter issue as submitted by an admin.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterMessage {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl NewsletterMessage {
    /// Check that the message has a subject and at least one body.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the message is incomplete.
    pub fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() {
            return Err("Subject is required".to_string());
        }
        if self.html.trim().is_empty() && self.text.trim().is_empty() {
            return Err("Message body is required".to_string());
        }
        Ok(())
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
}

/// Send `message` to every recipient, one at a time.
///
/// A failed delivery is logged and counted; it never stops the loop. There
/// are no retries.
#[tracing::instrument(skip_all, fields(subject = %message.subject, total = recipients.len()))]
pub async fn broadcast<M: Mailer>(
    mailer: &M,
    recipients: &[Email],
    message: &NewsletterMessage,
) -> BroadcastReport {
    let mut report = BroadcastReport {
        total: recipients.len(),
        ..BroadcastReport::default()
    };

    for recipient in recipients {
        match mailer
            .send_multipart(recipient.as_str(), &message.subject, &message.text, &message.html)
            .await
        {
            Ok(()) => report.sent += 1,
            Err(e) => {
                tracing::warn!(recipient = %recipient, error = %e, "Newsletter delivery failed");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        sent = report.sent,
        failed = report.failed,
        "Newsletter broadcast finished"
    );
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::services::email::EmailError;

    /// Records deliveries and fails for any address containing "bounce".
    #[derive(Default)]
    struct RecordingMailer {
        delivered: Mutex<Vec<String>>,
    }

    impl Mailer for RecordingMailer {
        async fn send_multipart(
            &self,
            to: &str,
            _subject: &str,
            _text_body: &str,
            _html_body: &str,
        ) -> Result<(), EmailError> {
            if to.contains("bounce") {
                return Err(EmailError::InvalidAddress(to.to_string()));
            }
            self.delivered.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    fn message() -> NewsletterMessage {
        NewsletterMessage {
            subject: "Project update".to_string(),
            html: "<p>New builds</p>".to_string(),
            text: "New builds".to_string(),
        }
    }

    fn emails(addresses: &[&str]) -> Vec<Email> {
        addresses.iter().map(|a| Email::parse(a).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_broadcast_counts_failures_without_stopping() {
        let mailer = RecordingMailer::default();
        let recipients = emails(&["a@example.com", "bounce@example.com", "c@example.com"]);

        let report = broadcast(&mailer, &recipients, &message()).await;

        assert_eq!(
            report,
            BroadcastReport {
                sent: 2,
                failed: 1,
                total: 3
            }
        );
        assert_eq!(
            *mailer.delivered.lock().unwrap(),
            vec!["a@example.com".to_string(), "c@example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_broadcast_to_nobody() {
        let report = broadcast(&RecordingMailer::default(), &[], &message()).await;
        assert_eq!(report, BroadcastReport::default());
    }

    #[test]
    fn test_validate_requires_subject_and_body() {
        assert!(message().validate().is_ok());

        let mut no_subject = message();
        no_subject.subject = "  ".to_string();
        assert!(no_subject.validate().is_err());

        let mut no_body = message();
        no_body.html.clear();
        no_body.text.clear();
        assert!(no_body.validate().is_err());

        let mut text_only = message();
        text_only.html.clear();
        assert!(text_only.validate().is_ok());
    }
}
