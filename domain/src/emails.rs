//! Dispatch of a finished meeting summary as a plain-text email.

use crate::{error::Error, send_guard::InFlightSends};
use async_trait::async_trait;
use email_address::EmailAddress;
use log::*;
use serde::Serialize;
use service::config::Config;

/// Subject line of every summary email.
pub const SUMMARY_EMAIL_SUBJECT: &str = "AI-Generated Meeting Summary";

pub const MISSING_CONFIG: &str = "RESEND_API_KEY or EMAIL_FROM not configured";
pub const FIELDS_REQUIRED: &str = "recipient and summary are required";
pub const DUPLICATE_SEND: &str = "An identical email is already being sent";
const FALLBACK_ERROR: &str = "Failed to send email";

/// A single-recipient, plain-text email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Synchronous acknowledgment from the mail provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendReceipt {
    pub message_id: Option<String>,
}

/// Transactional email provider seam.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand one email to the provider. Not idempotent: every call sends.
    async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt, Error>;

    fn provider_id(&self) -> &'static str;
}

/// The configured sender address, or the configuration error when either the
/// Resend API key or the sender is missing.
pub fn sender_address(config: &Config) -> Result<&str, Error> {
    match (config.resend_api_key(), config.email_from()) {
        (Some(_), Some(from)) => Ok(from),
        _ => {
            error!("Summary email requested but Resend API key or sender address is not configured");
            Err(Error::config(MISSING_CONFIG))
        }
    }
}

/// Sends `summary` to `recipient` from the configured sender.
///
/// The summary becomes the body byte-for-byte. Configuration is checked before
/// input, and while an identical send is still in flight a repeat is rejected
/// without reaching the provider.
pub async fn send_summary_email(
    config: &Config,
    mailer: &dyn Mailer,
    in_flight: &InFlightSends,
    recipient: Option<&str>,
    summary: Option<&str>,
) -> Result<SendReceipt, Error> {
    let from = sender_address(config)?;

    let (recipient, summary) = match (non_blank(recipient), non_blank(summary)) {
        (Some(recipient), Some(summary)) => (recipient.trim(), summary),
        _ => {
            debug!("Rejecting summary email with a blank recipient or summary");
            return Err(Error::validation(FIELDS_REQUIRED));
        }
    };

    if !EmailAddress::is_valid(recipient) {
        // Not rejected here: the provider is the authority on deliverable addresses.
        warn!(
            "Recipient does not look like an email address: {}",
            masked(recipient)
        );
    }

    let _permit = in_flight.try_acquire(recipient, summary).ok_or_else(|| {
        warn!(
            "Duplicate summary email to {} rejected while the first is in flight",
            masked(recipient)
        );
        Error::conflict(DUPLICATE_SEND)
    })?;

    let email = OutgoingEmail {
        from: from.to_string(),
        to: recipient.to_string(),
        subject: SUMMARY_EMAIL_SUBJECT.to_string(),
        text: summary.to_string(),
    };

    info!(
        "Sending summary email to {} via {}",
        masked(recipient),
        mailer.provider_id()
    );
    let receipt = mailer.send(email).await.map_err(|err| {
        warn!("{} failed to send summary email: {err}", mailer.provider_id());
        err.with_fallback_message(FALLBACK_ERROR)
    })?;
    debug!("Summary email accepted, message_id: {:?}", receipt.message_id);

    Ok(receipt)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// Keeps the first character of the local part and the domain: "b***@example.com".
fn masked(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind, InternalErrorKind};
    use mockall::mock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    mock! {
        pub Outbox {}

        #[async_trait]
        impl Mailer for Outbox {
            async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt, Error>;
            fn provider_id(&self) -> &'static str;
        }
    }

    fn configured() -> Config {
        Config::from_defaults()
            .set_resend_api_key(Some("re_test".to_string()))
            .set_email_from(Some("Meeting Notes <notes@example.com>".to_string()))
    }

    fn mock_mailer() -> MockOutbox {
        let mut mailer = MockOutbox::new();
        mailer.expect_provider_id().return_const("mock");
        mailer
    }

    #[test]
    fn test_masked_hides_local_part() {
        assert_eq!(masked("bob.smith@example.com"), "b***@example.com");
        assert_eq!(masked("@example.com"), "***@example.com");
        assert_eq!(masked("team-inbox"), "***");
    }

    #[test]
    fn test_sender_address_requires_key_and_sender() {
        assert_eq!(
            sender_address(&configured()).unwrap(),
            "Meeting Notes <notes@example.com>"
        );
        assert_eq!(
            sender_address(&configured().set_resend_api_key(None))
                .unwrap_err()
                .message(),
            MISSING_CONFIG
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_or_sender_is_a_config_error() {
        let configs = [
            configured().set_resend_api_key(None),
            configured().set_email_from(None),
        ];

        for config in configs {
            let mut mailer = mock_mailer();
            mailer.expect_send().never();

            let err = send_summary_email(
                &config,
                &mailer,
                &InFlightSends::new(),
                Some("bob@example.com"),
                Some("notes"),
            )
            .await
            .unwrap_err();

            assert_eq!(
                err.error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Config(MISSING_CONFIG.to_string()))
            );
        }
    }

    #[tokio::test]
    async fn test_config_error_wins_over_blank_input() {
        let mut mailer = mock_mailer();
        mailer.expect_send().never();

        let err = send_summary_email(
            &configured().set_email_from(None),
            &mailer,
            &InFlightSends::new(),
            Some(""),
            None,
        )
        .await
        .unwrap_err();

        assert_eq!(err.message(), MISSING_CONFIG);
    }

    #[tokio::test]
    async fn test_blank_recipient_or_summary_sends_nothing() {
        let cases = [
            (Some(""), Some("x")),
            (Some("bob@example.com"), Some("   ")),
            (None, Some("x")),
            (Some("bob@example.com"), None),
        ];

        for (recipient, summary) in cases {
            let mut mailer = mock_mailer();
            mailer.expect_send().never();

            let err = send_summary_email(
                &configured(),
                &mailer,
                &InFlightSends::new(),
                recipient,
                summary,
            )
            .await
            .unwrap_err();

            assert_eq!(
                err.error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Validation(
                    FIELDS_REQUIRED.to_string()
                ))
            );
        }
    }

    #[tokio::test]
    async fn test_sends_exactly_one_email_with_fixed_subject_and_unmodified_body() {
        let summary = "  - Decision: ship v2\n- Owner: Alice (Friday)\n\n";
        let mut mailer = mock_mailer();
        mailer
            .expect_send()
            .withf(move |email| {
                email.subject == SUMMARY_EMAIL_SUBJECT
                    && email.text == summary
                    && email.to == "bob@example.com"
                    && email.from == "Meeting Notes <notes@example.com>"
            })
            .times(1)
            .returning(|_| {
                Ok(SendReceipt {
                    message_id: Some("msg_1".to_string()),
                })
            });

        let receipt = send_summary_email(
            &configured(),
            &mailer,
            &InFlightSends::new(),
            Some(" bob@example.com "),
            Some(summary),
        )
        .await
        .unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("msg_1"));
    }

    #[tokio::test]
    async fn test_malformed_recipient_is_still_forwarded() {
        let mut mailer = mock_mailer();
        mailer
            .expect_send()
            .withf(|email| email.to == "team-inbox")
            .times(1)
            .returning(|_| Ok(SendReceipt::default()));

        let result = send_summary_email(
            &configured(),
            &mailer,
            &InFlightSends::new(),
            Some("team-inbox"),
            Some("notes"),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_provider_failure_without_message_uses_fallback() {
        let mut mailer = mock_mailer();
        mailer.expect_send().times(1).returning(|_| {
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Provider(String::new())),
            })
        });
        let in_flight = InFlightSends::new();

        let err = send_summary_email(
            &configured(),
            &mailer,
            &in_flight,
            Some("bob@example.com"),
            Some("notes"),
        )
        .await
        .unwrap_err();

        assert_eq!(err.message(), FALLBACK_ERROR);
        assert!(in_flight.is_empty(), "a failed send must release its guard");
    }

    struct SlowMailer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Mailer for SlowMailer {
        async fn send(&self, _email: OutgoingEmail) -> Result<SendReceipt, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(SendReceipt::default())
        }

        fn provider_id(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_identical_send_in_flight_is_rejected() {
        let config = configured();
        let mailer = SlowMailer {
            calls: AtomicUsize::new(0),
        };
        let in_flight = InFlightSends::new();

        let first = send_summary_email(
            &config,
            &mailer,
            &in_flight,
            Some("bob@example.com"),
            Some("notes"),
        );
        let second = send_summary_email(
            &config,
            &mailer,
            &in_flight,
            Some("bob@example.com"),
            Some("notes"),
        );
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert_eq!(
            second.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Conflict(DUPLICATE_SEND.to_string()))
        );
        assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);

        // Once the first send finishes the same email may be sent again.
        send_summary_email(
            &config,
            &mailer,
            &in_flight,
            Some("bob@example.com"),
            Some("notes"),
        )
        .await
        .unwrap();
        assert_eq!(mailer.calls.load(Ordering::SeqCst), 2);
    }
}
