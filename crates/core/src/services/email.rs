//! SMTP email notifier.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use storefront_common::{AppError, AppResult};

use crate::services::notifier::Notifier;

/// SMTP transport configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP host
    pub host: String,
    /// SMTP port
    pub port: u16,
    /// Use STARTTLS
    pub use_tls: bool,
    /// Username
    pub username: Option<String>,
    /// Password
    pub password: Option<String>,
}

/// Email configuration.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP transport settings
    pub smtp: SmtpConfig,
    /// From address
    pub from_address: String,
    /// From name
    pub from_name: String,
}

/// Email service sending through SMTP.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
    /// Create a new email service from SMTP configuration.
    pub fn new(config: EmailConfig) -> AppResult<Self> {
        let mut builder = if config.smtp.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp.host)
                .map_err(|e| AppError::Config(format!("Invalid SMTP relay: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp.host)
        };

        builder = builder.port(config.smtp.port);

        if let (Some(username), Some(password)) = (&config.smtp.username, &config.smtp.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }
}

#[async_trait]
impl Notifier for EmailService {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_address)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid recipient address: {e}")))?;

        let builder = Message::builder().from(from).to(to).subject(subject);

        let message = match html_body {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                text_body.to_string(),
                html.to_string(),
            )),
            None => builder.body(text_body.to_string()),
        }
        .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalService(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}

/// Render the suspension notice sent when the guard locks a user out.
///
/// Returns `(subject, text_body, html_body)`.
#[must_use]
pub fn suspension_notice(user_name: &str) -> (String, String, String) {
    let subject = "Review Access Suspended".to_string();
    let text = format!(
        "Hi {user_name},\n\n\
        You've entered an invalid unique code too many times and are now \
        suspended from posting reviews for 1 hour.\n\n\
        Please try again later."
    );
    let html = wrap_html(&format!(
        "<p>Hi <strong>{user_name}</strong>,</p>\
        <p>You've entered an invalid unique code too many times and are now \
        <b>suspended from posting reviews</b> for <b>1 hour</b>.</p>\
        <p>Please try again later.</p>"
    ));
    (subject, text, html)
}

/// Wrap HTML content in a basic email template.
fn wrap_html(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
    </style>
</head>
<body>
    {content}
    <hr style="margin-top: 40px; border: none; border-top: 1px solid #e9ecef;">
    <p style="font-size: 12px; color: #6c757d;">— Your Support Team</p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspension_notice_mentions_the_user_and_duration() {
        let (subject, text, html) = suspension_notice("Alice");

        assert_eq!(subject, "Review Access Suspended");
        assert!(text.contains("Hi Alice"));
        assert!(text.contains("1 hour"));
        assert!(html.contains("<strong>Alice</strong>"));
        assert!(html.contains("1 hour"));
    }

    #[test]
    fn test_html_body_is_a_full_document() {
        let (_, _, html) = suspension_notice("Bob");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("</html>"));
    }
}
