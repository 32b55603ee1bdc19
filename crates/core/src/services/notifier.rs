//! Outbound notification dispatch.
//!
//! Core services emit notifications through this trait so the guard and the
//! orchestrator never touch SMTP directly; the real implementation lives in
//! [`crate::services::email`].

use async_trait::async_trait;
use std::sync::Arc;
use storefront_common::AppResult;

/// Best-effort outbound notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a message to a recipient address.
    async fn send(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()>;
}

/// Shared notifier handle.
pub type NotifierService = Arc<dyn Notifier>;

/// Notifier that drops every message (email disabled).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        _text_body: &str,
        _html_body: Option<&str>,
    ) -> AppResult<()> {
        tracing::debug!(to = %to, subject = %subject, "Email disabled, dropping notification");
        Ok(())
    }
}
