//! Notification trigger boundary
//!
//! After a successful status transition the server notifies the
//! affected customer. Delivery is an external collaborator; this module
//! only defines the seam plus a logging implementation. Failures here
//! are logged by the caller and never propagated - a failed
//! notification must not roll back a committed status transition.

use async_trait::async_trait;
use serde::Serialize;
use shared::order::OrderStatus;
use thiserror::Error;

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("notification rejected: {0}")]
    Rejected(String),
}

/// Payload handed to the notification channel
#[derive(Debug, Clone, Serialize)]
pub struct StatusNotification {
    pub venue_id: String,
    pub receipt_number: i64,
    /// Customer contact, when the checkout carried one
    pub customer_id: String,
    pub customer_contact: Option<String>,
    /// The status the order (or slice) moved to
    pub status: OrderStatus,
    /// Tenant whose slice changed; None for whole-order transitions
    pub tenant_id: Option<String>,
}

/// Seam for the external notification channel
#[async_trait]
pub trait NotificationTrigger: Send + Sync {
    async fn order_status_changed(&self, notification: &StatusNotification)
    -> Result<(), NotifyError>;
}

/// Default implementation: structured log line only
///
/// Deployments wire a real channel (push, WhatsApp gateway) behind the
/// same trait.
pub struct LogNotifier;

#[async_trait]
impl NotificationTrigger for LogNotifier {
    async fn order_status_changed(
        &self,
        notification: &StatusNotification,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            venue_id = %notification.venue_id,
            receipt_number = notification.receipt_number,
            customer_id = %notification.customer_id,
            status = %notification.status,
            tenant_id = ?notification.tenant_id,
            "Order status notification"
        );
        Ok(())
    }
}
