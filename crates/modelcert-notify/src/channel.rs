// modelcert-notify/src/channel.rs
// ============================================================================
// Module: Channel Notifier
// Description: Channel-based notifier for asynchronous delivery.
// Purpose: Send notification messages through a Tokio mpsc channel.
// Dependencies: modelcert-core, tokio
// ============================================================================

//! ## Overview
//! [`ChannelNotifier`] delivers notifications by sending messages into a
//! `tokio::sync::mpsc` channel. A full or closed channel is a delivery
//! failure; the engine treats those as best-effort losses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use modelcert_core::ApprovalNotifier;
use modelcert_core::CertificationRun;
use modelcert_core::CertificationStatus;
use modelcert_core::NotifyError;
use tokio::sync::mpsc::Sender;

use crate::message::NotificationMessage;

// ============================================================================
// SECTION: Channel Notifier
// ============================================================================

/// Channel-based notification sink.
#[derive(Debug)]
pub struct ChannelNotifier {
    /// Sender used to deliver messages.
    sender: Sender<NotificationMessage>,
}

impl ChannelNotifier {
    /// Creates a channel notifier over a sender.
    #[must_use]
    pub const fn new(sender: Sender<NotificationMessage>) -> Self {
        Self {
            sender,
        }
    }

    /// Sends one message without blocking.
    fn send(&self, message: NotificationMessage) -> Result<(), NotifyError> {
        self.sender.try_send(message).map_err(|err| NotifyError::Delivery(err.to_string()))
    }
}

impl ApprovalNotifier for ChannelNotifier {
    fn notify_approval_required(&self, run: &CertificationRun) -> Result<(), NotifyError> {
        self.send(NotificationMessage::approval_required(run))
    }

    fn notify_completed(
        &self,
        run: &CertificationRun,
        status: CertificationStatus,
    ) -> Result<(), NotifyError> {
        self.send(NotificationMessage::completed(run, status))
    }
}
