// modelcert-notify/src/lib.rs
// ============================================================================
// Module: Modelcert Notify Library
// Description: Public API surface for stakeholder notification sinks.
// Purpose: Expose notification messages and notifier implementations.
// Dependencies: crate::{channel, log, message, webhook}
// ============================================================================

//! ## Overview
//! Modelcert notify provides [`modelcert_core::ApprovalNotifier`] sinks: a
//! JSON-line log writer, a Tokio channel sender, and an HTTP webhook
//! poster. All sinks serialize the same message shape.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod channel;
pub mod log;
pub mod message;
pub mod webhook;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use channel::ChannelNotifier;
pub use log::LogNotifier;
pub use message::NotificationKind;
pub use message::NotificationMessage;
pub use webhook::WebhookConfig;
pub use webhook::WebhookNotifier;
