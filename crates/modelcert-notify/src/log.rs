// modelcert-notify/src/log.rs
// ============================================================================
// Module: Log Notifier
// Description: Log-only notifier writing JSON-line notification records.
// Purpose: Persist notification records without contacting external systems.
// Dependencies: modelcert-core, serde_json, std
// ============================================================================

//! ## Overview
//! `LogNotifier` writes one JSON line per notification and delivers nothing
//! externally. It is the audit-grade default sink for tests and demos.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use modelcert_core::ApprovalNotifier;
use modelcert_core::CertificationRun;
use modelcert_core::CertificationStatus;
use modelcert_core::NotifyError;

use crate::message::NotificationMessage;

// ============================================================================
// SECTION: Log Notifier
// ============================================================================

/// Log-only notification sink.
pub struct LogNotifier<W: Write + Send> {
    /// Output writer for notification records.
    writer: Mutex<W>,
}

impl<W: Write + Send> LogNotifier<W> {
    /// Creates a log notifier over a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes one notification record as a JSON line.
    fn write_message(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| NotifyError::Delivery("log writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, message)
            .map_err(|err| NotifyError::Delivery(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| NotifyError::Delivery(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

impl<W: Write + Send> ApprovalNotifier for LogNotifier<W> {
    fn notify_approval_required(&self, run: &CertificationRun) -> Result<(), NotifyError> {
        self.write_message(&NotificationMessage::approval_required(run))
    }

    fn notify_completed(
        &self,
        run: &CertificationRun,
        status: CertificationStatus,
    ) -> Result<(), NotifyError> {
        self.write_message(&NotificationMessage::completed(run, status))
    }
}
