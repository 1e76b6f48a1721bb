//! Event lifecycle state machine.
//!
//! States: `draft -> pending_approval -> approved -> published ->
//! {completed, cancelled}`, with `pending_approval -> draft` on rejection
//! and CANCEL allowed from any non-terminal state. Transitions are gated
//! by actor role and stamp the audit trail through the injected [`Clock`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Actor, Event, LifecycleStatus};
use crate::services::clock::Clock;
use crate::services::error::{ServiceError, ServiceResult};

/// Explicit workflow actions a caller may request alongside an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    SubmitForApproval,
    Approve,
    Reject,
    Publish,
    Complete,
    Cancel,
}

impl WorkflowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::SubmitForApproval => "submit_for_approval",
            WorkflowAction::Approve => "approve",
            WorkflowAction::Reject => "reject",
            WorkflowAction::Publish => "publish",
            WorkflowAction::Complete => "complete",
            WorkflowAction::Cancel => "cancel",
        }
    }
}

/// Apply a workflow action to an event, enforcing the transition table.
///
/// `comment` doubles as the approval comment, rejection comment or
/// cancellation reason depending on the action.
pub fn apply_action(
    event: &mut Event,
    action: WorkflowAction,
    actor: &Actor,
    comment: Option<&str>,
    clock: &dyn Clock,
) -> ServiceResult<()> {
    match action {
        WorkflowAction::SubmitForApproval => {
            require_status(event, action, LifecycleStatus::Draft)?;
            if !actor.is_admin() && !actor.owns(event) {
                return Err(ServiceError::business_rule(
                    "Only the event owner or an administrator may submit an event for approval.",
                ));
            }
            event.status = LifecycleStatus::PendingApproval;
            event.audit.submitted_at = Some(clock.now());
            event.audit.clear_rejection();
        }
        WorkflowAction::Approve => {
            require_status(event, action, LifecycleStatus::PendingApproval)?;
            require_admin(actor, action)?;
            event.status = LifecycleStatus::Approved;
            event.audit.approved_by = Some(actor.user_id);
            event.audit.approved_at = Some(clock.now());
            event.audit.approval_comment = comment.map(str::to_string);
            event.audit.clear_rejection();
        }
        WorkflowAction::Reject => {
            require_status(event, action, LifecycleStatus::PendingApproval)?;
            require_admin(actor, action)?;
            let comment = non_empty(comment)
                .ok_or_else(|| ServiceError::business_rule("A rejection comment is required."))?;
            event.status = LifecycleStatus::Draft;
            event.audit.rejected_by = Some(actor.user_id);
            event.audit.rejected_at = Some(clock.now());
            event.audit.rejection_comment = Some(comment.to_string());
            event.audit.clear_approval();
        }
        WorkflowAction::Publish => {
            require_status(event, action, LifecycleStatus::Approved)?;
            require_admin(actor, action)?;
            check_publish_preconditions(event)?;
            event.status = LifecycleStatus::Published;
            event.audit.published_at = Some(clock.now());
        }
        WorkflowAction::Complete => {
            require_status(event, action, LifecycleStatus::Published)?;
            require_admin(actor, action)?;
            event.status = LifecycleStatus::Completed;
            event.audit.completed_at = Some(clock.now());
        }
        WorkflowAction::Cancel => {
            if event.status.is_terminal() {
                return Err(ServiceError::business_rule(format!(
                    "Cannot cancel an event that is already {}.",
                    event.status
                )));
            }
            require_admin(actor, action)?;
            let reason = non_empty(comment)
                .ok_or_else(|| ServiceError::business_rule("A cancellation reason is required."))?;
            event.status = LifecycleStatus::Cancelled;
            event.audit.cancelled_by = Some(actor.user_id);
            event.audit.cancelled_at = Some(clock.now());
            event.audit.cancellation_reason = Some(reason.to_string());
        }
    }

    info!(
        event_id = %event.id,
        action = action.as_str(),
        status = event.status.as_str(),
        "applied workflow action"
    );
    Ok(())
}

/// Authorization and mutability gate for field edits, checked before any
/// change is applied.
pub fn authorize_edit(
    event: &Event,
    actor: &Actor,
    has_field_changes: bool,
    action: Option<WorkflowAction>,
) -> ServiceResult<()> {
    if !actor.is_admin() && !actor.owns(event) {
        return Err(ServiceError::business_rule(
            "Only the event owner or an administrator may modify this event.",
        ));
    }
    if event.status.is_terminal() {
        return Err(ServiceError::business_rule(format!(
            "A {} event can no longer be modified.",
            event.status
        )));
    }
    if event.status == LifecycleStatus::Published
        && has_field_changes
        && !matches!(
            action,
            Some(WorkflowAction::Complete) | Some(WorkflowAction::Cancel)
        )
    {
        return Err(ServiceError::business_rule(
            "A published event only accepts workflow actions; field edits are not allowed.",
        ));
    }
    if event.status == LifecycleStatus::PendingApproval && has_field_changes && !actor.is_admin() {
        return Err(ServiceError::business_rule(
            "Only an administrator may edit an event that is pending approval.",
        ));
    }
    Ok(())
}

/// Approval is not transferable across material changes: a critical-field
/// edit on an approved event, applied without an explicit workflow action,
/// sends the event back through review.
///
/// Returns true when a downgrade happened.
pub fn downgrade_on_critical_change(
    event: &mut Event,
    critical_change: bool,
    action: Option<WorkflowAction>,
    clock: &dyn Clock,
) -> bool {
    if event.status != LifecycleStatus::Approved || !critical_change || action.is_some() {
        return false;
    }
    event.status = LifecycleStatus::PendingApproval;
    event.audit.clear_approval();
    event.audit.clear_publication();
    event.audit.submitted_at = Some(clock.now());
    info!(event_id = %event.id, "approved event downgraded to pending_approval after critical change");
    true
}

fn check_publish_preconditions(event: &Event) -> ServiceResult<()> {
    if event.start_date.is_none() {
        return Err(ServiceError::business_rule(
            "An event needs a start date before it can be published.",
        ));
    }
    if event.registration.required {
        let (opens, closes) = match (event.registration.opens_at, event.registration.closes_at) {
            (Some(opens), Some(closes)) => (opens, closes),
            _ => {
                return Err(ServiceError::business_rule(
                    "Registration opening and closing times are required before publishing.",
                ))
            }
        };
        if opens >= closes {
            return Err(ServiceError::business_rule(
                "Registration must open before it closes.",
            ));
        }
        if let Some(capacity) = event.registration.capacity {
            if capacity <= 0 {
                return Err(ServiceError::business_rule(
                    "Registration capacity must be a positive number.",
                ));
            }
        }
    }
    Ok(())
}

fn require_status(
    event: &Event,
    action: WorkflowAction,
    expected: LifecycleStatus,
) -> ServiceResult<()> {
    if event.status != expected {
        return Err(ServiceError::business_rule(format!(
            "Cannot {} an event in status '{}'.",
            action.as_str().replace('_', " "),
            event.status
        )));
    }
    Ok(())
}

fn require_admin(actor: &Actor, action: WorkflowAction) -> ServiceResult<()> {
    if !actor.is_admin() {
        return Err(ServiceError::business_rule(format!(
            "Only an administrator may {} an event.",
            action.as_str().replace('_', " ")
        )));
    }
    Ok(())
}

fn non_empty(comment: Option<&str>) -> Option<&str> {
    comment.map(str::trim).filter(|c| !c.is_empty())
}
