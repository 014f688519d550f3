//! Provisioning run states and remote operation statuses

use serde::{Deserialize, Serialize};

use crate::impl_wire_status_conversions;

/// Where a single provisioning run currently is.
///
/// Runs move strictly forward through these states; any state may fall to
/// [`ProvisioningState::Failed`]. States are logged, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ProvisioningState {
    CleaningUp,
    CheckingExisting,
    CreatingWorkspace,
    /// `poll` is 1-based
    AwaitingWorkspaceAsync { poll: u32 },
    CreatingChannel,
    PersistingIds,
    UploadingApp,
    InstallingApp,
    NotifyingChannel,
    Done,
    Failed(String),
}

impl std::fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CleaningUp => f.write_str("cleaning_up"),
            Self::CheckingExisting => f.write_str("checking_existing"),
            Self::CreatingWorkspace => f.write_str("creating_workspace"),
            Self::AwaitingWorkspaceAsync { poll } => write!(f, "awaiting_workspace_async(poll {poll})"),
            Self::CreatingChannel => f.write_str("creating_channel"),
            Self::PersistingIds => f.write_str("persisting_ids"),
            Self::UploadingApp => f.write_str("uploading_app"),
            Self::InstallingApp => f.write_str("installing_app"),
            Self::NotifyingChannel => f.write_str("notifying_channel"),
            Self::Done => f.write_str("done"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Status of a long-running remote operation (`GET {Location}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    NotStarted,
    InProgress,
    Succeeded,
    Failed,
}

impl_wire_status_conversions!(OperationStatus {
    NotStarted => "notStarted",
    InProgress => "inProgress",
    Succeeded => "succeeded",
    Failed => "failed",
});

impl OperationStatus {
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::NotStarted | Self::InProgress)
    }
}
