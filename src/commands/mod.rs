use crate::{client::ApiClient, errors::ConsoleError};
use async_trait::async_trait;
use std::sync::Arc;

/// Command trait for mutations against the backend.
///
/// A command carries everything needed for one write: it validates its own
/// input, performs the request through the shared client and returns the
/// record the backend sent back.
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command against the backend reachable through `client`.
    async fn execute(&self, client: Arc<ApiClient>) -> Result<Self::Result, ConsoleError>;
}

pub mod delete_record_command;
pub mod masters;
pub mod papers;
pub mod purchases;
pub mod reels;

pub use delete_record_command::DeleteRecordCommand;
pub use masters::SaveMasterCommand;
pub use papers::SavePaperMasterCommand;
pub use purchases::RecordPurchaseCommand;
pub use reels::StockOutCommand;
