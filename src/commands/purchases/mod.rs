pub mod record_purchase_command;

pub use record_purchase_command::RecordPurchaseCommand;
