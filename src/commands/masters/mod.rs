pub mod save_master_command;

pub use save_master_command::SaveMasterCommand;
