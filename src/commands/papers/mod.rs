pub mod save_paper_master_command;

pub use save_paper_master_command::SavePaperMasterCommand;
