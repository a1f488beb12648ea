pub mod stock_out_command;

pub use stock_out_command::StockOutCommand;
