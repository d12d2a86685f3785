pub mod command;
pub mod status;
