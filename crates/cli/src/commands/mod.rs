pub mod config_cmd;
pub mod invoke;
pub mod validate;
