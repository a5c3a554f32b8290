pub mod config_store;
pub mod defaults;
pub mod process;
pub mod service;
