//! Port traits at the I/O seams: the dataset source and configuration.

pub mod config_port;
pub mod data_port;
