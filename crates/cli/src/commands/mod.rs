pub mod categories;
pub mod config_cmd;
pub mod doctor;
pub mod generate;
pub mod init;
pub mod serve;
