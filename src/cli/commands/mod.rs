mod command_result;
pub mod helper;
pub mod init;
pub mod merge;
pub mod wire;

pub use command_result::*;
