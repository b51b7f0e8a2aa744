#![forbid(unsafe_code)]

mod build_info;
mod clock;
mod log_dir;
mod session_log;

pub(crate) use build_info::*;
pub(crate) use clock::*;
pub(crate) use log_dir::*;
pub(crate) use session_log::*;
