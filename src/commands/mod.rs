#![allow(clippy::needless_pass_by_value)]

pub mod export;
pub mod init;
pub mod item;
pub mod list;
pub mod matches;
pub mod status;
pub mod summary;
