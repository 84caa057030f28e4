pub mod analysis;
pub mod calendar;
pub mod clipboard;
pub mod config;
pub mod export;
pub mod storage;
pub mod timeline;
pub mod utils;
