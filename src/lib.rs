#![forbid(unsafe_code)]

pub mod autoscroll;
pub mod catalog;
pub mod chapter;
pub mod chrome;
pub mod cli;
pub mod config;
pub mod export;
pub mod formats;
pub mod frame;
pub mod host;
pub mod logging;
pub mod manifest;
pub mod navigation;
pub mod progress;
pub mod reader;
pub mod render;
pub mod replay;
pub mod session;
