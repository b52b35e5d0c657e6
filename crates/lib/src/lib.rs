//! Danışma core library — chat session controller for the Turkish legal
//! assistant, shared by the CLI presentation layer.

pub mod backend;
pub mod config;
pub mod connectivity;
pub mod controller;
pub mod init;
pub mod reveal;
pub mod transcript;
