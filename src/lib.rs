//! Contact Extract CLI
//!
//! GreenCloud にジョブを投入し、完了までポーリングして連絡先を表示する

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod poller;
pub mod render;
pub mod search;
