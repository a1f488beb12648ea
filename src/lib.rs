//! Paperstock console library
//!
//! Typed client, forms and screen state for the paper-stock workflow of a
//! packaging plant: mill/shade/paper masters, reel purchases, stock-out and
//! inventory search against the plant's REST backend.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod client;
pub mod commands;
pub mod config;
pub mod console;
pub mod debounce;
pub mod errors;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod notifications;
pub mod screens;
pub mod services;

pub use client::ApiClient;
pub use config::ConsoleConfig;
pub use console::Console;
pub use errors::{ConsoleError, FieldErrors};
pub use notifications::{Notification, NotificationLevel};
