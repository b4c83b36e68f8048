//! Spread Board library.
//!
//! A bulletin board whose posts can carry a spreadsheet workbook. The crate
//! ships two binaries: `board-server`, the JSON API over SQLite, and
//! `board-web`, the server-rendered UI that talks to the API over HTTP.

#![allow(clippy::needless_raw_string_hashes)]

pub mod client;
pub mod components;
pub mod config;
pub mod db;
pub mod frontend;
pub mod logging;
pub mod shutdown;
pub mod spreadsheet;
pub mod web;
