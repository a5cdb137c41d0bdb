//! catpoint-cli library, exposed so the command layer can be unit tested.

pub mod app;
pub mod commands;
pub mod listener;
pub mod utils;
