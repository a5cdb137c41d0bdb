//! Catpoint core: the alarm arbitration engine, its data model and the
//! contracts its collaborators implement.

pub mod api;
pub mod config;
pub mod error;
pub mod image;
pub mod listener;
pub mod model;
pub mod repository;
pub mod service;
