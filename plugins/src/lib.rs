pub mod factory;
pub mod image;
pub mod repository;
