pub mod database;
pub mod file;
pub mod food;
pub mod memory;
pub mod repository;
