//! SeaORM entities for the catalog tables

pub mod fee;
pub mod organization;
pub mod service;
pub mod technician;
