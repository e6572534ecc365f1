//! SeaORM entities.

pub mod device;
pub mod experiment;
pub mod reactor;
pub mod reading;
pub mod user;
