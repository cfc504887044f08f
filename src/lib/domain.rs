//! Domain layer

pub mod communication;
pub mod navigation;
