#![forbid(unsafe_code)]

pub mod backup;
pub mod model;
pub mod progress;
