//! Application services — use-cases built on top of the port traits.

pub mod rest_iot;
pub mod routine_service;
