//! API layer - REST surface and native client

pub mod native;
pub mod rest;
