//! Storage layer - in-memory tables and repositories

pub mod cache;
pub mod mapper;
pub mod repositories;
pub mod table;

pub use repositories::{MemoryMemberRepository, MemoryStore, MemoryTeamRepository};
pub use table::{Record, Table};
