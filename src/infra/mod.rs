//! Backend access, snapshots and export.

pub mod api;
pub mod cache;
pub mod demo;
pub mod export;
pub mod http;
pub mod memory;
