//! Facemark Database Library
//!
//! Postgres implementations of the profile store and the attendance record store.
//! Migrations live in the workspace `migrations/` directory.

pub mod db;

pub use db::{AttendanceRepository, ProfileRepository};
