//! Database repositories for data access layer
//!
//! Each repository owns one table family and implements the matching collaborator
//! trait from `facemark-core`, so services never see `sqlx` types.

pub mod attendance;
pub mod profile;

pub use attendance::AttendanceRepository;
pub use profile::ProfileRepository;
