/// Database models for TaskTrack
///
/// # Models
///
/// - `company`: Companies, get-or-create by name, completed-task progress
/// - `user`: User accounts and joined views
/// - `task`: Ownership-scoped personal tasks
///
/// Related rows are always loaded through explicit queries that take the
/// foreign key and return an assembled view struct.

pub mod company;
pub mod task;
pub mod timestamp;
pub mod user;
