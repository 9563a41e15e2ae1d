//! Port traits (interfaces) for dependency injection

pub mod editor;
pub mod save;

pub use editor::EditBackend;
pub use save::SaveTarget;
