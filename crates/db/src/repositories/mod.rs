//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod api_token_repo;
pub mod export_repo;
pub mod tag_repo;
pub mod translation_repo;
pub mod user_repo;

pub use api_token_repo::ApiTokenRepo;
pub use export_repo::ExportRepo;
pub use tag_repo::TagRepo;
pub use translation_repo::TranslationRepo;
pub use user_repo::UserRepo;
