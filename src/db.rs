pub mod error;
pub mod models;
pub mod site_repository;
pub mod volume_repository;
pub mod volume_store;

pub use error::DbError;
pub use models::*;
pub use site_repository::SiteRepository;
pub use volume_repository::VolumeRepository;
pub use volume_store::{PgVolumeStore, VolumeStore};
