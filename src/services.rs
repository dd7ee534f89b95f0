pub mod volume_import_service;

pub use volume_import_service::{
    ImportStats, PersistStats, VolumeImportError, VolumeImportService,
};
