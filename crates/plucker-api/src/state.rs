//! Application state shared by every handler.

use plucker_core::Config;
use plucker_processing::MetadataService;
use plucker_storage::{
    CollectionsService, FileOperationsService, MediaListingService, StorageResult,
    VirtualPathResolver,
};

pub struct AppState {
    pub config: Config,
    pub listing: MediaListingService,
    pub files: FileOperationsService,
    pub collections: CollectionsService,
    pub metadata: MetadataService,
}

impl AppState {
    /// Build every service over one resolver for the configured roots.
    pub fn new(config: Config) -> StorageResult<Self> {
        let resolver = VirtualPathResolver::new(config.roots().clone());
        Ok(Self {
            listing: MediaListingService::new(resolver.clone()),
            files: FileOperationsService::new(resolver.clone())?,
            collections: CollectionsService::new(&resolver)?,
            metadata: MetadataService::new(resolver),
            config,
        })
    }
}
