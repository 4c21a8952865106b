pub mod analytics_service;
pub mod catalog_service;
pub mod identity_service;
pub mod profile_service;
pub mod storage_service;
