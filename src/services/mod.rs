pub mod detail_service;
pub mod profile_links;
pub mod record_loader;
pub mod session_registry;
pub mod status_service;
