//! Service layer for the picker's asynchronous work.
//!
//! Separates library access and cross-store coordination from the plain
//! state machines in `state` for better testability.

pub mod album_repository;
pub mod change_subscription;
pub mod permission_coordinator;
pub mod selection_service;

pub use album_repository::AlbumRepository;
pub use change_subscription::ChangeSubscription;
pub use permission_coordinator::PermissionCoordinator;
pub use selection_service::SelectionService;
