use crate::error::Result;
use crate::library::PermissionProvider;
use crate::model::PermissionStatus;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Grants access when the library root can be listed.
///
/// A root the process may not read is `Denied`; a missing root is
/// `Restricted`, since nothing the user does in the picker can fix it.
pub struct FsPermission {
    root: PathBuf,
}

impl FsPermission {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PermissionProvider for FsPermission {
    async fn request_access(&self) -> Result<PermissionStatus> {
        let root = self.root.clone();
        let readable =
            async_std::task::spawn_blocking(move || std::fs::read_dir(&root).map(|_| ())).await;

        match readable {
            Ok(()) => Ok(PermissionStatus::Authorized),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Ok(PermissionStatus::Denied),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PermissionStatus::Restricted),
            Err(e) => Err(e.into()),
        }
    }
}
