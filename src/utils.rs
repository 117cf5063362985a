use crate::error::ContextError;
use log::info;
use std::io;
use std::path::Path;

/// Makes sure `path` exists and is a directory, creating it (and its parents) if needed.
pub async fn ensure_dir_exists(path: &Path) -> Result<(), ContextError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(ContextError::DirCreation(
                    path.to_path_buf(),
                    io::Error::new(io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| ContextError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(ContextError::DirCreation(path.to_path_buf(), e)),
    }
}
