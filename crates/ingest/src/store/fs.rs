//! 파일시스템 오브젝트 저장소
//!
//! 버킷 디렉토리 하위에 키 경로 그대로 파일을 기록합니다.
//! 같은 디렉토리의 임시 파일에 먼저 쓴 뒤 `rename`으로 교체하므로
//! 읽는 쪽은 완성된 오브젝트만 관찰합니다.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use logvault_core::error::StorageError;

use super::{ObjectStore, validate_key};

/// 로컬 디렉토리를 버킷으로 사용하는 저장소
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// `root` 디렉토리를 버킷으로 사용합니다. 디렉토리는 첫 쓰기 때 생성됩니다.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 버킷 루트 경로
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 키에 대응하는 파일 경로
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ObjectStore for FsObjectStore {
    fn name(&self) -> &str {
        "fs"
    }

    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        let target = self.path_for(key);
        let parent = target.parent().unwrap_or(&self.root).to_path_buf();
        tokio::fs::create_dir_all(&parent).await?;

        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        if let Err(e) = write_synced(&tmp, &body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(path = %target.display(), bytes = body.len(), "object written");
        Ok(())
    }
}

async fn write_synced(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(body).await?;
    file.sync_all().await
}
