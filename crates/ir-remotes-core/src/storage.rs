//! JSON file persistence for directories, remotes, and registries.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::error::StorageError;

/// Load a JSON document. An absent file yields `Ok(None)` so callers
/// can start empty; any other failure (including a parse error) is
/// reported. A state file that fails to parse must never be mistaken
/// for an empty one.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::Io(e)),
    };

    let value = serde_json::from_str(&content).map_err(|source| StorageError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Write a JSON document through a temporary file and rename, so a
/// crash mid-write never leaves a truncated state file behind.
pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let content =
        serde_json::to_string_pretty(value).map_err(|source| StorageError::Serialize {
            path: path.display().to_string(),
            source,
        })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).await.map_err(StorageError::Io)?;
    fs::rename(&tmp, path).await.map_err(StorageError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandRegistry, IrCommand};
    use crate::remote::RemoteList;

    #[tokio::test]
    async fn absent_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let loaded: Option<RemoteList> = load_json(&path).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remotes.json");

        let mut remotes = RemoteList::new();
        remotes
            .find_or_create("amp")
            .commands
            .insert("power", IrCommand::new(vec![0x26, 0x0a]))
            .unwrap();

        save_json(&path, &remotes).await.unwrap();
        let loaded: RemoteList = load_json(&path).await.unwrap().unwrap();
        assert_eq!(loaded, remotes);
    }

    #[tokio::test]
    async fn parse_failure_is_reported_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remotes.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result: Result<Option<RemoteList>, _> = load_json(&path).await;
        assert!(matches!(result, Err(StorageError::Parse { .. })));
    }

    #[tokio::test]
    async fn malformed_registry_entry_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        tokio::fs::write(&path, r#"{"power": "260a", "broken": "12320"}"#)
            .await
            .unwrap();

        let result: Result<Option<CommandRegistry>, _> = load_json(&path).await;
        assert!(matches!(result, Err(StorageError::Parse { .. })));
    }
}
