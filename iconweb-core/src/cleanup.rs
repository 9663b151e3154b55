//! Removal of font formats the caller did not ask for.

use std::path::PathBuf;

use log::debug;
use tokio::fs;
use tokio::task::JoinSet;

use crate::error::{Error, Result};
use crate::options::{FontType, Options};
use crate::paths::{resolved_path, Artifact};

/// Delete `<output_dir>/<font_name>.<ext>` for every format missing from `options.types`.
///
/// Files that are already absent are skipped. Returns the paths that were removed.
pub async fn delete_unrequested_formats(options: &Options) -> Result<Vec<PathBuf>> {
    let mut tasks = JoinSet::new();

    for font_type in FontType::ALL {
        if options.wants(font_type) {
            continue;
        }
        let path = resolved_path(options, Artifact::Font(font_type))?;
        tasks.spawn(async move {
            match fs::try_exists(&path).await {
                Ok(true) => fs::remove_file(&path)
                    .await
                    .map(|()| Some(path.clone()))
                    .map_err(|e| Error::io(&path, e)),
                Ok(false) => Ok(None),
                Err(e) => Err(Error::io(&path, e)),
            }
        });
    }

    let mut removed = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        if let Some(path) = joined?? {
            debug!("removed unrequested font {}", path.display());
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerationOptions;
    use std::fs as stdfs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn removes_only_unrequested_formats() {
        let tmp = tempdir().expect("tempdir");
        for ext in ["svg", "ttf", "woff", "woff2", "eot"] {
            stdfs::write(tmp.path().join(format!("icons.{ext}")), b"font").expect("write");
        }
        let opts = GenerationOptions::new()
            .with_output_dir(tmp.path())
            .with_types(vec![FontType::Svg, FontType::Ttf])
            .resolve();

        let removed = delete_unrequested_formats(&opts).await.expect("cleanup");

        assert_eq!(removed.len(), 3);
        assert!(tmp.path().join("icons.svg").exists());
        assert!(tmp.path().join("icons.ttf").exists());
        for ext in ["woff", "woff2", "eot"] {
            assert!(!tmp.path().join(format!("icons.{ext}")).exists(), "{ext}");
        }
    }

    #[tokio::test]
    async fn dead_deletion_tasks_are_task_errors() {
        let joined = tokio::spawn(async {
            panic!("deletion task died");
        })
        .await;
        let err = Error::from(joined.unwrap_err());

        assert!(matches!(err, Error::Task(_)));
        assert!(!err.is_validation());
        assert!(err.to_string().starts_with("background task failed"));
    }

    #[tokio::test]
    async fn missing_files_are_not_an_error() {
        let tmp = tempdir().expect("tempdir");
        let opts = GenerationOptions::new()
            .with_output_dir(tmp.path())
            .with_types(vec![FontType::Woff2])
            .resolve();

        let removed = delete_unrequested_formats(&opts).await.expect("cleanup");
        assert!(removed.is_empty());
    }
}
