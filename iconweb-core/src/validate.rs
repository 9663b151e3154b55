//! Precondition checks run before any generation work starts.

use std::path::Path;

use log::debug;
use tokio::fs;

use crate::error::{Error, Result};
use crate::options::Options;

/// Check structural and filesystem preconditions, failing on the first violation.
///
/// Only queries the filesystem; nothing is created or modified.
pub async fn validate_options(options: &Options) -> Result<()> {
    if options.paths.is_empty() {
        return Err(Error::validation("No paths specified"));
    }

    let Some(output_dir) = options.output_dir.as_deref() else {
        return Err(Error::validation(
            "Please specify an output directory with -o or --output",
        ));
    };

    match fs::metadata(output_dir).await {
        Err(_) => return Err(Error::validation("Output directory doesn't exist")),
        Ok(meta) if !meta.is_dir() => {
            return Err(Error::validation("Output path must be a directory"))
        }
        Ok(_) => {}
    }

    if let Some(template) = options.css_template.as_deref() {
        if !exists(template).await {
            return Err(Error::validation("CSS template not found"));
        }
    }

    if let Some(template) = options.html_template.as_deref() {
        if !exists(template).await {
            return Err(Error::validation("HTML template not found"));
        }
    }

    if let Some(codepoints) = options.codepoints.as_deref() {
        validate_codepoints_file(codepoints).await?;
    }

    debug!("options validated for {} input paths", options.paths.len());
    Ok(())
}

async fn validate_codepoints_file(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).await.map_err(|_| {
        Error::validation(format!("Cannot find json file @ {}!", path.display()))
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if !meta.is_file() || !is_json {
        return Err(Error::validation(format!(
            "Codepoints file must be JSON {} is not a valid file.",
            path.display()
        )));
    }
    Ok(())
}

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerationOptions;
    use std::fs as stdfs;
    use tempfile::tempdir;

    fn message(result: Result<()>) -> String {
        let err = result.expect_err("validation should fail");
        assert!(err.is_validation());
        err.to_string()
    }

    #[tokio::test]
    async fn empty_paths_fail_first() {
        let opts = GenerationOptions::new().resolve();
        assert_eq!(message(validate_options(&opts).await), "No paths specified");
    }

    #[tokio::test]
    async fn output_dir_is_required() {
        let opts = GenerationOptions::new().with_paths(["a.svg"]).resolve();
        assert_eq!(
            message(validate_options(&opts).await),
            "Please specify an output directory with -o or --output"
        );
    }

    #[tokio::test]
    async fn output_dir_must_exist_and_be_a_directory() {
        let tmp = tempdir().expect("tempdir");
        let missing = GenerationOptions::new()
            .with_paths(["a.svg"])
            .with_output_dir(tmp.path().join("missing"))
            .resolve();
        assert_eq!(
            message(validate_options(&missing).await),
            "Output directory doesn't exist"
        );

        let file = tmp.path().join("file.txt");
        stdfs::write(&file, b"x").expect("write");
        let not_dir = GenerationOptions::new()
            .with_paths(["a.svg"])
            .with_output_dir(&file)
            .resolve();
        assert_eq!(
            message(validate_options(&not_dir).await),
            "Output path must be a directory"
        );
    }

    #[tokio::test]
    async fn templates_must_exist() {
        let tmp = tempdir().expect("tempdir");
        let mut opts = GenerationOptions::new()
            .with_paths(["a.svg"])
            .with_output_dir(tmp.path())
            .resolve();

        opts.css_template = Some(tmp.path().join("nope.css.tera"));
        assert_eq!(message(validate_options(&opts).await), "CSS template not found");

        opts.css_template = None;
        opts.html_template = Some(tmp.path().join("nope.html.tera"));
        assert_eq!(message(validate_options(&opts).await), "HTML template not found");
    }

    #[tokio::test]
    async fn codepoints_file_checks() {
        let tmp = tempdir().expect("tempdir");
        let mut opts = GenerationOptions::new()
            .with_paths(["a.svg"])
            .with_output_dir(tmp.path())
            .resolve();

        let missing = tmp.path().join("map.json");
        opts.codepoints = Some(missing.clone());
        assert_eq!(
            message(validate_options(&opts).await),
            format!("Cannot find json file @ {}!", missing.display())
        );

        let text = tmp.path().join("map.txt");
        stdfs::write(&text, b"{}").expect("write");
        opts.codepoints = Some(text.clone());
        assert_eq!(
            message(validate_options(&opts).await),
            format!("Codepoints file must be JSON {} is not a valid file.", text.display())
        );

        let dir = tmp.path().join("dir.json");
        stdfs::create_dir(&dir).expect("mkdir");
        opts.codepoints = Some(dir.clone());
        assert!(message(validate_options(&opts).await).starts_with("Codepoints file must be JSON"));

        stdfs::write(&missing, b"{}").expect("write");
        opts.codepoints = Some(missing);
        validate_options(&opts).await.expect("valid options");
    }
}
