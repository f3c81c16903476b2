use std::fs;

use super::*;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SourceKind {
    Pdf,
    Image,
}

#[derive(Debug, Clone)]
pub(super) struct ScanSource {
    pub(super) path: PathBuf,
    pub(super) kind: SourceKind,
    pub(super) warnings: Vec<String>,
}

pub(super) fn resolve_input(input: Option<&Path>, uploads_dir: &Path) -> Result<ScanSource> {
    let mut warnings = Vec::new();

    let path = match input {
        Some(path) => {
            if !path.is_file() {
                return Err(ScanError::InputNotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            path.to_path_buf()
        }
        None => {
            let uploads = discover_uploads(uploads_dir)?;
            let Some(first) = uploads.first().cloned() else {
                return Err(ScanError::NoUploads {
                    dir: uploads_dir.to_path_buf(),
                }
                .into());
            };
            if uploads.len() > 1 {
                let message = format!(
                    "multiple files found in {}, using the first one: {}",
                    uploads_dir.display(),
                    first.display()
                );
                warn!(count = uploads.len(), path = %first.display(), "multiple uploads found");
                warnings.push(message);
            }
            first
        }
    };

    Ok(ScanSource {
        kind: source_kind(&path),
        path,
        warnings,
    })
}

pub(super) fn source_kind(path: &Path) -> SourceKind {
    let is_image = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false);

    if is_image {
        SourceKind::Image
    } else {
        SourceKind::Pdf
    }
}

pub(super) fn result_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("document");
    output_dir.join(format!("{stem}{RESULT_FILE_SUFFIX}"))
}

fn discover_uploads(uploads_dir: &Path) -> Result<Vec<PathBuf>> {
    if !uploads_dir.is_dir() {
        return Err(ScanError::InputNotFound {
            path: uploads_dir.to_path_buf(),
        }
        .into());
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(uploads_dir)
        .with_context(|| format!("failed to read {}", uploads_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", uploads_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_result = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(RESULT_FILE_SUFFIX))
            .unwrap_or(false);
        if !is_result {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
