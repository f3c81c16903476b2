use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result};
use chrono::Utc;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::ScanError;
use crate::model::{ImageDimensions, ToolVersions, WordObservation};
use crate::tsv::parse_tesseract_tsv;

const POPPLER_HINT: &str = "install poppler-utils";
const TESSERACT_HINT: &str = "install tesseract-ocr or set TESSERACT_PATH";
const TESSERACT_PROGRAM: &str = "tesseract";
const TESSERACT_FALLBACKS: [&str; 2] = ["/usr/bin/tesseract", "/usr/local/bin/tesseract"];

/// A page image rendered into the temp directory, removed on drop.
#[derive(Debug)]
pub struct RenderedPage {
    path: PathBuf,
}

impl RenderedPage {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RenderedPage {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %err, "failed to remove rendered page");
        }
    }
}

pub fn page_count(pdf_path: &Path) -> Result<usize> {
    let output = execute(Command::new("pdfinfo").arg(pdf_path), "pdfinfo", POPPLER_HINT)?;
    if !output.status.success() {
        return Err(ScanError::decode(pdf_path, stderr_message(&output)).into());
    }

    let report = String::from_utf8_lossy(&output.stdout);
    let count = parse_page_count(&report)?
        .with_context(|| format!("pdfinfo reported no page count for {}", pdf_path.display()))?;
    if count == 0 {
        return Err(ScanError::decode(pdf_path, "document has no pages").into());
    }

    Ok(count)
}

pub fn parse_page_count(report: &str) -> Result<Option<usize>> {
    let pattern =
        Regex::new(r"(?m)^Pages:\s+(\d+)\s*$").context("failed to compile page count regex")?;

    let Some(captures) = pattern.captures(report) else {
        return Ok(None);
    };
    let count = captures[1]
        .parse::<usize>()
        .with_context(|| format!("invalid page count: {}", &captures[1]))?;

    Ok(Some(count))
}

/// Rasterizes page 1 of `pdf_path` to a PNG at `dpi`.
pub fn render_first_page(pdf_path: &Path, dpi: u32) -> Result<RenderedPage> {
    let stem = pdf_path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("source");
    let safe_stem = stem
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() {
                character
            } else {
                '_'
            }
        })
        .collect::<String>();

    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let output_root = std::env::temp_dir().join(format!(
        "idscan_{}_{}_{}",
        safe_stem,
        std::process::id(),
        stamp
    ));
    let page = RenderedPage {
        path: PathBuf::from(format!("{}.png", output_root.display())),
    };

    let output = execute(
        Command::new("pdftoppm")
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg("1")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-singlefile")
            .arg("-png")
            .arg(pdf_path)
            .arg(&output_root),
        "pdftoppm",
        POPPLER_HINT,
    )?;

    if !output.status.success() {
        return Err(ScanError::decode(pdf_path, stderr_message(&output)).into());
    }
    if !page.path.exists() {
        return Err(ScanError::decode(pdf_path, "pdftoppm did not produce a page image").into());
    }

    debug!(path = %page.path.display(), dpi, "rendered first page");
    Ok(page)
}

pub fn image_dimensions(image_path: &Path) -> Result<ImageDimensions> {
    let (width, height) = image::image_dimensions(image_path)
        .map_err(|err| ScanError::decode(image_path, err.to_string()))?;
    Ok(ImageDimensions { width, height })
}

/// Runs tesseract in TSV mode and returns every row it reports.
pub fn ocr_words(image_path: &Path, ocr_lang: &str, tesseract: &Path) -> Result<Vec<WordObservation>> {
    let program = tesseract.display().to_string();
    let output = execute(
        Command::new(tesseract)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(ocr_lang)
            .arg("tsv"),
        &program,
        TESSERACT_HINT,
    )?;

    if !output.status.success() {
        return Err(ScanError::engine(program, image_path, stderr_message(&output)).into());
    }

    let raw = String::from_utf8_lossy(&output.stdout).replace('\u{0000}', "");
    parse_tesseract_tsv(&raw).map_err(|err| {
        anyhow::Error::from(ScanError::engine(
            program,
            image_path,
            format!("unreadable TSV output: {err:#}"),
        ))
    })
}

/// Picks the tesseract binary: the configured path, then `tesseract` on
/// PATH, then the usual install locations. Missing candidates are skipped.
/// When nothing exists the configured path (or bare `tesseract`) is returned
/// so the spawn reports it as unavailable.
pub fn resolve_tesseract(configured: Option<&Path>) -> PathBuf {
    let search_path = std::env::var_os("PATH");
    let fallbacks = TESSERACT_FALLBACKS.map(PathBuf::from);

    if let Some(path) = first_existing_tesseract(configured, search_path.as_deref(), &fallbacks) {
        debug!(path = %path.display(), "resolved tesseract");
        return path;
    }

    configured
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(TESSERACT_PROGRAM))
}

fn first_existing_tesseract(
    configured: Option<&Path>,
    search_path: Option<&OsStr>,
    fallbacks: &[PathBuf],
) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        warn!(path = %path.display(), "configured tesseract not found, trying defaults");
    }

    let on_search_path = search_path
        .into_iter()
        .flat_map(std::env::split_paths)
        .map(|dir| dir.join(TESSERACT_PROGRAM));

    on_search_path
        .chain(fallbacks.iter().cloned())
        .find(|candidate| candidate.is_file())
}

pub fn collect_tool_versions(tesseract: &Path) -> ToolVersions {
    ToolVersions {
        pdfinfo: command_version_optional(Path::new("pdfinfo"), &["-v"]),
        pdftoppm: command_version_optional(Path::new("pdftoppm"), &["-v"]),
        tesseract: command_version_optional(tesseract, &["--version"]),
    }
}

fn command_version_optional(program: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}

fn execute(command: &mut Command, program: &str, hint: &'static str) -> Result<Output> {
    match command.output() {
        Ok(output) => Ok(output),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(ScanError::EngineUnavailable {
            program: program.to_string(),
            hint,
        }
        .into()),
        Err(err) => Err(err).with_context(|| format!("failed to execute {program}")),
    }
}

fn stderr_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("exited with {}", output.status)
    } else {
        trimmed.to_string()
    }
}
