use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ScanArgs;
use crate::document::{DocumentClassifier, compose, group, passes_filter};
use crate::engine;
use crate::error::ScanError;
use crate::model::{ImageDimensions, ResultRecord, ScanCounts, ScanRunManifest, WordObservation};
use crate::util::{
    now_utc_string, sha256_file, utc_compact_string, write_json_pretty, write_json_stdout,
};

pub const RESULT_FILE_SUFFIX: &str = "_ocr_results.json";

mod input;
mod run;

pub use run::run;

use input::*;
