use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

#[derive(Parser, Debug)]
#[command(
    name = "idscan",
    version,
    about = "Identity-document OCR extraction and classification"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render, OCR and classify a single document.
    Scan(ScanArgs),
    /// Classify word data from a saved tesseract TSV file.
    Classify(ClassifyArgs),
    /// Summarize result records in an output directory.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Source PDF or image. Falls back to the first file in --uploads-dir.
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_UPLOADS_DIR)]
    pub uploads_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_UPLOADS_DIR)]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// Render resolution for PDF inputs. Image inputs are OCR'd at their native resolution.
    #[arg(long, default_value_t = 200)]
    pub dpi: u32,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    #[arg(long, env = "TESSERACT_PATH")]
    pub tesseract_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub no_manifest: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(long)]
    pub tsv: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = DEFAULT_UPLOADS_DIR)]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scan_defaults_match_upload_layout() {
        let cli = Cli::try_parse_from(["idscan", "scan"]).expect("parse scan");
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan subcommand");
        };
        assert_eq!(args.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(args.output_dir, PathBuf::from("uploads"));
        assert_eq!(args.dpi, 200);
        assert_eq!(args.ocr_lang, "eng");
        assert!(args.input.is_none());
        assert!(!args.json);
    }

    #[test]
    fn dpi_help_says_it_only_affects_pdf_inputs() {
        let command = Cli::command();
        let scan = command.find_subcommand("scan").expect("scan subcommand");
        let dpi = scan
            .get_arguments()
            .find(|arg| arg.get_id() == "dpi")
            .expect("dpi argument");

        let help = dpi.get_help().map(ToString::to_string).unwrap_or_default();
        assert!(help.contains("PDF inputs"), "{help}");
        assert!(help.contains("native resolution"), "{help}");
    }
}
