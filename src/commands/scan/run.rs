use super::*;

pub(super) struct PageExtraction {
    pub(super) page_count: usize,
    pub(super) image_dimensions: ImageDimensions,
    pub(super) observations: Vec<WordObservation>,
}

pub fn run(args: ScanArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("scan-{}", utc_compact_string(started_ts));

    let source = resolve_input(args.input.as_deref(), &args.uploads_dir)?;
    let source_file = source.path.display().to_string();
    info!(source = %source_file, run_id = %run_id, "starting scan");

    let tesseract = engine::resolve_tesseract(args.tesseract_path.as_deref());
    let extraction = extract_first_page(&source, args.dpi, &args.ocr_lang, &tesseract)?;
    info!(
        page_count = extraction.page_count,
        width = extraction.image_dimensions.width,
        height = extraction.image_dimensions.height,
        observations = extraction.observations.len(),
        "ocr completed"
    );

    let classifier = DocumentClassifier::new()?;
    let (record, counts) = build_record(&classifier, &source_file, &extraction);

    let mut warnings = source.warnings.clone();
    if record.elements.is_empty() {
        let message = format!("no words survived the confidence filter for {source_file}");
        warn!(source = %source_file, "empty extraction");
        warnings.push(message);
    }

    let result_path = args
        .output_path
        .clone()
        .unwrap_or_else(|| result_path_for(&source.path, &args.output_dir));
    write_json_pretty(&result_path, &record)?;
    info!(
        path = %result_path.display(),
        document_type = record.verification.document_type.as_str(),
        verified = record.verification.verified,
        "wrote ocr results"
    );

    if !args.no_manifest {
        let manifest_path = args.output_dir.join("manifests").join(format!(
            "scan_run_{}.json",
            utc_compact_string(started_ts)
        ));
        let manifest = ScanRunManifest {
            manifest_version: 1,
            run_id,
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            command: render_scan_command(&args),
            tool_versions: engine::collect_tool_versions(&tesseract),
            source_file: source_file.clone(),
            source_sha256: String::new(),
            result_path: result_path.display().to_string(),
            document_type: record.verification.document_type,
            verified: record.verification.verified,
            counts,
            warnings,
        };
        // the result record is already on disk, so a manifest failure only warns
        match write_manifest(&manifest_path, manifest, &source.path) {
            Ok(()) => info!(path = %manifest_path.display(), "wrote scan run manifest"),
            Err(err) => warn!(
                path = %manifest_path.display(),
                error = %format!("{err:#}"),
                "failed to write scan run manifest"
            ),
        }
    }

    if args.json {
        write_json_stdout(&record)?;
    }

    Ok(())
}

fn write_manifest(path: &Path, mut manifest: ScanRunManifest, source: &Path) -> Result<()> {
    manifest.source_sha256 = sha256_file(source)?;
    write_json_pretty(path, &manifest)
}

fn extract_first_page(
    source: &ScanSource,
    dpi: u32,
    ocr_lang: &str,
    tesseract: &Path,
) -> Result<PageExtraction> {
    match source.kind {
        SourceKind::Pdf => {
            let page_count = engine::page_count(&source.path)?;
            let page = engine::render_first_page(&source.path, dpi)?;
            let image_dimensions = engine::image_dimensions(page.path())?;
            let observations = engine::ocr_words(page.path(), ocr_lang, tesseract)?;
            Ok(PageExtraction {
                page_count,
                image_dimensions,
                observations,
            })
        }
        SourceKind::Image => Ok(PageExtraction {
            page_count: 1,
            image_dimensions: engine::image_dimensions(&source.path)?,
            observations: engine::ocr_words(&source.path, ocr_lang, tesseract)?,
        }),
    }
}

/// Groups, classifies and composes the record for one extracted page.
pub(super) fn build_record(
    classifier: &DocumentClassifier,
    source_file: &str,
    extraction: &PageExtraction,
) -> (ResultRecord, ScanCounts) {
    let index = group(&extraction.observations);
    let verdict = classifier.classify(&index);

    let counts = ScanCounts {
        observations_total: extraction.observations.len(),
        observations_kept: extraction
            .observations
            .iter()
            .filter(|observation| passes_filter(observation))
            .count(),
        lines_total: index.lines().count(),
        words_total: index.word_count(),
    };

    let record = compose(
        source_file,
        extraction.page_count,
        extraction.image_dimensions,
        index,
        verdict,
    );
    (record, counts)
}

pub(super) fn render_scan_command(args: &ScanArgs) -> String {
    let mut command = vec!["idscan".to_string(), "scan".to_string()];

    if let Some(path) = &args.input {
        command.push("--input".to_string());
        command.push(path.display().to_string());
    } else {
        command.push("--uploads-dir".to_string());
        command.push(args.uploads_dir.display().to_string());
    }
    command.push("--output-dir".to_string());
    command.push(args.output_dir.display().to_string());
    if let Some(path) = &args.output_path {
        command.push("--output-path".to_string());
        command.push(path.display().to_string());
    }
    command.push("--dpi".to_string());
    command.push(args.dpi.to_string());
    command.push("--ocr-lang".to_string());
    command.push(args.ocr_lang.clone());
    if let Some(path) = &args.tesseract_path {
        command.push("--tesseract-path".to_string());
        command.push(path.display().to_string());
    }
    if args.json {
        command.push("--json".to_string());
    }

    command.join(" ")
}
