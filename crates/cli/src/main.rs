use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;

use rollcall_core::annotation::infrastructure::font_resolver::resolve_font;
use rollcall_core::annotation::infrastructure::imageproc_label_painter::ImageprocLabelPainter;
use rollcall_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use rollcall_core::pipeline::frame_annotator::FrameAnnotator;
use rollcall_core::pipeline::frame_preview::{FramePreview, NullFramePreview};
use rollcall_core::pipeline::infrastructure::quit_listener::spawn_quit_listener;
use rollcall_core::pipeline::infrastructure::snapshot_preview::SnapshotPreview;
use rollcall_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use rollcall_core::pipeline::recognition_config::RecognitionConfig;
use rollcall_core::pipeline::recognize_faces_use_case::RecognizeFacesUseCase;
use rollcall_core::recognition::domain::identity_catalog::IdentityCatalog;
use rollcall_core::recognition::infrastructure::arcface_embedder::ArcFaceEmbedder;
use rollcall_core::recognition::infrastructure::gallery_face_matcher::GalleryFaceMatcher;
use rollcall_core::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use rollcall_core::shared::model_resolver;
use rollcall_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use rollcall_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use rollcall_core::video::infrastructure::image_file_reader::ImageFileReader;
use rollcall_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Label known people in a video using a folder of reference photos.
///
/// Reference images are named `<name>_<anything>.<ext>`; every face in the
/// video is boxed and labeled with the closest name, or "Unknown".
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source video.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Directory of labeled reference images.
    #[arg(long)]
    references: Option<PathBuf>,

    /// Directory for the annotated video (created if missing).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// File name of the annotated video inside the output directory.
    #[arg(long)]
    output_name: Option<String>,

    /// Keep <output-dir>/preview.jpg updated while processing; type `q`
    /// and Enter to stop early.
    #[arg(long)]
    preview: bool,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long)]
    confidence: Option<f64>,

    /// Maximum cosine distance for a face to match a reference.
    #[arg(long)]
    match_threshold: Option<f64>,

    /// TrueType font for labels (defaults to a system sans-serif font).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Directory holding bundled ONNX models, checked before downloading.
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = build_config(cli)?;

    log::info!("Loading known student names...");
    let catalog = IdentityCatalog::load(&config.reference_image_dir)?;
    if !catalog.is_empty() {
        log::info!("Known identities: {}", catalog.labels().join(", "));
    }

    let models_dir = config.models_dir.as_deref();
    let yolo_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        models_dir,
        Some(Box::new(|d: u64, t: u64| {
            download_progress("face detection", d, t)
        })),
    )?;
    let embedding_path = model_resolver::resolve(
        EMBEDDING_MODEL_NAME,
        EMBEDDING_MODEL_URL,
        models_dir,
        Some(Box::new(|d: u64, t: u64| {
            download_progress("face recognition", d, t)
        })),
    )?;

    let mut detector = OnnxYoloDetector::new(&yolo_path, config.confidence)?;
    let matcher = GalleryFaceMatcher::from_references(
        &catalog,
        &ImageFileReader::new(),
        &mut detector,
        Box::new(ArcFaceEmbedder::new(&embedding_path)?),
        config.match_threshold,
    );

    let painter = ImageprocLabelPainter::new(resolve_font(config.font_path.as_deref())?);
    let annotator = FrameAnnotator::new(Box::new(detector), Box::new(matcher), Box::new(painter));

    let cancelled = Arc::new(AtomicBool::new(false));
    let preview: Box<dyn FramePreview> = if config.preview_enabled {
        let snapshot = SnapshotPreview::new(
            Box::new(ImageFileWriter::new()),
            &config.output_dir,
            config.preview_interval,
        );
        log::info!(
            "Preview: {} (type q and press Enter to stop)",
            snapshot.path().display()
        );
        spawn_quit_listener(cancelled.clone())?;
        Box::new(snapshot)
    } else {
        Box::new(NullFramePreview)
    };

    let output_path = config.output_path();
    let mut use_case = RecognizeFacesUseCase::new(
        Box::new(FfmpegReader::new()),
        Box::new(FfmpegWriter::new()),
        annotator,
        preview,
        Box::new(StdoutPipelineLogger::default()),
        Some(cancelled),
    );

    log::info!("Processing video...");
    let summary = use_case.execute(&config.source_video_path, &output_path)?;

    if summary.interrupted {
        log::info!("Stopped early after {} frames", summary.frames_written);
    }
    println!(
        "Video processing complete. Output saved to {}",
        output_path.display()
    );
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn build_config(cli: Cli) -> Result<RecognitionConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => RecognitionConfig::load(path)?,
        None => RecognitionConfig::default(),
    };
    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut RecognitionConfig, cli: Cli) {
    if let Some(source) = cli.source {
        config.set_source(source);
    }
    if let Some(references) = cli.references {
        config.reference_image_dir = references;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(name) = cli.output_name {
        config.output_file_name = Some(name);
    }
    if cli.preview {
        config.preview_enabled = true;
    }
    if let Some(confidence) = cli.confidence {
        config.confidence = confidence;
    }
    if let Some(threshold) = cli.match_threshold {
        config.match_threshold = threshold;
    }
    if let Some(font) = cli.font {
        config.font_path = Some(font);
    }
    if let Some(models_dir) = cli.models_dir {
        config.models_dir = Some(models_dir);
    }
}

fn download_progress(what: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {what} model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading {what} model... {downloaded} bytes");
    }
}
