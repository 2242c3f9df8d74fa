//! Capture command - notes from photos, recordings and screenshots.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use console::Style;
use essspace_capture::{RGBA_PIXEL_STRIDE, RawFrame, ScreenshotPipeline, import_image};
use essspace_domain::CaptureSession;

use super::Context;
use super::notes::report_created;
use crate::app::App;

/// Arguments for the capture command.
#[derive(Args, Debug)]
pub struct CaptureArgs {
    #[command(subcommand)]
    pub command: CaptureCommand,
}

#[derive(Subcommand, Debug)]
pub enum CaptureCommand {
    /// Save a photo as a note, with its recognized text
    Photo {
        /// Image file (PNG or JPEG)
        image: PathBuf,

        /// Transcript of a voice memo recorded for the photo
        #[arg(long)]
        transcript: Option<String>,

        /// Recording that belongs to the photo
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Skip text recognition
        #[arg(long)]
        no_ocr: bool,
    },

    /// Save a voice recording as a note
    Audio {
        /// Recorded audio file
        file: PathBuf,

        /// Transcript of the recording
        #[arg(long)]
        transcript: Option<String>,
    },

    /// Save a raw RGBA frame dump as a screenshot note
    Screenshot {
        /// File holding the raw RGBA_8888 pixels
        raw: PathBuf,

        /// Frame width in pixels
        #[arg(long)]
        width: u32,

        /// Frame height in pixels
        #[arg(long)]
        height: u32,

        /// Bytes per row including padding (default: width * pixel stride)
        #[arg(long)]
        row_stride: Option<usize>,

        /// Bytes per pixel
        #[arg(long, default_value_t = RGBA_PIXEL_STRIDE)]
        pixel_stride: usize,

        /// Transcript of a voice memo recorded for the screenshot
        #[arg(long)]
        transcript: Option<String>,

        /// Directory for the PNG (default from config)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// Run the capture command.
pub async fn run(args: CaptureArgs, ctx: &Context) -> Result<()> {
    let app = App::open(ctx)?;
    let mut session = CaptureSession::new();

    let note = match args.command {
        CaptureCommand::Photo {
            image,
            transcript,
            audio,
            no_ocr,
        } => {
            let image = existing_file(&image)?;
            let ocr_text = if no_ocr {
                None
            } else {
                let max_size = app.config.capture().max_ocr_image_size;
                import_image(&image, &app.recognizer(), max_size)
                    .await?
                    .ocr_text
            };
            report_ocr(ctx, ocr_text.as_deref());

            session.prepare_for_new_capture();
            session.set_captured_data(Some(path_string(&image)), ocr_text, None);
            if let Some(audio) = audio {
                session.set_audio_path(Some(path_string(&existing_file(&audio)?)));
            }
            session.build_capture_note(transcript.as_deref())
        }
        CaptureCommand::Audio { file, transcript } => {
            let file = existing_file(&file)?;
            session.prepare_for_new_capture();
            session.set_audio_path(Some(path_string(&file)));
            session.build_capture_note(transcript.as_deref())
        }
        CaptureCommand::Screenshot {
            raw,
            width,
            height,
            row_stride,
            pixel_stride,
            transcript,
            out_dir,
        } => {
            let data = tokio::fs::read(&raw)
                .await
                .with_context(|| format!("failed to read {}", raw.display()))?;
            let row_stride = match row_stride {
                Some(stride) => stride,
                None => (width as usize)
                    .checked_mul(pixel_stride)
                    .with_context(|| {
                        format!("pixel stride {pixel_stride} is too large for width {width}")
                    })?,
            };
            let frame = RawFrame {
                width,
                height,
                pixel_stride,
                row_stride,
                data,
            };

            let capture = app.config.capture();
            let out_dir = out_dir.unwrap_or_else(|| capture.effective_screenshot_dir());
            let mut pipeline = ScreenshotPipeline::new(out_dir);
            if capture.ocr_screenshots {
                pipeline = pipeline.with_recognizer(Arc::new(app.recognizer()));
            }

            let mut events = pipeline.subscribe();
            let processed = pipeline.process_frame(frame).await?;
            while let Ok(event) = events.try_recv() {
                session.apply(&event);
            }
            report_ocr(ctx, processed.ocr_text.as_deref());

            if transcript.is_some() {
                session.prepare_for_audio_with_screenshot();
                session.build_capture_note(transcript.as_deref())
            } else {
                let note = session
                    .screenshot_note_as_is()
                    .context("screenshot was not processed")?;
                session.clear_screenshot_prompt();
                note
            }
        }
    };

    let id = app.notes().insert_note(note).await?;
    report_created(ctx, &app, id).await
}

fn existing_file(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        bail!("File not found: {}", path.display());
    }
    std::fs::canonicalize(path).with_context(|| format!("failed to resolve {}", path.display()))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn report_ocr(ctx: &Context, ocr_text: Option<&str>) {
    if ctx.json_output || !ctx.verbose {
        return;
    }
    let dim = Style::new().dim();
    match ocr_text {
        Some(text) => println!(
            "{}",
            dim.apply_to(format!(
                "Recognized {} words",
                essspace_text::word_count(text)
            ))
        ),
        None => println!("{}", dim.apply_to("No text recognized")),
    }
}
