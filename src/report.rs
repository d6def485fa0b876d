//! PDF report rendering: one question block per answered question, followed
//! by the summary assessment and fixed disclaimers.

use chrono::Utc;
use image::DynamicImage;
use log::{info, warn};
use printpdf::{
    BuiltinFont, Image as PdfImage, ImageTransform, Mm, PdfDocument, PdfLayerReference,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::session::AnswerRecord;

// US letter, working in points like the layout was designed in.
const PAGE_WIDTH_PT: f64 = 612.0;
const PAGE_HEIGHT_PT: f64 = 792.0;
const MARGIN_LEFT_PT: f64 = 30.0;
const TOP_START_PT: f64 = PAGE_HEIGHT_PT - 50.0;
/// A new page begins when the cursor drops below this.
const PAGE_BREAK_AT_PT: f64 = 100.0;
const THUMBNAIL_SIDE_PT: f64 = 80.0;
const THUMBNAIL_X_PT: f64 = 400.0;

const DISCLAIMERS: [&str; 2] = [
    "This automated report combines text sentiment and facial emotion analysis.",
    "Please consult a qualified mental health professional for interpretation.",
];

fn pt(value: f64) -> Mm {
    Mm((value * 25.4 / 72.0) as f32)
}

/// Outcome of trying to pull a capture into the report. Skips are logged and
/// never abort report generation.
#[derive(Debug)]
pub enum ThumbnailOutcome {
    Embedded(DynamicImage),
    SkippedMissing,
    SkippedUnreadable,
}

pub fn load_thumbnail(path: &Path) -> ThumbnailOutcome {
    if !path.exists() {
        return ThumbnailOutcome::SkippedMissing;
    }
    let decoded = image::io::Reader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| e.to_string())
        .and_then(|reader| reader.decode().map_err(|e| e.to_string()));
    match decoded {
        Ok(image) => ThumbnailOutcome::Embedded(image),
        Err(_) => ThumbnailOutcome::SkippedUnreadable,
    }
}

/// Renders the full report and overwrites `output`.
pub fn generate(records: &[AnswerRecord], summary: &str, output: &Path) -> Result<()> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Mental Health Assessment Report",
        pt(PAGE_WIDTH_PT),
        pt(PAGE_HEIGHT_PT),
        "Layer 1",
    );
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(report_err)?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(report_err)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = TOP_START_PT;

    layer.use_text(
        "Mental Health Assessment Report",
        16.0,
        pt(MARGIN_LEFT_PT),
        pt(y),
        &bold,
    );
    y -= 20.0;
    layer.use_text(
        format!("Generated {}", Utc::now().format("%Y-%m-%d %H:%M UTC")),
        9.0,
        pt(MARGIN_LEFT_PT),
        pt(y),
        &regular,
    );
    y -= 20.0;

    for (n, record) in records.iter().enumerate() {
        layer.use_text(
            format!("Q{}: {}", n + 1, record.question),
            12.0,
            pt(MARGIN_LEFT_PT),
            pt(y),
            &bold,
        );
        y -= 15.0;
        layer.use_text(
            format!("Answer: {}", record.answer),
            11.0,
            pt(MARGIN_LEFT_PT),
            pt(y),
            &regular,
        );
        y -= 15.0;
        layer.use_text(
            format!("Text Sentiment: {}", record.sentiment),
            11.0,
            pt(MARGIN_LEFT_PT),
            pt(y),
            &regular,
        );
        y -= 15.0;
        layer.use_text(
            format!("Facial Emotion: {}", record.emotion),
            11.0,
            pt(MARGIN_LEFT_PT),
            pt(y),
            &regular,
        );
        y -= 15.0;

        match load_thumbnail(&record.image_path) {
            ThumbnailOutcome::Embedded(image) => {
                embed_thumbnail(&layer, image, THUMBNAIL_X_PT, y - 40.0);
            }
            ThumbnailOutcome::SkippedMissing => warn!(
                "Capture for question {} missing at {}; thumbnail skipped",
                n + 1,
                record.image_path.display()
            ),
            ThumbnailOutcome::SkippedUnreadable => warn!(
                "Capture for question {} at {} is unreadable; thumbnail skipped",
                n + 1,
                record.image_path.display()
            ),
        }

        y -= 100.0;
        if y < PAGE_BREAK_AT_PT {
            let (page, new_layer) = doc.add_page(pt(PAGE_WIDTH_PT), pt(PAGE_HEIGHT_PT), "Layer 1");
            layer = doc.get_page(page).get_layer(new_layer);
            y = TOP_START_PT;
        }
    }

    layer.use_text("Summary Assessment:", 14.0, pt(MARGIN_LEFT_PT), pt(y), &bold);
    y -= 20.0;
    layer.use_text(summary, 11.0, pt(MARGIN_LEFT_PT), pt(y), &regular);
    y -= 15.0;
    for line in DISCLAIMERS {
        layer.use_text(line, 11.0, pt(MARGIN_LEFT_PT), pt(y), &regular);
        y -= 15.0;
    }

    let file = File::create(output)?;
    doc.save(&mut BufWriter::new(file)).map_err(report_err)?;
    info!("Report written to {}", output.display());
    Ok(())
}

fn embed_thumbnail(layer: &PdfLayerReference, image: DynamicImage, x_pt: f64, y_pt: f64) {
    const DPI: f64 = 300.0;
    let native_width_pt = image.width() as f64 * 72.0 / DPI;
    let native_height_pt = image.height() as f64 * 72.0 / DPI;
    // Normalize to RGB8; PDF embedding of exotic pixel formats is lossy.
    let image = DynamicImage::ImageRgb8(image.to_rgb8());
    let pdf_image = PdfImage::from_dynamic_image(&image);
    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(pt(x_pt)),
            translate_y: Some(pt(y_pt)),
            scale_x: Some((THUMBNAIL_SIDE_PT / native_width_pt) as f32),
            scale_y: Some((THUMBNAIL_SIDE_PT / native_height_pt) as f32),
            dpi: Some(DPI as f32),
            ..Default::default()
        },
    );
}

fn report_err(err: impl std::fmt::Display) -> AppError {
    AppError::Report(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{EmotionLabel, SentimentLabel};
    use crate::questions;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mindscreen-report-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn record(n: usize, image_path: PathBuf) -> AnswerRecord {
        AnswerRecord {
            question: questions::get(n % questions::total()).unwrap().to_string(),
            answer: "Mostly fine.".to_string(),
            sentiment: SentimentLabel::Neutral,
            emotion: EmotionLabel::Neutral,
            image_path,
        }
    }

    #[test]
    fn missing_capture_is_a_skip() {
        let outcome = load_thumbnail(Path::new("/definitely/not/here.jpg"));
        assert!(matches!(outcome, ThumbnailOutcome::SkippedMissing));
    }

    #[test]
    fn garbage_capture_is_a_skip() {
        let dir = scratch_dir();
        let path = dir.join("q1.jpg");
        fs::write(&path, b"this is not an image").unwrap();
        assert!(matches!(
            load_thumbnail(&path),
            ThumbnailOutcome::SkippedUnreadable
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn valid_capture_is_embedded() {
        let dir = scratch_dir();
        let path = dir.join("q1.jpg");
        // PNG bytes behind a .jpg name still decode; format is sniffed.
        let frame = image::GrayImage::from_pixel(32, 32, image::Luma([90u8]));
        image::DynamicImage::ImageLuma8(frame)
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        assert!(matches!(
            load_thumbnail(&path),
            ThumbnailOutcome::Embedded(_)
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn full_run_report_is_written() {
        let dir = scratch_dir();
        let output = dir.join("report.pdf");
        // Ten question blocks forces pagination past the break threshold.
        let records: Vec<AnswerRecord> = (0..questions::total())
            .map(|n| record(n, dir.join(format!("q{}.jpg", n + 1))))
            .collect();
        generate(
            &records,
            "No apparent mental health concerns detected.",
            &output,
        )
        .unwrap();
        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
