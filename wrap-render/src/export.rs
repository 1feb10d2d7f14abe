use serde::{Deserialize, Serialize};
use wrap_core::file_stem;

use crate::config::RenderConfig;
use crate::cutout::{cutout_mask, document_size_mm, exterior_only_svg, mask_svg, outline_path_data};
use crate::error::RenderError;
use crate::fonts::FontLibrary;
use crate::pdf::raster_pdf;
use crate::raster::rasterize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml;charset=utf-8",
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// A finished file, ready to be written or offered for download.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

pub fn design_file_name(project_name: &str, format: ExportFormat) -> String {
    format!("{}.{}", file_stem(project_name), format.extension())
}

pub fn cutout_file_name(project_name: &str, format: ExportFormat) -> String {
    format!("{}_cutout.{}", file_stem(project_name), format.extension())
}

pub fn exterior_file_name(project_name: &str) -> String {
    format!("{}-exterior.svg", file_stem(project_name))
}

/// Exports the print document as SVG, PNG or a fitted PDF page.
pub fn export_design(
    markup: &str,
    project_name: &str,
    format: ExportFormat,
    fonts: &FontLibrary,
    config: &RenderConfig,
) -> Result<ExportArtifact, RenderError> {
    let bytes = match format {
        ExportFormat::Svg => markup.as_bytes().to_vec(),
        ExportFormat::Png => {
            rasterize(markup, config.png_dpi, None, fonts, config.max_pixels)?.to_png()?
        }
        ExportFormat::Pdf => {
            let (w, h) = document_size_mm(markup)?;
            let raster = rasterize(markup, config.pdf_dpi, None, fonts, config.max_pixels)?;
            raster_pdf(&raster, w, h)
        }
    };
    let artifact = ExportArtifact {
        file_name: design_file_name(project_name, format),
        mime: format.mime(),
        bytes,
    };
    log::info!("exported {} ({} bytes)", artifact.file_name, artifact.bytes.len());
    Ok(artifact)
}

/// Exports the cutout. Exterior-only output is always a vector outline;
/// otherwise the thresholded mask goes out in `format`.
pub fn export_cutout(
    markup: &str,
    project_name: &str,
    format: ExportFormat,
    exterior_only: bool,
    fonts: &FontLibrary,
    config: &RenderConfig,
) -> Result<ExportArtifact, RenderError> {
    let artifact = if exterior_only {
        ExportArtifact {
            file_name: exterior_file_name(project_name),
            mime: ExportFormat::Svg.mime(),
            bytes: exterior_only_svg(markup)?.into_bytes(),
        }
    } else {
        let mask = cutout_mask(markup, config.cutout_dpi, fonts, config.max_pixels)?;
        let (w, h) = document_size_mm(markup)?;
        let bytes = match format {
            ExportFormat::Png => mask.to_png()?,
            ExportFormat::Pdf => raster_pdf(&mask, w, h),
            ExportFormat::Svg => {
                mask_svg(&mask.to_png()?, &outline_path_data(markup)?, w, h).into_bytes()
            }
        };
        ExportArtifact {
            file_name: cutout_file_name(project_name, format),
            mime: format.mime(),
            bytes,
        }
    };
    log::info!("exported {} ({} bytes)", artifact.file_name, artifact.bytes.len());
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_project_name() {
        assert_eq!(design_file_name("My Mug!", ExportFormat::Png), "MyMug.png");
        assert_eq!(cutout_file_name("", ExportFormat::Pdf), "mug-template_cutout.pdf");
        assert_eq!(exterior_file_name("gift_1"), "gift_1-exterior.svg");
    }

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("PNG".parse::<ExportFormat>(), Ok(ExportFormat::Png));
        assert!("tiff".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn svg_export_is_the_markup_itself() {
        let a = export_design(
            "<svg/>",
            "x",
            ExportFormat::Svg,
            &FontLibrary::new("Roboto"),
            &RenderConfig::default(),
        )
        .unwrap();
        assert_eq!(a.bytes, b"<svg/>");
        assert_eq!(a.mime, "image/svg+xml;charset=utf-8");
    }
}
