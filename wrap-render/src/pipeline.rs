use mug_core::{MugMeshGroup, Texture, build_mug};
use wrap_core::{
    MugDimensions, ProjectRecord, SheetLayout, TemplateDocument, generate, metadata_comment,
};

use crate::assets::probe_background;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::export::{ExportArtifact, ExportFormat, export_cutout, export_design};
use crate::fonts::FontLibrary;
use crate::measure::UsvgTextMeasurer;
use crate::texture::project_texture;

/// Headless end-to-end pipeline: project in, documents, files, textures and
/// meshes out.
#[derive(Clone, Debug)]
pub struct Renderer {
    config: RenderConfig,
    fonts: FontLibrary,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        let fonts = FontLibrary::from_config(&config);
        Self { config, fonts }
    }

    pub fn with_fonts(config: RenderConfig, fonts: FontLibrary) -> Self {
        Self { config, fonts }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }

    pub fn measurer(&self) -> UsvgTextMeasurer {
        UsvgTextMeasurer::new(self.fonts.clone())
    }

    /// Generates both documents for `project`. The background image size is
    /// probed first when the record lacks it.
    pub fn template(
        &self,
        project: &ProjectRecord,
        include_metadata: bool,
    ) -> Result<(SheetLayout, TemplateDocument), RenderError> {
        let mut design = project.design.clone();
        probe_background(&mut design);
        let comment = if include_metadata {
            Some(metadata_comment(project)?)
        } else {
            None
        };
        let measurer = self.measurer();
        Ok(generate(&design, &measurer, comment.as_deref())?)
    }

    pub fn export_design(
        &self,
        doc: &TemplateDocument,
        project_name: &str,
        format: ExportFormat,
    ) -> Result<ExportArtifact, RenderError> {
        export_design(&doc.download_markup, project_name, format, &self.fonts, &self.config)
            .inspect_err(|err| log::error!("design export failed: {err}"))
    }

    pub fn export_cutout(
        &self,
        doc: &TemplateDocument,
        project_name: &str,
        format: ExportFormat,
        exterior_only: bool,
    ) -> Result<ExportArtifact, RenderError> {
        export_cutout(
            &doc.download_markup,
            project_name,
            format,
            exterior_only,
            &self.fonts,
            &self.config,
        )
        .inspect_err(|err| log::error!("cutout export failed: {err}"))
    }

    /// Outer-wall texture at the configured size, or `size` when the host
    /// knows its preview size.
    pub fn texture(
        &self,
        doc: &TemplateDocument,
        generation: u64,
        size: Option<(u32, u32)>,
    ) -> Result<Texture, RenderError> {
        let (w, h) = size
            .filter(|&(w, h)| w > 0 && h > 0)
            .unwrap_or((self.config.texture_width, self.config.texture_height));
        project_texture(
            &doc.download_markup,
            w,
            h,
            generation,
            &self.fonts,
            self.config.max_pixels,
        )
    }

    pub fn mesh(&self, dims: &MugDimensions) -> Result<MugMeshGroup, RenderError> {
        Ok(build_mug(dims)?)
    }
}
