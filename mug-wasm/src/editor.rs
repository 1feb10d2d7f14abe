use wasm_bindgen::prelude::*;
use wrap_core::{
    ArtworkSpec, BackgroundSpec, EditorSession, GeneratedTemplate, MugDimensions, ProjectRecord,
    Regenerated, parse_metadata_comment,
};
use wrap_render::{
    ExportArtifact, ExportFormat, FontLibrary, RenderConfig, RenderError, Renderer,
    UsvgTextMeasurer, probe_background, remove_background,
};

use crate::download::save_artifact;
use crate::ports::{DomPorts, DomTargets};
use crate::utils::{js_error, parse_side};

/// The 2D template editor bound to the page.
#[wasm_bindgen]
pub struct Editor {
    session: EditorSession<UsvgTextMeasurer>,
    renderer: Renderer,
    ports: DomPorts,
}

#[wasm_bindgen]
impl Editor {
    /// `targets` optionally overrides the element ids as JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(targets: Option<String>) -> Result<Editor, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let targets = match targets {
            Some(json) => serde_json::from_str::<DomTargets>(&json).map_err(js_error)?,
            None => DomTargets::default(),
        };
        // Browsers expose no font files; faces arrive through `load_font`.
        let config = RenderConfig {
            system_fonts: false,
            ..RenderConfig::default()
        };
        let fonts = FontLibrary::new(config.default_font_family.clone());
        let renderer = Renderer::with_fonts(config, fonts);
        let session = EditorSession::new(ProjectRecord::default(), renderer.measurer());
        Ok(Editor {
            session,
            renderer,
            ports: DomPorts::new(document, targets),
        })
    }

    /// Adds a font face from raw TTF/OTF bytes. Returns the face count.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> usize {
        let count = self.renderer.fonts_mut().load_font_data(bytes);
        *self.session.measurer_mut() = self.renderer.measurer();
        log::info!("{count} font faces loaded");
        count
    }

    pub fn font_families(&self) -> Vec<String> {
        self.renderer.fonts().families()
    }

    pub fn set_dimensions(&mut self, height_mm: f64, diameter_mm: f64, handle_area_width_mm: f64) {
        self.session.set_dimensions(MugDimensions {
            height_mm,
            diameter_mm,
            handle_area_width_mm,
        });
    }

    /// Background as JSON, e.g. `{"type":"color","color":"#BFDBFE"}`. Image
    /// backgrounds get their natural size probed here.
    pub fn set_background(&mut self, json: &str) -> Result<(), JsValue> {
        let spec: BackgroundSpec = serde_json::from_str(json).map_err(js_error)?;
        self.session.set_background(spec);
        probe_background(&mut self.session.project_mut().design);
        Ok(())
    }

    pub fn set_artwork(&mut self, side: &str, json: &str) -> Result<(), JsValue> {
        let side = parse_side(side)?;
        let spec: ArtworkSpec = serde_json::from_str(json).map_err(js_error)?;
        self.session.set_artwork(side, spec);
        Ok(())
    }

    /// One of `flipH`, `flipV`, `rotateLeft`, `rotateRight`.
    pub fn transform_artwork(&mut self, side: &str, op: &str) -> Result<(), JsValue> {
        let art = self.session.artwork_mut(parse_side(side)?);
        match op {
            "flipH" => art.flip_horizontal(),
            "flipV" => art.flip_vertical(),
            "rotateLeft" => art.rotate_left(),
            "rotateRight" => art.rotate_right(),
            other => return Err(js_error(format!("unknown transform: {other}"))),
        }
        Ok(())
    }

    /// Knocks out the background colour of an image placed on `side`.
    pub fn remove_artwork_background(&mut self, side: &str) -> Result<(), JsValue> {
        if let ArtworkSpec::Image(img) = self.session.artwork_mut(parse_side(side)?) {
            img.data_uri = remove_background(&img.data_uri).map_err(js_error)?;
        }
        Ok(())
    }

    pub fn project_name(&self) -> String {
        self.session.project().project_name.clone()
    }

    pub fn set_project_name(&mut self, name: String) {
        self.session.project_mut().project_name = name;
    }

    pub fn set_include_metadata(&mut self, include: bool) {
        self.session.set_include_metadata(include);
    }

    /// Rebuilds the template and updates the page. Returns whether a
    /// template is now shown.
    pub fn regenerate(&mut self) -> Result<bool, JsValue> {
        let out = self.session.regenerate(&mut self.ports).map_err(js_error)?;
        Ok(matches!(out, Regenerated::Template { .. }))
    }

    pub fn undo(&mut self) -> Result<bool, JsValue> {
        let out = self.session.undo(&mut self.ports).map_err(js_error)?;
        Ok(out.is_some())
    }

    pub fn redo(&mut self) -> Result<bool, JsValue> {
        let out = self.session.redo(&mut self.ports).map_err(js_error)?;
        Ok(out.is_some())
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    pub fn generation(&self) -> f64 {
        self.session.generation() as f64
    }

    pub fn preview_markup(&self) -> Option<String> {
        self.session
            .template()
            .map(|t| t.document.preview_markup.clone())
    }

    pub fn project_json(&self) -> Result<String, JsValue> {
        self.session.project().to_json().map_err(js_error)
    }

    /// Loads a saved project from JSON or from an SVG carrying the embedded
    /// project comment, then regenerates.
    pub fn load_project(&mut self, text: &str) -> Result<bool, JsValue> {
        let record = if text.trim_start().starts_with('{') {
            ProjectRecord::from_json(text)
        } else {
            parse_metadata_comment(text)
        }
        .map_err(js_error)?;
        log::info!("project '{}' loaded", record.project_name);
        self.session.load_project(record);
        self.regenerate()
    }

    /// Export bytes of the print document: `svg`, `png` or `pdf`.
    pub fn export_design(&self, format: &str) -> Result<Vec<u8>, JsValue> {
        Ok(self.design_artifact(format)?.bytes)
    }

    pub fn export_cutout(&self, format: &str, exterior_only: bool) -> Result<Vec<u8>, JsValue> {
        Ok(self.cutout_artifact(format, exterior_only)?.bytes)
    }

    pub fn download_design(&self, format: &str) -> Result<(), JsValue> {
        save_artifact(self.ports.document(), &self.design_artifact(format)?)
    }

    pub fn download_cutout(&self, format: &str, exterior_only: bool) -> Result<(), JsValue> {
        save_artifact(
            self.ports.document(),
            &self.cutout_artifact(format, exterior_only)?,
        )
    }

    /// Data URI with the image's background colour made transparent.
    pub fn remove_background(&self, data_uri: &str) -> Result<String, JsValue> {
        remove_background(data_uri).map_err(js_error)
    }
}

impl Editor {
    pub(crate) fn template(&self) -> Result<&GeneratedTemplate, JsValue> {
        self.session
            .template()
            .ok_or_else(|| js_error(RenderError::NoTemplate))
    }

    pub(crate) fn dimensions(&self) -> MugDimensions {
        self.session.project().design.dimensions
    }

    pub(crate) fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    fn design_artifact(&self, format: &str) -> Result<ExportArtifact, JsValue> {
        let format: ExportFormat = format.parse().map_err(js_error)?;
        let template = self.template()?;
        self.renderer
            .export_design(&template.document, &self.session.project().project_name, format)
            .map_err(js_error)
    }

    fn cutout_artifact(&self, format: &str, exterior_only: bool) -> Result<ExportArtifact, JsValue> {
        let format: ExportFormat = format.parse().map_err(js_error)?;
        let template = self.template()?;
        self.renderer
            .export_cutout(
                &template.document,
                &self.session.project().project_name,
                format,
                exterior_only,
            )
            .map_err(js_error)
    }
}
