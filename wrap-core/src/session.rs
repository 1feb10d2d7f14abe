use crate::artwork::{ArtworkSpec, TextMeasurer};
use crate::background::BackgroundSpec;
use crate::error::TemplateError;
use crate::history::History;
use crate::layout::{MugDimensions, SheetLayout, Side};
use crate::project::{ProjectRecord, metadata_comment};
use crate::svg::fixed2;
use crate::template::{TemplateDocument, generate};

pub const INVALID_DIMENSIONS_MESSAGE: &str =
    "Please enter valid, positive numbers for all dimensions.";

/// Host-side display surfaces the session writes to.
pub trait ViewPorts {
    fn show_template(&mut self, preview_markup: &str, info: &str);
    fn clear_template(&mut self);
    fn show_message(&mut self, message: &str);
    fn set_exports_enabled(&mut self, enabled: bool);
    fn set_history_state(&mut self, _can_undo: bool, _can_redo: bool) {}
}

/// Ports that discard everything, for headless use.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPorts;

impl ViewPorts for NullPorts {
    fn show_template(&mut self, _preview_markup: &str, _info: &str) {}
    fn clear_template(&mut self) {}
    fn show_message(&mut self, _message: &str) {}
    fn set_exports_enabled(&mut self, _enabled: bool) {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedTemplate {
    /// Regeneration number that produced this template.
    pub generation: u64,
    pub layout: SheetLayout,
    pub document: TemplateDocument,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regenerated {
    Template { generation: u64 },
    InvalidDimensions,
}

/// Editor state: the project being edited, its history and the latest
/// template. Nothing here reaches into a live document; output goes through
/// [`ViewPorts`].
pub struct EditorSession<M> {
    project: ProjectRecord,
    committed: Option<ProjectRecord>,
    history: History<ProjectRecord>,
    template: Option<GeneratedTemplate>,
    include_metadata: bool,
    generation: u64,
    measurer: M,
}

impl<M: TextMeasurer> EditorSession<M> {
    pub fn new(project: ProjectRecord, measurer: M) -> Self {
        Self {
            project,
            committed: None,
            history: History::default(),
            template: None,
            include_metadata: false,
            generation: 0,
            measurer,
        }
    }

    pub fn project(&self) -> &ProjectRecord {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut ProjectRecord {
        &mut self.project
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    pub fn measurer_mut(&mut self) -> &mut M {
        &mut self.measurer
    }

    pub fn template(&self) -> Option<&GeneratedTemplate> {
        self.template.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while `generation` is still the newest regeneration.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn include_metadata(&self) -> bool {
        self.include_metadata
    }

    pub fn set_include_metadata(&mut self, include: bool) {
        self.include_metadata = include;
    }

    pub fn load_project(&mut self, project: ProjectRecord) {
        self.project = project;
    }

    pub fn set_dimensions(&mut self, dims: MugDimensions) {
        self.project.design.dimensions = dims;
    }

    pub fn set_background(&mut self, background: BackgroundSpec) {
        self.project.design.background = background;
    }

    pub fn set_artwork(&mut self, side: Side, spec: ArtworkSpec) {
        *self.project.design.artwork_mut(side) = spec;
    }

    pub fn artwork_mut(&mut self, side: Side) -> &mut ArtworkSpec {
        self.project.design.artwork_mut(side)
    }

    /// Rebuilds the template from the current project. Invalid dimensions
    /// clear the output and disable exports; measurement failures leave the
    /// previous template in place and are returned.
    pub fn regenerate(&mut self, ports: &mut dyn ViewPorts) -> Result<Regenerated, TemplateError> {
        self.capture_history();
        self.generation += 1;
        let generation = self.generation;
        ports.set_history_state(self.history.can_undo(), self.history.can_redo());

        if let Err(err) = self.project.design.dimensions.validate() {
            log::warn!("{err}");
            self.template = None;
            ports.clear_template();
            ports.show_message(INVALID_DIMENSIONS_MESSAGE);
            ports.set_exports_enabled(false);
            return Ok(Regenerated::InvalidDimensions);
        }

        let comment = if self.include_metadata {
            match metadata_comment(&self.project) {
                Ok(c) => Some(c),
                Err(err) => {
                    log::warn!("project data not embedded: {err}");
                    None
                }
            }
        } else {
            None
        };

        let (layout, document) = generate(&self.project.design, &self.measurer, comment.as_deref())
            .inspect_err(|err| log::error!("template generation failed: {err}"))?;
        let info = format!(
            "Calculated Circumference: {} mm\nTotal Template Size: {} x {} mm",
            fixed2(layout.sheet_width),
            fixed2(layout.sheet_width),
            fixed2(layout.sheet_height)
        );
        ports.show_template(&document.preview_markup, &info);
        ports.set_exports_enabled(true);
        self.template = Some(GeneratedTemplate {
            generation,
            layout,
            document,
        });
        Ok(Regenerated::Template { generation })
    }

    pub fn undo(&mut self, ports: &mut dyn ViewPorts) -> Result<Option<Regenerated>, TemplateError> {
        let Some(previous) = self.history.undo(&self.project) else {
            return Ok(None);
        };
        self.project = previous;
        self.regenerate(ports).map(Some)
    }

    pub fn redo(&mut self, ports: &mut dyn ViewPorts) -> Result<Option<Regenerated>, TemplateError> {
        let Some(next) = self.history.redo(&self.project) else {
            return Ok(None);
        };
        self.project = next;
        self.regenerate(ports).map(Some)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Record the project as it was at the previous regeneration, if it
    /// changed since.
    fn capture_history(&mut self) {
        if let Some(prev) = self.committed.take()
            && prev != self.project
        {
            self.history.capture(&prev);
        }
        self.committed = Some(self.project.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MonospaceMeasurer;

    #[derive(Default)]
    struct RecordingPorts {
        preview: Option<String>,
        info: String,
        message: Option<String>,
        exports_enabled: bool,
    }

    impl ViewPorts for RecordingPorts {
        fn show_template(&mut self, preview_markup: &str, info: &str) {
            self.preview = Some(preview_markup.to_string());
            self.info = info.to_string();
            self.message = None;
        }
        fn clear_template(&mut self) {
            self.preview = None;
        }
        fn show_message(&mut self, message: &str) {
            self.message = Some(message.to_string());
        }
        fn set_exports_enabled(&mut self, enabled: bool) {
            self.exports_enabled = enabled;
        }
    }

    fn session() -> EditorSession<MonospaceMeasurer> {
        EditorSession::new(ProjectRecord::default(), MonospaceMeasurer::default())
    }

    #[test]
    fn regenerate_shows_preview_and_enables_exports() {
        let mut s = session();
        let mut ports = RecordingPorts::default();
        let out = s.regenerate(&mut ports).unwrap();
        assert_eq!(out, Regenerated::Template { generation: 1 });
        assert!(ports.exports_enabled);
        assert!(ports.info.contains("257.61 mm"));
        assert!(ports.preview.unwrap().contains("checkerboard"));
    }

    #[test]
    fn invalid_dimensions_clear_everything() {
        let mut s = session();
        let mut ports = RecordingPorts::default();
        s.regenerate(&mut ports).unwrap();
        s.set_dimensions(MugDimensions {
            diameter_mm: 0.0,
            ..MugDimensions::default()
        });
        assert_eq!(s.regenerate(&mut ports).unwrap(), Regenerated::InvalidDimensions);
        assert!(ports.preview.is_none());
        assert!(!ports.exports_enabled);
        assert_eq!(ports.message.as_deref(), Some(INVALID_DIMENSIONS_MESSAGE));
        assert!(s.template().is_none());
    }

    #[test]
    fn identical_inputs_give_identical_markup() {
        let mut s = session();
        s.set_background(BackgroundSpec::default_color());
        s.regenerate(&mut NullPorts).unwrap();
        let first = s.template().unwrap().document.clone();
        s.regenerate(&mut NullPorts).unwrap();
        assert_eq!(s.template().unwrap().document, first);
        assert!(!s.is_current(1));
        assert!(s.is_current(2));
    }

    #[test]
    fn undo_restores_previous_project() {
        let mut s = session();
        s.regenerate(&mut NullPorts).unwrap();
        s.set_background(BackgroundSpec::default_color());
        s.regenerate(&mut NullPorts).unwrap();
        assert!(s.can_undo());
        s.undo(&mut NullPorts).unwrap();
        assert_eq!(s.project().design.background, BackgroundSpec::Transparent);
        assert!(s.can_redo());
        s.redo(&mut NullPorts).unwrap();
        assert_eq!(s.project().design.background, BackgroundSpec::default_color());
    }

    #[test]
    fn metadata_is_embedded_on_request() {
        let mut s = session();
        s.set_include_metadata(true);
        s.regenerate(&mut NullPorts).unwrap();
        let markup = &s.template().unwrap().document.download_markup;
        assert!(markup.starts_with("<!--MUG_PAINTER_PROJECT_DATA:"));
    }
}
