use serde::Deserialize;
use web_sys::{Document, Element};
use wrap_core::ViewPorts;

/// Element ids the editor writes into. Missing elements are skipped.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomTargets {
    pub preview: String,
    pub info: String,
    pub message: String,
    pub export_buttons: Vec<String>,
    pub undo_button: String,
    pub redo_button: String,
}

impl Default for DomTargets {
    fn default() -> Self {
        Self {
            preview: "svgContainer".into(),
            info: "templateInfo".into(),
            message: "messageArea".into(),
            export_buttons: vec![
                "downloadSvg".into(),
                "downloadPng".into(),
                "downloadPdf".into(),
                "downloadCutout".into(),
            ],
            undo_button: "undoBtn".into(),
            redo_button: "redoBtn".into(),
        }
    }
}

/// [`ViewPorts`] over the live page.
pub struct DomPorts {
    document: Document,
    targets: DomTargets,
}

impl DomPorts {
    pub fn new(document: Document, targets: DomTargets) -> Self {
        Self { document, targets }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        let Some(el) = self.element(id) else {
            return;
        };
        let res = if disabled {
            el.set_attribute("disabled", "")
        } else {
            el.remove_attribute("disabled")
        };
        if res.is_err() {
            log::warn!("could not toggle #{id}");
        }
    }
}

impl ViewPorts for DomPorts {
    fn show_template(&mut self, preview_markup: &str, info: &str) {
        if let Some(el) = self.element(&self.targets.preview) {
            el.set_inner_html(preview_markup);
        }
        self.set_text(&self.targets.info, info);
        self.set_text(&self.targets.message, "");
    }

    fn clear_template(&mut self) {
        if let Some(el) = self.element(&self.targets.preview) {
            el.set_inner_html("");
        }
        self.set_text(&self.targets.info, "");
    }

    fn show_message(&mut self, message: &str) {
        self.set_text(&self.targets.message, message);
    }

    fn set_exports_enabled(&mut self, enabled: bool) {
        for id in &self.targets.export_buttons {
            self.set_disabled(id, !enabled);
        }
    }

    fn set_history_state(&mut self, can_undo: bool, can_redo: bool) {
        self.set_disabled(&self.targets.undo_button, !can_undo);
        self.set_disabled(&self.targets.redo_button, !can_redo);
    }
}
