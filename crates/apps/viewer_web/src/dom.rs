//! The HTML side of the globe: container sizing and the label list.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, Window};

use scene::labels::{LabelPlacement, Labels};

use crate::error::ViewerError;

pub const CONTAINER_SELECTOR: &str = ".js-globe";
pub const CANVAS_SELECTOR: &str = ".js-canvas";
pub const LIST_SELECTOR: &str = ".js-list";

pub fn label_transform(x: f64, y: f64) -> String {
    format!("translate3D({x}px, {y}px, 0)")
}

/// What one label element should show this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// `None` leaves the last transform in place.
    pub transform: Option<String>,
    pub active: bool,
    pub behind: bool,
}

/// Labels without a placement (anchor behind the camera) count as behind.
pub fn label_style(placement: Option<&LabelPlacement>) -> LabelStyle {
    match placement {
        Some(p) => LabelStyle {
            transform: Some(label_transform(p.x, p.y)),
            active: p.active,
            behind: !p.facing,
        },
        None => LabelStyle {
            transform: None,
            active: false,
            behind: true,
        },
    }
}

#[derive(Debug)]
struct LabelElement {
    key: String,
    element: HtmlElement,
}

#[derive(Debug)]
pub struct Dom {
    window: Window,
    document: Document,
    container: HtmlElement,
    pub canvas: HtmlCanvasElement,
    list: Element,
    list_active: bool,
    labels: Vec<LabelElement>,
}

fn query<T: JsCast>(document: &Document, selector: &'static str) -> Result<T, ViewerError> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or(ViewerError::MissingElement { selector })
}

impl Dom {
    pub fn query(window: Window) -> Result<Self, ViewerError> {
        let document = window.document().ok_or(ViewerError::MissingElement {
            selector: "document",
        })?;
        let container = query::<HtmlElement>(&document, CONTAINER_SELECTOR)?;
        let canvas = query::<HtmlCanvasElement>(&document, CANVAS_SELECTOR)?;
        let list = query::<Element>(&document, LIST_SELECTOR)?;
        Ok(Self {
            window,
            document,
            container,
            canvas,
            list,
            list_active: false,
            labels: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// One `<span><span class="text">name</span></span>` per label.
    pub fn create_labels(&mut self, labels: &Labels) -> Result<(), ViewerError> {
        let dom_err = |e: wasm_bindgen::JsValue| ViewerError::Dom(format!("{e:?}"));
        for label in labels.labels() {
            let element = self
                .document
                .create_element("span")
                .map_err(dom_err)?
                .dyn_into::<HtmlElement>()
                .map_err(|_| ViewerError::MissingElement { selector: "span" })?;
            let text = self.document.create_element("span").map_err(dom_err)?;
            text.set_class_name("text");
            text.set_text_content(Some(&label.name));
            element.append_child(&text).map_err(dom_err)?;
            self.list.append_child(&element).map_err(dom_err)?;
            self.labels.push(LabelElement {
                key: label.key.clone(),
                element,
            });
        }
        Ok(())
    }

    pub fn show_list(&mut self) {
        if self.list_active {
            return;
        }
        if self.list.class_list().add_1("active").is_ok() {
            self.list_active = true;
        }
    }

    pub fn sync_labels(&self, placements: &[LabelPlacement]) {
        for label in &self.labels {
            let style = label_style(placements.iter().find(|p| p.key == label.key));
            if let Some(transform) = &style.transform {
                let _ = label.element.style().set_property("transform", transform);
            }
            let classes = label.element.class_list();
            let _ = classes.toggle_with_force("active", style.active);
            let _ = classes.toggle_with_force("behind", style.behind);
        }
    }

    /// Fits the container and canvas to the window; returns the new size.
    pub fn resize(&self) -> (f64, f64) {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0)
            .max(1.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0)
            .max(1.0);

        let style = self.container.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        (width, height)
    }
}
