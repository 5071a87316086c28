// File: src/form/presenter.rs
// Purpose: Presentation hooks for field state (valid/invalid markers, error nodes, focus)

use maud::html;
use std::collections::HashMap;

/// How a front end shows the outcome of field validation
///
/// The form binding only ever talks to this trait, so a web, TUI or native
/// front end can render errors however it likes.
pub trait FieldPresenter {
    fn mark_valid(&mut self, field: &str);
    fn mark_invalid(&mut self, field: &str, message: &str);
    fn clear(&mut self, field: &str);
    fn focus(&mut self, field: &str);
}

impl<P: FieldPresenter + ?Sized> FieldPresenter for Box<P> {
    fn mark_valid(&mut self, field: &str) {
        (**self).mark_valid(field)
    }

    fn mark_invalid(&mut self, field: &str, message: &str) {
        (**self).mark_invalid(field, message)
    }

    fn clear(&mut self, field: &str) {
        (**self).clear(field)
    }

    fn focus(&mut self, field: &str) {
        (**self).focus(field)
    }
}

/// Presenter that shows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPresenter;

impl FieldPresenter for NoopPresenter {
    fn mark_valid(&mut self, _field: &str) {}
    fn mark_invalid(&mut self, _field: &str, _message: &str) {}
    fn clear(&mut self, _field: &str) {}
    fn focus(&mut self, _field: &str) {}
}

/// Visual state of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMarker {
    Valid,
    Invalid,
}

impl FieldMarker {
    /// CSS class a web front end puts on the input
    pub fn css_class(&self) -> &'static str {
        match self {
            FieldMarker::Valid => "success",
            FieldMarker::Invalid => "error",
        }
    }
}

/// Error message rendered right after a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub message: String,
    pub html: String,
}

impl ErrorNode {
    fn render(field: &str, message: &str) -> Self {
        let markup = html! {
            div.error-message id=(format!("{}-error", field)) role="alert" aria-live="polite" {
                (message)
            }
        };
        Self {
            message: message.to_string(),
            html: markup.into_string(),
        }
    }
}

/// Keeps the markup-level state of every field: its marker, at most one
/// error node and which field has focus
#[derive(Debug, Clone, Default)]
pub struct HtmlPresenter {
    markers: HashMap<String, FieldMarker>,
    nodes: HashMap<String, ErrorNode>,
    focused: Option<String>,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self, field: &str) -> Option<FieldMarker> {
        self.markers.get(field).copied()
    }

    pub fn error_node(&self, field: &str) -> Option<&ErrorNode> {
        self.nodes.get(field)
    }

    /// Number of error nodes currently rendered across the form
    pub fn error_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// `aria-invalid` value for a field
    pub fn aria_invalid(&self, field: &str) -> &'static str {
        match self.marker(field) {
            Some(FieldMarker::Invalid) => "true",
            _ => "false",
        }
    }
}

impl FieldPresenter for HtmlPresenter {
    fn mark_valid(&mut self, field: &str) {
        self.nodes.remove(field);
        self.markers.insert(field.to_string(), FieldMarker::Valid);
    }

    fn mark_invalid(&mut self, field: &str, message: &str) {
        // Replaces any earlier node so a field never shows two messages.
        self.nodes
            .insert(field.to_string(), ErrorNode::render(field, message));
        self.markers.insert(field.to_string(), FieldMarker::Invalid);
    }

    fn clear(&mut self, field: &str) {
        self.nodes.remove(field);
        self.markers.remove(field);
    }

    fn focus(&mut self, field: &str) {
        self.focused = Some(field.to_string());
    }
}
