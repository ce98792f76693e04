//! Render instructions and the document surface they are applied to.
//!
//! Widgets never touch a document directly. Each transition produces a
//! [`Frame`]: an ordered list of [`RenderOp`]s addressed at elements by id
//! or by class position. A [`Surface`] applies a frame in one go. The web
//! adapter implements it over `web_sys::Document`; [`MemorySurface`] keeps
//! an in-memory element list so the widgets can be exercised without a
//! browser.
//!
//! Every target in a frame is resolved before the first write, so a missing
//! anchor element aborts the whole frame instead of leaving half a layout
//! on screen.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("missing element #{0}")]
    MissingId(String),
    #[error("missing element .{class}[{index}]")]
    MissingNth { class: String, index: usize },
    #[error("DOM error: {0}")]
    Dom(String),
}

/// How a render op locates its element(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The element with this `id` attribute.
    Id(String),
    /// The `index`-th element (document order, 0-based) carrying `class`.
    Nth { class: &'static str, index: usize },
    /// Every element carrying `class`. Matching nothing is not an error.
    All(&'static str),
}

impl Target {
    pub fn id(id: impl Into<String>) -> Self {
        Target::Id(id.into())
    }

    pub fn nth(class: &'static str, index: usize) -> Self {
        Target::Nth { class, index }
    }
}

/// A single presentation write.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Set an inline style property. An empty value removes the property.
    Style {
        target: Target,
        property: &'static str,
        value: String,
    },
    /// Add (`present`) or remove a class.
    Class {
        target: Target,
        class: &'static str,
        present: bool,
    },
}

impl RenderOp {
    pub fn style(target: Target, property: &'static str, value: impl Into<String>) -> Self {
        RenderOp::Style {
            target,
            property,
            value: value.into(),
        }
    }

    pub fn class(target: Target, class: &'static str, present: bool) -> Self {
        RenderOp::Class {
            target,
            class,
            present,
        }
    }

    pub fn target(&self) -> &Target {
        match self {
            RenderOp::Style { target, .. } | RenderOp::Class { target, .. } => target,
        }
    }
}

/// Everything one transition writes, in application order.
pub type Frame = Vec<RenderOp>;

/// Format a CSS pixel length.
pub(crate) fn px(value: f64) -> String {
    // `+ 0.0` folds negative zero
    format!("{}px", (value * 100.0).round() / 100.0 + 0.0)
}

/// A document the widgets can write presentation state into.
pub trait Surface {
    /// Check that `target` addresses an existing element.
    fn resolve(&self, target: &Target) -> Result<(), SurfaceError>;

    fn set_style(&mut self, target: &Target, property: &str, value: &str)
    -> Result<(), SurfaceError>;

    fn set_class(&mut self, target: &Target, class: &str, present: bool)
    -> Result<(), SurfaceError>;

    /// Apply a whole frame. Targets are resolved up front; nothing is
    /// written if any of them is missing.
    fn apply(&mut self, frame: &[RenderOp]) -> Result<(), SurfaceError> {
        for op in frame {
            self.resolve(op.target())?;
        }
        for op in frame {
            match op {
                RenderOp::Style {
                    target,
                    property,
                    value,
                } => self.set_style(target, property, value)?,
                RenderOp::Class {
                    target,
                    class,
                    present,
                } => self.set_class(target, class, *present)?,
            }
        }
        Ok(())
    }
}

/// One element of a [`MemorySurface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryElement {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub style: BTreeMap<String, String>,
}

impl MemoryElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }
}

/// In-memory document: a flat list of elements in document order.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: Vec<MemoryElement>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element with the given id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.elements.push(MemoryElement {
            id: Some(id.into()),
            ..Default::default()
        });
        self
    }

    /// Append `count` elements carrying `class`.
    pub fn with_class(mut self, class: &str, count: usize) -> Self {
        for _ in 0..count {
            self.elements.push(MemoryElement {
                classes: vec![class.to_string()],
                ..Default::default()
            });
        }
        self
    }

    pub fn by_id(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn by_class(&self, class: &str) -> Vec<&MemoryElement> {
        self.elements.iter().filter(|e| e.has_class(class)).collect()
    }

    fn indices(&self, target: &Target) -> Result<Vec<usize>, SurfaceError> {
        match target {
            Target::Id(id) => self
                .elements
                .iter()
                .position(|e| e.id.as_deref() == Some(id.as_str()))
                .map(|i| vec![i])
                .ok_or_else(|| SurfaceError::MissingId(id.clone())),
            Target::Nth { class, index } => self
                .elements
                .iter()
                .enumerate()
                .filter(|(_, e)| e.has_class(class))
                .nth(*index)
                .map(|(i, _)| vec![i])
                .ok_or_else(|| SurfaceError::MissingNth {
                    class: class.to_string(),
                    index: *index,
                }),
            Target::All(class) => Ok(self
                .elements
                .iter()
                .enumerate()
                .filter(|(_, e)| e.has_class(class))
                .map(|(i, _)| i)
                .collect()),
        }
    }
}

impl Surface for MemorySurface {
    fn resolve(&self, target: &Target) -> Result<(), SurfaceError> {
        self.indices(target).map(|_| ())
    }

    fn set_style(
        &mut self,
        target: &Target,
        property: &str,
        value: &str,
    ) -> Result<(), SurfaceError> {
        for i in self.indices(target)? {
            let style = &mut self.elements[i].style;
            if value.is_empty() {
                style.remove(property);
            } else {
                style.insert(property.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn set_class(
        &mut self,
        target: &Target,
        class: &str,
        present: bool,
    ) -> Result<(), SurfaceError> {
        for i in self.indices(target)? {
            let classes = &mut self.elements[i].classes;
            let has = classes.iter().any(|c| c == class);
            if present && !has {
                classes.push(class.to_string());
            } else if !present {
                classes.retain(|c| c != class);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> MemorySurface {
        MemorySurface::new()
            .with_id("menubar")
            .with_class("dot", 3)
    }

    #[test]
    fn style_write_by_id() {
        let mut s = surface();
        s.apply(&[RenderOp::style(Target::id("menubar"), "height", "80px")])
            .unwrap();
        assert_eq!(s.by_id("menubar").unwrap().style("height"), Some("80px"));
    }

    #[test]
    fn empty_style_value_removes_property() {
        let mut s = surface();
        s.apply(&[RenderOp::style(Target::id("menubar"), "color", "red")])
            .unwrap();
        s.apply(&[RenderOp::style(Target::id("menubar"), "color", "")])
            .unwrap();
        assert_eq!(s.by_id("menubar").unwrap().style("color"), None);
    }

    #[test]
    fn nth_addresses_document_order() {
        let mut s = surface();
        s.apply(&[RenderOp::class(Target::nth("dot", 1), "active", true)])
            .unwrap();
        let dots = s.by_class("dot");
        assert!(!dots[0].has_class("active"));
        assert!(dots[1].has_class("active"));
        assert!(!dots[2].has_class("active"));
    }

    #[test]
    fn adding_a_class_twice_keeps_one_copy() {
        let mut s = surface();
        let op = RenderOp::class(Target::nth("dot", 0), "active", true);
        s.apply(&[op.clone(), op]).unwrap();
        let count = s.by_class("dot")[0]
            .classes
            .iter()
            .filter(|c| *c == "active")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn all_matching_nothing_is_fine() {
        let mut s = surface();
        s.apply(&[RenderOp::style(Target::All("popup"), "display", "none")])
            .unwrap();
    }

    #[test]
    fn missing_anchor_aborts_whole_frame() {
        let mut s = surface();
        let frame = vec![
            RenderOp::style(Target::id("menubar"), "height", "80px"),
            RenderOp::style(Target::id("menubar_logo"), "height", "64px"),
        ];
        let err = s.apply(&frame).unwrap_err();
        assert_eq!(err, SurfaceError::MissingId("menubar_logo".into()));
        // Nothing was written before the failure was detected
        assert_eq!(s.by_id("menubar").unwrap().style("height"), None);
    }

    #[test]
    fn out_of_range_nth_is_an_error() {
        let mut s = surface();
        let err = s
            .apply(&[RenderOp::class(Target::nth("dot", 3), "active", true)])
            .unwrap_err();
        assert!(matches!(err, SurfaceError::MissingNth { index: 3, .. }));
    }

    #[test]
    fn px_rounds_to_hundredths() {
        assert_eq!(px(12.0), "12px");
        assert_eq!(px(12.3456), "12.35px");
        assert_eq!(px(-4.0), "-4px");
    }
}
