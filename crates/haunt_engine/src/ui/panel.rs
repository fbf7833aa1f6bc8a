//! Debug panel
//!
//! A flat list of labelled fields over [`ParameterStore`] entries. The panel
//! has no widgets of its own; a front end renders [`DebugPanel::fields`] and
//! reports user input through [`DebugPanel::edit`].

use crate::scene::Scene;
use crate::ui::params::{ParamKind, ParamValue, ParameterStore};
use crate::ui::PanelError;

/// Widget type and constraints of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Slider over `[min, max]` moving in `step` increments
    Number {
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
        /// Increment
        step: f32,
    },
    /// Color picker
    Color,
}

impl FieldKind {
    fn param_kind(&self) -> ParamKind {
        match self {
            Self::Number { .. } => ParamKind::Number,
            Self::Color => ParamKind::Color,
        }
    }
}

/// One bound field
#[derive(Debug, Clone, PartialEq)]
pub struct PanelField {
    /// Label shown next to the widget; unique within the panel
    pub label: String,
    /// Store entry the field edits
    pub parameter: String,
    /// Widget type and constraints
    pub kind: FieldKind,
}

/// A collapsible panel of parameter fields
#[derive(Debug, Clone, PartialEq)]
pub struct DebugPanel {
    /// Panel width in pixels
    pub width: f32,
    collapsed: bool,
    fields: Vec<PanelField>,
}

impl DebugPanel {
    /// Empty, expanded panel
    pub fn new(width: f32) -> Self {
        Self {
            width,
            collapsed: false,
            fields: Vec::new(),
        }
    }

    /// Start collapsed
    #[must_use]
    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    /// Whether the panel is collapsed
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Collapse or expand; returns the new collapsed state
    pub fn toggle(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    /// Bound fields in display order
    pub fn fields(&self) -> &[PanelField] {
        &self.fields
    }

    /// Look up a field by label
    pub fn field(&self, label: &str) -> Option<&PanelField> {
        self.fields.iter().find(|field| field.label == label)
    }

    /// Bind a slider to a numeric parameter
    pub fn bind_number(
        &mut self,
        store: &ParameterStore,
        parameter: &str,
        label: &str,
        min: f32,
        max: f32,
        step: f32,
    ) -> Result<(), PanelError> {
        let valid = min.is_finite() && max.is_finite() && min < max && step > 0.0 && step <= max - min;
        if !valid {
            return Err(PanelError::InvalidRange {
                label: label.to_string(),
                min,
                max,
                step,
            });
        }
        self.bind(store, parameter, label, FieldKind::Number { min, max, step })
    }

    /// Bind a color picker to a color parameter
    pub fn bind_color(&mut self, store: &ParameterStore, parameter: &str, label: &str) -> Result<(), PanelError> {
        self.bind(store, parameter, label, FieldKind::Color)
    }

    fn bind(&mut self, store: &ParameterStore, parameter: &str, label: &str, kind: FieldKind) -> Result<(), PanelError> {
        let value = store
            .get(parameter)
            .ok_or_else(|| PanelError::UnknownParameter(parameter.to_string()))?;
        if value.kind() != kind.param_kind() {
            return Err(PanelError::KindMismatch {
                name: parameter.to_string(),
                expected: value.kind(),
                found: kind.param_kind(),
            });
        }
        if self.field(label).is_some() {
            return Err(PanelError::DuplicateField(label.to_string()));
        }

        self.fields.push(PanelField {
            label: label.to_string(),
            parameter: parameter.to_string(),
            kind,
        });
        Ok(())
    }

    /// Apply user input to the field labelled `label`
    ///
    /// Numbers are snapped to the step and clamped to the range first; NaN and
    /// infinities are rejected. Returns the value actually written.
    pub fn edit(
        &self,
        label: &str,
        value: ParamValue,
        store: &mut ParameterStore,
        scene: &mut Scene,
    ) -> Result<ParamValue, PanelError> {
        let field = self
            .field(label)
            .ok_or_else(|| PanelError::UnknownField(label.to_string()))?;

        let value = match (field.kind, value) {
            (FieldKind::Number { .. }, ParamValue::Number(raw)) if !raw.is_finite() => {
                return Err(PanelError::InvalidValue {
                    label: label.to_string(),
                    value: raw,
                })
            }
            (FieldKind::Number { min, max, step }, ParamValue::Number(raw)) => {
                ParamValue::Number(((raw / step).round() * step).clamp(min, max))
            }
            (FieldKind::Color, ParamValue::Color(_)) => value,
            (kind, value) => {
                return Err(PanelError::KindMismatch {
                    name: field.parameter.clone(),
                    expected: kind.param_kind(),
                    found: value.kind(),
                })
            }
        };

        store.set(&field.parameter, value, scene)?;
        Ok(value)
    }
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new(245.0)
    }
}
