//! Parameter store
//!
//! Every parameter mirrors one field in the scene: a light's intensity, a
//! light's color, or a material's color. Writing a parameter writes the scene
//! field in the same call, so there is never a window in which the store and
//! the scene disagree.

use std::collections::HashMap;

use crate::foundation::collections::{MaterialKey, NodeKey};
use crate::foundation::color::Color;
use crate::scene::{Scene, SceneError};
use crate::ui::PanelError;

/// Kind of value a parameter holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A scalar
    Number,
    /// An RGB color
    Color,
}

/// A parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// A scalar
    Number(f32),
    /// An RGB color
    Color(Color),
}

impl ParamValue {
    /// Kind of this value
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Number(_) => ParamKind::Number,
            Self::Color(_) => ParamKind::Color,
        }
    }

    /// The scalar, if this is a number
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Color(_) => None,
        }
    }

    /// The color, if this is a color
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Number(_) => None,
        }
    }
}

/// The scene field a parameter controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamTarget {
    /// Intensity of a light node
    LightIntensity(NodeKey),
    /// Color of a light node
    LightColor(NodeKey),
    /// Base color of a shared material
    MaterialColor(MaterialKey),
}

impl ParamTarget {
    /// Kind of value the target field holds
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::LightIntensity(_) => ParamKind::Number,
            Self::LightColor(_) | Self::MaterialColor(_) => ParamKind::Color,
        }
    }

    fn read(self, scene: &Scene) -> Result<ParamValue, SceneError> {
        Ok(match self {
            Self::LightIntensity(node) => ParamValue::Number(scene.light(node)?.intensity),
            Self::LightColor(node) => ParamValue::Color(scene.light(node)?.color),
            Self::MaterialColor(key) => {
                ParamValue::Color(scene.material(key).ok_or(SceneError::UnknownMaterial(key))?.color())
            }
        })
    }

    fn write(self, scene: &mut Scene, value: ParamValue) -> Result<(), SceneError> {
        match (self, value) {
            (Self::LightIntensity(node), ParamValue::Number(intensity)) => {
                scene.light_mut(node)?.intensity = intensity;
            }
            (Self::LightColor(node), ParamValue::Color(color)) => {
                scene.light_mut(node)?.color = color;
            }
            (Self::MaterialColor(key), ParamValue::Color(color)) => {
                scene
                    .material_mut(key)
                    .ok_or(SceneError::UnknownMaterial(key))?
                    .set_color(color);
            }
            // Kinds are checked by the store before writing
            _ => {}
        }
        Ok(())
    }
}

/// A named value bound to a scene field
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Unique name
    pub name: String,
    /// Current value
    pub value: ParamValue,
    /// Field it mirrors
    pub target: ParamTarget,
}

/// Named parameters bound to scene fields
#[derive(Debug, Default)]
pub struct ParameterStore {
    parameters: Vec<Parameter>,
    by_name: HashMap<String, usize>,
}

impl ParameterStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` for `target`, taking its current value from the scene
    pub fn insert(&mut self, name: &str, target: ParamTarget, scene: &Scene) -> Result<(), PanelError> {
        if self.by_name.contains_key(name) {
            return Err(PanelError::DuplicateParameter(name.to_string()));
        }
        let value = target.read(scene)?;
        self.by_name.insert(name.to_string(), self.parameters.len());
        self.parameters.push(Parameter {
            name: name.to_string(),
            value,
            target,
        });
        log::debug!("Registered parameter '{name}' = {value:?}");
        Ok(())
    }

    /// Current value of `name`
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.parameter(name).map(|p| p.value)
    }

    /// Full parameter record
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.by_name.get(name).map(|&index| &self.parameters[index])
    }

    /// Set `name` and write the value through to the scene
    pub fn set(&mut self, name: &str, value: ParamValue, scene: &mut Scene) -> Result<(), PanelError> {
        let index = *self
            .by_name
            .get(name)
            .ok_or_else(|| PanelError::UnknownParameter(name.to_string()))?;
        let parameter = &mut self.parameters[index];

        let expected = parameter.target.kind();
        if value.kind() != expected {
            return Err(PanelError::KindMismatch {
                name: name.to_string(),
                expected,
                found: value.kind(),
            });
        }

        parameter.target.write(scene, value)?;
        parameter.value = value;
        log::debug!("Parameter '{name}' set to {value:?}");
        Ok(())
    }

    /// Registered parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::light::Light;
    use crate::render::material::StandardMaterial;

    fn lit_scene() -> (Scene, NodeKey, NodeKey, MaterialKey) {
        let mut scene = Scene::new();
        let root = scene.root();
        let door = scene.add_light(root, "door", Light::point(Color::from_hex(0x00ff_7d46), 5.0, 7.0)).unwrap();
        let ghost = scene.add_light(root, "ghost", Light::point(Color::from_hex(0x00ff_00ff), 2.0, 3.0)).unwrap();
        let bush = scene.add_material(StandardMaterial::colored(Color::from_hex(0x0089_c854)));
        (scene, door, ghost, bush)
    }

    #[test]
    fn test_insert_reads_initial_value() {
        let (scene, door, _, bush) = lit_scene();
        let mut store = ParameterStore::new();
        store.insert("door intensity", ParamTarget::LightIntensity(door), &scene).unwrap();
        store.insert("bush", ParamTarget::MaterialColor(bush), &scene).unwrap();
        assert_eq!(store.get("door intensity"), Some(ParamValue::Number(5.0)));
        assert_eq!(store.get("bush").and_then(|v| v.as_color()).map(|c| c.to_hex()), Some(0x0089_c854));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_writes_only_its_target() {
        let (mut scene, door, ghost, _) = lit_scene();
        let mut store = ParameterStore::new();
        store.insert("door color", ParamTarget::LightColor(door), &scene).unwrap();
        store.insert("ghost color", ParamTarget::LightColor(ghost), &scene).unwrap();

        let green = Color::from_hex(0x0000_ff00);
        store.set("door color", ParamValue::Color(green), &mut scene).unwrap();
        assert_eq!(scene.light(door).unwrap().color, green);
        assert_eq!(scene.light(ghost).unwrap().color.to_hex(), 0x00ff_00ff);
        assert_eq!(store.get("ghost color"), Some(ParamValue::Color(Color::from_hex(0x00ff_00ff))));
    }

    #[test]
    fn test_wiring_errors() {
        let (mut scene, door, _, bush) = lit_scene();
        let mut store = ParameterStore::new();
        let group = scene.add_group(scene.root(), "house").unwrap();

        assert_eq!(
            store.insert("bad", ParamTarget::LightIntensity(group), &scene),
            Err(PanelError::Scene(SceneError::NotALight(group)))
        );
        store.insert("bush", ParamTarget::MaterialColor(bush), &scene).unwrap();
        assert_eq!(
            store.insert("bush", ParamTarget::LightColor(door), &scene),
            Err(PanelError::DuplicateParameter("bush".to_string()))
        );
        assert!(matches!(
            store.set("bush", ParamValue::Number(1.0), &mut scene),
            Err(PanelError::KindMismatch { expected: ParamKind::Color, .. })
        ));
        assert_eq!(
            store.set("nope", ParamValue::Number(1.0), &mut scene),
            Err(PanelError::UnknownParameter("nope".to_string()))
        );
    }
}
