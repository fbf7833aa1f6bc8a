//! Debug panel wiring
//!
//! Binds the tweakable light and material fields to a collapsed panel. The
//! panel is the only writer; every edit lands in the scene before
//! [`HouseControls::edit`] returns.

use haunt_engine::scene::Scene;
use haunt_engine::ui::{DebugPanel, PanelError, ParamTarget, ParamValue, ParameterStore};

use crate::composer::HouseScene;

/// Panel width in pixels
pub const PANEL_WIDTH: f32 = 400.0;

/// Store names of the exposed parameters
pub mod names {
    /// Ambient light intensity
    pub const AMBIENT_INTENSITY: &str = "ambientLight.intensity";
    /// Moonlight intensity
    pub const MOON_INTENSITY: &str = "moonLight.intensity";
    /// Door light intensity
    pub const DOOR_INTENSITY: &str = "doorLight.intensity";
    /// Door light color
    pub const DOOR_COLOR: &str = "doorLight.color";
    /// Ghost light colors
    pub const GHOST_COLORS: [&str; 3] = ["ghost1.color", "ghost2.color", "ghost3.color"];
    /// Shared bush tint
    pub const BUSH_COLOR: &str = "bush.color";
}

const GHOST_LABELS: [&str; 3] = ["Ghost Light 1", "Ghost Light 2", "Ghost Light 3"];

/// Parameter store plus the panel over it
#[derive(Debug)]
pub struct HouseControls {
    /// Current values
    pub store: ParameterStore,
    /// Field layout
    pub panel: DebugPanel,
}

impl HouseControls {
    /// Register every parameter and lay out the panel
    pub fn wire(house: &HouseScene) -> Result<Self, PanelError> {
        let scene = &house.scene;
        let nodes = &house.nodes;

        let mut store = ParameterStore::new();
        store.insert(names::AMBIENT_INTENSITY, ParamTarget::LightIntensity(nodes.ambient), scene)?;
        store.insert(names::MOON_INTENSITY, ParamTarget::LightIntensity(nodes.moon), scene)?;
        store.insert(names::DOOR_INTENSITY, ParamTarget::LightIntensity(nodes.door_light), scene)?;
        store.insert(names::DOOR_COLOR, ParamTarget::LightColor(nodes.door_light), scene)?;
        for (name, ghost) in names::GHOST_COLORS.into_iter().zip(nodes.ghosts) {
            store.insert(name, ParamTarget::LightColor(ghost), scene)?;
        }
        store.insert(names::BUSH_COLOR, ParamTarget::MaterialColor(house.bush_material), scene)?;

        let mut panel = DebugPanel::new(PANEL_WIDTH).collapsed();
        panel.bind_number(&store, names::AMBIENT_INTENSITY, "AmbientLight Intensity", 0.0, 1.0, 0.01)?;
        panel.bind_number(&store, names::MOON_INTENSITY, "DirectionalLight Intensity", 0.0, 1.0, 0.01)?;
        panel.bind_number(&store, names::DOOR_INTENSITY, "DoorLight Intensity", 0.0, 10.0, 0.01)?;
        panel.bind_color(&store, names::DOOR_COLOR, "Door Light")?;
        for (name, label) in names::GHOST_COLORS.into_iter().zip(GHOST_LABELS) {
            panel.bind_color(&store, name, label)?;
        }
        panel.bind_color(&store, names::BUSH_COLOR, "Bush Color")?;

        log::debug!("Wired {} panel fields", panel.fields().len());
        Ok(Self { store, panel })
    }

    /// Apply a panel edit; returns the value written after snapping and clamping
    pub fn edit(&mut self, label: &str, value: ParamValue, scene: &mut Scene) -> Result<ParamValue, PanelError> {
        let applied = self.panel.edit(label, value, &mut self.store, scene)?;
        log::debug!("Panel edit {label:?} -> {applied:?}");
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use haunt_engine::assets::{AssetServer, LoadMode, MemorySource};
    use haunt_engine::foundation::color::Color;
    use haunt_engine::ui::FieldKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::HauntedConfig;
    use crate::textures::Textures;

    fn house() -> HouseScene {
        let mut assets = AssetServer::new(MemorySource::new(), LoadMode::Inline);
        let textures = Textures::request(&mut assets);
        let font = assets.load_font("fonts/none.font.ron");
        let mut config = HauntedConfig::default();
        config.scene.grave_count = 3;
        HouseScene::compose(&config, &textures, font, &mut StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn test_panel_layout() {
        let house = house();
        let controls = HouseControls::wire(&house).unwrap();
        let labels: Vec<_> = controls.panel.fields().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "AmbientLight Intensity",
                "DirectionalLight Intensity",
                "DoorLight Intensity",
                "Door Light",
                "Ghost Light 1",
                "Ghost Light 2",
                "Ghost Light 3",
                "Bush Color",
            ]
        );
        assert!(controls.panel.is_collapsed());
        assert_relative_eq!(controls.panel.width, 400.0);
        assert_eq!(
            controls.panel.field("DoorLight Intensity").unwrap().kind,
            FieldKind::Number { min: 0.0, max: 10.0, step: 0.01 }
        );
    }

    #[test]
    fn test_initial_values_come_from_scene() {
        let house = house();
        let controls = HouseControls::wire(&house).unwrap();
        assert_eq!(controls.store.get(names::DOOR_INTENSITY), Some(ParamValue::Number(5.0)));
        assert_eq!(
            controls.store.get(names::BUSH_COLOR),
            Some(ParamValue::Color(Color::from_hex(0x0089_c854)))
        );
    }

    #[test]
    fn test_bush_edit_recolors_every_bush() {
        let mut house = house();
        let mut controls = HouseControls::wire(&house).unwrap();
        let red = Color::from_hex(0x00ff_0000);
        controls
            .edit("Bush Color", ParamValue::Color(red), &mut house.scene)
            .unwrap();
        for bush in &house.nodes.bushes {
            let material = house.scene.node(*bush).unwrap().material().unwrap();
            assert_eq!(house.scene.material(material).unwrap().color(), red);
        }
    }

    #[test]
    fn test_intensity_is_clamped() {
        let mut house = house();
        let mut controls = HouseControls::wire(&house).unwrap();
        let applied = controls
            .edit("AmbientLight Intensity", ParamValue::Number(3.0), &mut house.scene)
            .unwrap();
        assert_eq!(applied, ParamValue::Number(1.0));
        assert_relative_eq!(house.scene.light(house.nodes.ambient).unwrap().intensity, 1.0);
    }

    #[test]
    fn test_unknown_label() {
        let mut house = house();
        let mut controls = HouseControls::wire(&house).unwrap();
        let result = controls.edit("Moon Color", ParamValue::Number(0.5), &mut house.scene);
        assert_eq!(result, Err(PanelError::UnknownField("Moon Color".to_string())));
    }
}
