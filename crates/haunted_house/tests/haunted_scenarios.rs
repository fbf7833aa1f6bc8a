//! End-to-end scenarios driving the diorama through the engine

use approx::assert_relative_eq;
use haunt_engine::assets::MemorySource;
use haunt_engine::foundation::color::Color;
use haunt_engine::foundation::math::{constants::PI, Vec3};
use haunt_engine::render::HeadlessSurface;
use haunt_engine::scene::{NodeKey, NodeKind};
use haunt_engine::ui::ParamValue;
use haunt_engine::{AppEvent, Application, Engine};
use haunted_house::animator::{ghost_position, Ghost};
use haunted_house::composer::TextMount;
use haunted_house::graves::{GRAVE_HEIGHT, INNER_RADIUS, RING_WIDTH};
use haunted_house::{HauntedConfig, HauntedHouseApp};

const FONT: &str = include_str!("../../../static/fonts/block_regular.font.ron");

fn config() -> HauntedConfig {
    let mut config = HauntedConfig::default();
    config.assets.background = false;
    config.scene.seed = Some(2024);
    config.run.fps = None;
    config
}

fn app_with(source: MemorySource) -> HauntedHouseApp {
    HauntedHouseApp::new(config(), source).unwrap()
}

fn engine() -> Engine<HeadlessSurface> {
    Engine::new(HeadlessSurface::new(), config().engine_config()).unwrap()
}

fn ghost_positions(app: &HauntedHouseApp) -> Vec<Vec3> {
    let house = app.house();
    house
        .nodes
        .ghosts
        .iter()
        .map(|key| house.scene.world_position(*key).unwrap())
        .collect()
}

#[test]
fn ghosts_start_on_the_z_axis() {
    let mut app = app_with(MemorySource::new());
    app.frame(0.0).unwrap();
    let positions = ghost_positions(&app);
    assert_relative_eq!(positions[0], Vec3::new(0.0, 0.0, 4.0));
    assert_relative_eq!(positions[1], Vec3::new(0.0, 0.0, 6.0));
    assert_relative_eq!(positions[2], Vec3::new(0.0, 0.0, 8.0));

    app.frame(PI).unwrap();
    assert_relative_eq!(ghost_positions(&app)[0], Vec3::new(4.0, 0.0, 0.0), epsilon = 1e-5);
}

#[test]
fn advancing_is_a_pure_function_of_time() {
    let mut app = app_with(MemorySource::new());
    app.frame(12.5).unwrap();
    let first = ghost_positions(&app);

    app.frame(3.0).unwrap();
    app.frame(12.5).unwrap();
    app.frame(12.5).unwrap();
    assert_eq!(ghost_positions(&app), first);

    for (ghost, position) in Ghost::ALL.into_iter().zip(first) {
        assert_eq!(position, ghost_position(ghost, 12.5));
    }
}

#[test]
fn graves_ring_the_house() {
    let app = app_with(MemorySource::new());
    let house = app.house();
    assert_eq!(house.nodes.graves.len(), 70);

    for key in &house.nodes.graves {
        let position = house.scene.world_position(*key).unwrap();
        let distance = position.x.hypot(position.z);
        assert!(distance >= INNER_RADIUS - 1e-4 && distance <= INNER_RADIUS + RING_WIDTH + 1e-4);
        assert_relative_eq!(position.y, GRAVE_HEIGHT);
    }
}

#[test]
fn ambient_occlusion_meshes_carry_a_second_uv_channel() {
    let app = app_with(MemorySource::new());
    let scene = &app.house().scene;
    let mut checked = 0;

    scene.traverse(|_, node, _| {
        let NodeKind::Mesh { geometry, material } = node.kind else {
            return;
        };
        if scene.material(material).unwrap().uses_ao_map() {
            assert!(scene.geometry(geometry).unwrap().has_mirrored_uv2(), "{}", node.name);
            checked += 1;
        }
    });
    // walls, door, floor and every grave
    assert_eq!(checked, 3 + 70);
}

#[test]
fn missing_textures_degrade_to_flat_color() {
    let mut app = app_with(MemorySource::new());
    let mut engine = engine();
    engine.run_frame_at(&mut app, 0.0).unwrap();

    let frame = engine.surface().last_frame().unwrap();
    assert!(frame.items().all(|item| item.material.textures().is_empty()));
    assert_eq!(frame.transparent.len(), 1);
    // house (3), bushes (5), graves (70), floor
    assert_eq!(frame.item_count(), 3 + 5 + 70 + 1);
    // moon, door light, three ghosts
    assert_eq!(frame.shadow_caster_lights(), 5);
    assert!(frame.fog.is_some());
    assert_eq!(frame.clear_color.to_string(), "#262837");
}

#[test]
fn door_light_edit_touches_only_the_door_light() {
    let mut app = app_with(MemorySource::new());
    let mut engine = engine();
    let nodes = app.house().nodes.clone();
    let light_color = |app: &HauntedHouseApp, key: NodeKey| app.house().scene.light(key).unwrap().color;
    let ghosts_before: Vec<_> = nodes.ghosts.iter().map(|key| light_color(&app, *key)).collect();
    let ambient_before = light_color(&app, nodes.ambient);

    let green = Color::from_hex(0x0000_ff00);
    engine.push_event(AppEvent::PanelEdit {
        label: "Door Light".to_string(),
        value: ParamValue::Color(green),
    });
    engine.run_frame_at(&mut app, 1.0).unwrap();

    assert_eq!(light_color(&app, nodes.door_light), green);
    assert_eq!(light_color(&app, nodes.ambient), ambient_before);
    let ghosts_after: Vec<_> = nodes.ghosts.iter().map(|key| light_color(&app, *key)).collect();
    assert_eq!(ghosts_after, ghosts_before);
    assert_eq!(
        app.controls().store.get(haunted_house::params::names::DOOR_COLOR),
        Some(ParamValue::Color(green))
    );
}

#[test]
fn rejected_panel_edits_keep_the_loop_running() {
    let mut config = config();
    config.run.frames = Some(3);
    let mut app = HauntedHouseApp::new(config.clone(), MemorySource::new()).unwrap();
    let mut engine = Engine::new(HeadlessSurface::new(), config.engine_config()).unwrap();
    let ambient = app.house().nodes.ambient;

    let edit = |label: &str, value: ParamValue| AppEvent::PanelEdit {
        label: label.to_string(),
        value,
    };
    engine.push_event(edit("Moon Color", ParamValue::Number(0.5)));
    engine.push_event(edit("Bush Color", ParamValue::Number(0.5)));
    engine.push_event(edit("AmbientLight Intensity", ParamValue::Number(f32::NAN)));
    engine.push_event(edit("AmbientLight Intensity", ParamValue::Number(0.75)));

    engine.run(&mut app).unwrap();

    assert_eq!(engine.frame_count(), 3);
    assert_eq!(engine.surface().frames_drawn(), 3);
    // Events queued behind the rejected ones still apply
    assert_relative_eq!(app.house().scene.light(ambient).unwrap().intensity, 0.75);
}

#[test]
fn resize_updates_surface_and_camera() {
    let mut app = app_with(MemorySource::new());
    let mut engine = engine();
    app.initialize(engine.viewport()).unwrap();

    engine.push_event(AppEvent::Resized {
        width: 800,
        height: 400,
        device_pixel_ratio: 3.0,
    });
    engine.run_frame_at(&mut app, 0.5).unwrap();

    assert_eq!(engine.surface().size(), (800, 400));
    assert_relative_eq!(engine.surface().pixel_ratio(), 2.0);
    assert_relative_eq!(app.rig().camera.aspect, 2.0);

    engine.push_event(AppEvent::Resized {
        width: 800,
        height: 600,
        device_pixel_ratio: 1.5,
    });
    engine.run_frame_at(&mut app, 1.0).unwrap();
    assert_relative_eq!(engine.surface().pixel_ratio(), 1.5);
}

#[test]
fn text_mounts_exactly_once() {
    let source = MemorySource::new().with("fonts/block_regular.font.ron", FONT.as_bytes().to_vec());
    let mut app = app_with(source);
    assert!(!app.text_mounted());

    app.frame(0.0).unwrap();
    assert!(app.text_mounted());
    let TextMount::Mounted(text) = app.house().text_mount() else {
        panic!("text should be mounted");
    };
    let nodes = app.house().scene.node_count();

    app.frame(0.1).unwrap();
    app.frame(0.2).unwrap();
    assert_eq!(app.house().scene.node_count(), nodes);
    assert_eq!(app.house().text_mount(), TextMount::Mounted(text));

    let scene = &app.house().scene;
    assert_relative_eq!(scene.world_position(text).unwrap(), Vec3::new(0.0, 4.0, 0.0));
    let NodeKind::Mesh { geometry, .. } = scene.node(text).unwrap().kind else {
        panic!("text should be a mesh");
    };
    let bounds = scene.geometry(geometry).unwrap().bounding_box().unwrap();
    assert_relative_eq!(bounds.center(), Vec3::zeros(), epsilon = 1e-4);
    assert!(bounds.size().x > bounds.size().y);
}

#[test]
fn missing_font_leaves_the_scene_animating() {
    let mut app = app_with(MemorySource::new());
    let nodes = app.house().scene.node_count();

    app.frame(0.0).unwrap();
    assert_eq!(app.house().text_mount(), TextMount::Abandoned);
    assert_eq!(app.house().scene.node_count(), nodes);

    app.frame(PI).unwrap();
    assert_relative_eq!(ghost_positions(&app)[0], Vec3::new(4.0, 0.0, 0.0), epsilon = 1e-5);
}

#[test]
fn pointer_drag_orbits_the_camera() {
    let mut app = app_with(MemorySource::new());
    let mut engine = engine();
    let start = app.rig().camera.position;

    engine.push_event(AppEvent::PointerDrag { dx: 120.0, dy: 0.0 });
    for frame in 0..200 {
        engine.run_frame_at(&mut app, frame as f32 / 60.0).unwrap();
    }

    let end = app.rig().camera.position;
    assert!((end - start).norm() > 0.1);
    assert_relative_eq!(end.norm(), start.norm(), epsilon = 1e-2);
}

#[test]
fn config_file_round_trips() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/haunted_house.ron");
    let loaded = HauntedConfig::load(path).unwrap();
    assert_eq!(loaded, HauntedConfig::default());
}
