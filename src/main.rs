use terrain_sculpt::{
    intersect_heightfield, HeightfieldMesh, PickSource, RaiseDirection, SculptError,
    SculptOutcome, SculptSettings, TerrainConfig, TerrainSculptor,
};

use bevy::{
    math::Ray,
    pbr::wireframe::{Wireframe, WireframePlugin},
    prelude::*,
    render::{
        settings::{WgpuFeatures, WgpuSettings},
        RenderPlugin,
    },
    window::PrimaryWindow,
};
use bevy_atmosphere::prelude::*;
use bevy_fly_camera::{FlyCamera, FlyCameraPlugin};

#[derive(Resource)]
struct Terrain {
    sculptor: TerrainSculptor,
    mesh: Handle<Mesh>,
    entity: Entity,
}

#[derive(Resource, Default)]
struct Brush(SculptSettings);

/// Cursor ray against the terrain as currently placed in the scene.
struct CursorPick {
    ray: Option<Ray>,
    placement: Transform,
}

impl PickSource for CursorPick {
    fn pick_point(&mut self, mesh: &HeightfieldMesh) -> Option<Vec3> {
        intersect_heightfield(mesh, &self.placement, self.ray?)
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(RenderPlugin {
            wgpu_settings: WgpuSettings {
                features: WgpuFeatures::POLYGON_MODE_LINE,
                ..default()
            },
        }))
        .add_plugin(WireframePlugin)
        .add_plugin(FlyCameraPlugin)
        .add_plugin(AtmospherePlugin)
        .init_resource::<Brush>()
        .add_startup_system(setup_terrain.pipe(log_errors))
        .add_system(adjust_brush)
        .add_system(toggle_fly_camera)
        .add_system(toggle_wireframe)
        .add_system(sculpt_terrain.pipe(log_errors))
        .run();
}

fn log_errors(In(result): In<Result<(), SculptError>>) {
    if let Err(err) = result {
        warn!("{err}");
    }
}

fn setup_terrain(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result<(), SculptError> {
    let config = TerrainConfig::default();
    let sculptor = TerrainSculptor::new(&config)?;
    let extent = config.vertex_size as f32 * config.cell_size;

    let mesh = meshes.add(sculptor.emit().into_render_mesh());
    let entity = commands
        .spawn(PbrBundle {
            mesh: mesh.clone(),
            material: materials.add(StandardMaterial {
                base_color: Color::rgb(1., 0.85, 0.57),
                perceptual_roughness: 0.5,
                ..default()
            }),
            transform: sculptor.placement(),
            ..default()
        })
        .id();

    add_camera(&mut commands, extent);
    add_lights(&mut commands);

    info!(
        "terrain ready: {0}x{0} vertices; Tab toggles fly/sculpt, right mouse raises, left lowers, [ ] radius, - = strength, F wireframe",
        config.vertex_size
    );

    commands.insert_resource(Terrain {
        sculptor,
        mesh,
        entity,
    });
    Ok(())
}

fn add_camera(commands: &mut Commands, extent: f32) {
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(extent / 2., extent / 4., extent * 1.2)
                .looking_at(Vec3::new(extent / 2., 0., extent / 2.), Vec3::Y),
            ..default()
        },
        FlyCamera {
            key_up: KeyCode::Q,
            key_down: KeyCode::E,
            enabled: false,
            ..default()
        },
        AtmosphereCamera::default(),
    ));
}

fn add_lights(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.1,
    });

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 10000.,
            shadows_enabled: false,
            ..default()
        },
        transform: Transform::from_rotation(Quat::from_rotation_x(-0.25 * std::f32::consts::PI)),
        ..default()
    });
}

fn adjust_brush(keys: Res<Input<KeyCode>>, mut brush: ResMut<Brush>) {
    let before = brush.0;

    if keys.just_pressed(KeyCode::RBracket) {
        brush.0.nudge_radius(1);
    }
    if keys.just_pressed(KeyCode::LBracket) {
        brush.0.nudge_radius(-1);
    }
    if keys.just_pressed(KeyCode::Equals) {
        brush.0.nudge_amount(1.5);
    }
    if keys.just_pressed(KeyCode::Minus) {
        brush.0.nudge_amount(1. / 1.5);
    }

    if brush.0 != before {
        info!(
            "brush strength {:.3}, radius {}",
            brush.0.amount(),
            brush.0.radius()
        );
    }
}

fn toggle_fly_camera(keys: Res<Input<KeyCode>>, mut cameras: Query<&mut FlyCamera>) {
    if !keys.just_pressed(KeyCode::Tab) {
        return;
    }
    for mut camera in &mut cameras {
        camera.enabled = !camera.enabled;
        info!("{}", if camera.enabled { "fly mode" } else { "sculpt mode" });
    }
}

fn toggle_wireframe(
    mut commands: Commands,
    keys: Res<Input<KeyCode>>,
    terrain: Option<Res<Terrain>>,
    wireframes: Query<(), With<Wireframe>>,
) {
    let Some(terrain) = terrain else { return };
    if !keys.just_pressed(KeyCode::F) {
        return;
    }

    if wireframes.contains(terrain.entity) {
        commands.entity(terrain.entity).remove::<Wireframe>();
    } else {
        commands.entity(terrain.entity).insert(Wireframe);
    }
}

fn sculpt_terrain(
    mouse: Res<Input<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform, &FlyCamera)>,
    brush: Res<Brush>,
    terrain: Option<ResMut<Terrain>>,
    mut meshes: ResMut<Assets<Mesh>>,
) -> Result<(), SculptError> {
    let Some(mut terrain) = terrain else { return Ok(()) };
    let Ok(window) = windows.get_single() else { return Ok(()) };
    let Ok((camera, camera_transform, fly_camera)) = cameras.get_single() else { return Ok(()) };
    if fly_camera.enabled {
        return Ok(());
    }

    let mut pick = CursorPick {
        ray: window
            .cursor_position()
            .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor)),
        placement: terrain.sculptor.placement(),
    };

    for (button, direction) in [
        (MouseButton::Right, RaiseDirection::Up),
        (MouseButton::Left, RaiseDirection::Down),
    ] {
        if !mouse.pressed(button) {
            continue;
        }
        let Some(mesh) = meshes.get_mut(&terrain.mesh) else { return Ok(()) };

        let outcome = terrain
            .sculptor
            .sculpt(&mut pick, direction, &brush.0, mesh)?;
        if let SculptOutcome::Applied { center, touched } = outcome {
            debug!("{direction:?} at {center:?}, {touched} vertices");
        }
    }

    Ok(())
}
