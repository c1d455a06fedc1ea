// Scene setup: camera, lighting, ground, units and the kaiju
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::PI;

use crate::constants::*;
use crate::types::*;

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Directional light (sun)
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform {
            translation: Vec3::new(0.0, 50.0, 0.0),
            rotation: Quat::from_rotation_x(-PI / 4.0),
            ..default()
        },
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.5, 0.5, 0.6),
        brightness: 300.0,
        affects_lightmapped_meshes: false,
    });

    // RTS camera
    let focus_point = Vec3::ZERO;
    let initial_distance = 40.0;
    let initial_pitch = -0.9;

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 30.0, 25.0).looking_at(focus_point, Vec3::Y),
        RtsCamera {
            focus_point,
            yaw: 0.0,
            pitch: initial_pitch,
            distance: initial_distance,
        },
    ));

    // Ground plane
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(120.0, 120.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.3, 0.25),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));
}

pub fn spawn_army(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = rand::thread_rng();

    let soldier_mesh = meshes.add(Capsule3d::new(0.35, 0.9));
    let tank_mesh = meshes.add(Cuboid::new(1.2, 0.7, 1.6));
    let kaiju_mesh = meshes.add(Capsule3d::new(1.4, 3.0));

    // Soldier grid, jittered so rows don't look stamped
    for row in 0..3 {
        for col in 0..6 {
            let jitter_x: f32 = rng.gen_range(-0.4..0.4);
            let jitter_z: f32 = rng.gen_range(-0.4..0.4);
            let position = Vec3::new(
                -8.0 + col as f32 * 2.0 + jitter_x,
                0.85,
                12.0 + row as f32 * 2.0 + jitter_z,
            );
            // One material instance per unit so highlight tint is per-unit
            let material = materials.add(StandardMaterial {
                base_color: DEFAULT_COLOR,
                ..default()
            });
            commands.spawn((
                UnitBundle::new(UnitKind::Soldier, position),
                Mesh3d(soldier_mesh.clone()),
                MeshMaterial3d(material),
            ));
        }
    }

    // A pair of tanks on each flank
    for (i, x) in [-12.0_f32, -10.0, 10.0, 12.0].into_iter().enumerate() {
        let position = Vec3::new(x, 0.35, 14.0 + (i % 2) as f32 * 2.5);
        let material = materials.add(StandardMaterial {
            base_color: DEFAULT_COLOR,
            ..default()
        });
        commands.spawn((
            UnitBundle::new(UnitKind::Tank, position),
            Mesh3d(tank_mesh.clone()),
            MeshMaterial3d(material),
        ));
    }

    // The kaiju starts across the field from the army
    commands.spawn((
        KaijuBundle::new(PursuitConfig::default(), Vec3::new(0.0, 2.9, -25.0)),
        Mesh3d(kaiju_mesh),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.25, 0.5),
            ..default()
        })),
    ));

    info!("Spawned 18 soldiers, 4 tanks and the kaiju");
}
