//! Headless demo driver: walks a subject around a walled courtyard and logs
//! what the camera rig does each simulated second.

use std::path::Path;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rigcam::{
    CameraRig, ColliderWorld, RigError, RigNodes, RigOptions, SceneGraph,
    Transform,
};

const TICK: f32 = 1.0 / 60.0;
const TICKS_PER_REPORT: u32 = 60;
const RUN_SECONDS: u32 = 12;

/// Layer the subject's own body sits on; ignored by the default probe mask.
const SUBJECT_LAYER: u8 = 8;

fn build_scene() -> Result<(SceneGraph, RigNodes), RigError> {
    let mut scene = SceneGraph::new();
    let subject = scene.add_root("player", Transform::IDENTITY);
    let anchor = scene.add_root("camera_rig", Transform::IDENTITY);
    let mount = scene.add_child(
        anchor,
        "camera_mount",
        Transform::from_translation(Vec3::new(0.0, 1.6, 0.0)),
    )?;
    let camera = scene.add_child(
        mount,
        "main_camera",
        Transform::from_translation(Vec3::new(0.0, 0.0, -4.0)),
    )?;
    Ok((
        scene,
        RigNodes {
            subject,
            anchor,
            mount,
            camera,
        },
    ))
}

/// A walled courtyard the subject strolls through.
fn build_world() -> ColliderWorld {
    let mut world = ColliderWorld::new();
    world.add_box(Vec3::new(-10.0, 0.0, -10.5), Vec3::new(10.0, 4.0, -10.0), 0);
    world.add_box(Vec3::new(-10.5, 0.0, -10.0), Vec3::new(-10.0, 4.0, 10.0), 0);
    world.add_box(Vec3::new(10.0, 0.0, -10.0), Vec3::new(10.5, 4.0, 10.0), 0);
    world.add_sphere(Vec3::new(3.0, 1.0, 2.0), 1.0, 1);
    // Stand-in for the subject's own body.
    world.add_sphere(Vec3::new(0.0, 1.0, 0.0), 0.4, SUBJECT_LAYER);
    world
}

/// Subject path: a lap around the courtyard that brushes the back wall.
fn subject_position(t: f32) -> Vec3 {
    let angle = t * 0.5;
    Vec3::new(angle.cos() * 6.0, 0.0, angle.sin() * 6.0 - 2.0)
}

fn load_options(path: Option<&str>) -> Result<RigOptions, RigError> {
    match path {
        Some(path) => RigOptions::load(Path::new(path)),
        None => Ok(RigOptions::default()),
    }
}

fn run(options_path: Option<&str>) -> Result<(), RigError> {
    let options = load_options(options_path)?;
    let (mut scene, nodes) = build_scene()?;
    let mut rig = CameraRig::new(&scene, nodes, options, build_world())?;
    let mut rng = StdRng::seed_from_u64(0x0c0ffee);

    let mut t = 0.0_f32;
    for tick in 0..RUN_SECONDS * TICKS_PER_REPORT {
        t += TICK;
        scene.set_world_position(nodes.subject, subject_position(t))?;

        // Hand-on-mouse jitter plus a slow sweep to the right.
        let look = Vec2::new(
            0.002 + rng.random_range(-0.004..0.004),
            rng.random_range(-0.003..0.003),
        );
        // Hitches: the odd long frame.
        let dt = if rng.random_bool(0.02) { TICK * 4.0 } else { TICK };
        rig.tick(&mut scene, dt, look)?;

        if (tick + 1) % (TICKS_PER_REPORT * 4) == 0 {
            rig.set_xray(!rig.xray());
        }

        if (tick + 1) % TICKS_PER_REPORT == 0 {
            let anchor = scene.world_position(nodes.anchor)?;
            let camera = scene.world_position(nodes.camera)?;
            log::info!(
                "t={t:5.2} anchor=({:6.2}, {:6.2}) pan={:6.1} tilt={:5.1} \
                 offset={:5.2} camera=({:6.2}, {:5.2}, {:6.2}) {:?}",
                anchor.x,
                anchor.z,
                rig.pan(),
                rig.tilt(),
                scene.local(nodes.camera)?.translation.z,
                camera.x,
                camera.y,
                camera.z,
                rig.backoff_state(),
            );
        }
    }
    Ok(())
}

fn write_schema(path: &str) -> Result<(), RigError> {
    std::fs::write(path, RigOptions::json_schema_string()?)?;
    log::info!("wrote options schema to {path}");
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let result = match args.get(1).map(String::as_str) {
        Some("--schema") => match args.get(2) {
            Some(path) => write_schema(path),
            None => {
                log::error!("Usage: rigcam --schema <OUT.json>");
                std::process::exit(1);
            }
        },
        Some("--help" | "-h") => {
            log::info!("Usage: rigcam [OPTIONS.toml] | --schema <OUT.json>");
            return;
        }
        other => run(other),
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
