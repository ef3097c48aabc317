use glam::{EulerRot, Vec2, Vec3};

use super::backoff::{settle, BackoffState, CollisionBackoff};
use super::pan_tilt::PanTilt;
use super::smooth_damp::SmoothDamp;
use crate::error::RigError;
use crate::options::RigOptions;
use crate::physics::SphereCaster;
use crate::scene::{NodeId, SceneGraph};

/// The four scene nodes a rig drives.
///
/// `mount` must be a child of `anchor` and `camera` a child of `mount`.
/// `subject` may live anywhere in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigNodes {
    /// Tracked entity; only its world position is read.
    pub subject: NodeId,
    /// Follows the subject and carries pan (yaw).
    pub anchor: NodeId,
    /// Carries tilt (pitch); the probe starts here.
    pub mount: NodeId,
    /// Sits on the mount's local Z axis at the back-off distance.
    pub camera: NodeId,
}

/// Third-person camera rig: follow, pan/tilt and collision back-off.
///
/// The driver owns the rig and the [`SceneGraph`] and calls
/// [`follow`](Self::follow) and [`rotate`](Self::rotate) once per tick (or
/// [`tick`](Self::tick) for both). The probe is injected at construction.
#[derive(Debug)]
pub struct CameraRig<P> {
    nodes: RigNodes,
    options: RigOptions,
    probe: P,
    follow: SmoothDamp,
    angles: PanTilt,
    backoff: CollisionBackoff,
    backup_distance: f32,
    xray: bool,
}

impl<P: SphereCaster> CameraRig<P> {
    /// Build a rig over existing scene nodes.
    ///
    /// Pan and tilt start from the anchor's and mount's authored
    /// orientation. Without a configured `backup_distance` the camera's
    /// authored local Z distance is used.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::InvalidOptions`] for unusable options,
    /// [`RigError::UnknownNode`] for foreign node ids and
    /// [`RigError::Hierarchy`] when the nodes are not parented
    /// anchor -> mount -> camera.
    pub fn new(
        scene: &SceneGraph,
        nodes: RigNodes,
        options: RigOptions,
        probe: P,
    ) -> Result<Self, RigError> {
        options.validate()?;
        let _ = scene.local(nodes.subject)?;
        if scene.parent(nodes.mount)? != Some(nodes.anchor) {
            return Err(RigError::Hierarchy(format!(
                "mount {} is not a child of anchor {}",
                nodes.mount, nodes.anchor
            )));
        }
        if scene.parent(nodes.camera)? != Some(nodes.mount) {
            return Err(RigError::Hierarchy(format!(
                "camera {} is not a child of mount {}",
                nodes.camera, nodes.mount
            )));
        }

        let camera_local = scene.local(nodes.camera)?;
        let backup_distance = options
            .collision
            .backup_distance
            .unwrap_or(-camera_local.translation.z.abs());

        let anchor_rotation = scene.world(nodes.anchor)?.rotation;
        let mount_rotation = scene.local(nodes.mount)?.rotation;
        let (yaw, _, _) = anchor_rotation.to_euler(EulerRot::YXZ);
        let (pitch, _, _) = mount_rotation.to_euler(EulerRot::XYZ);
        let angles =
            PanTilt::new(yaw.to_degrees(), pitch.to_degrees(), &options.look);

        log::debug!(
            "camera rig ready: backup distance {backup_distance}, pan {:.1}, \
             tilt {:.1}",
            angles.pan(),
            angles.tilt()
        );

        Ok(Self {
            nodes,
            xray: options.collision.xray,
            options,
            probe,
            follow: SmoothDamp::new(),
            angles,
            backoff: CollisionBackoff::new(),
            backup_distance,
        })
    }

    // -- Accessors --

    /// Mutable access to the injected probe (e.g. to edit its geometry).
    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    /// Current pan in `[0, 360)` degrees.
    #[must_use]
    pub fn pan(&self) -> f32 {
        self.angles.pan()
    }

    /// Current tilt in degrees.
    #[must_use]
    pub fn tilt(&self) -> f32 {
        self.angles.tilt()
    }

    /// Velocity carried by the follow filter.
    #[must_use]
    pub fn follow_velocity(&self) -> Vec3 {
        self.follow.velocity
    }

    /// Camera local Z used when nothing blocks the view.
    #[must_use]
    pub fn backup_distance(&self) -> f32 {
        self.backup_distance
    }

    /// State of the last back-off step.
    #[must_use]
    pub fn backoff_state(&self) -> BackoffState {
        self.backoff.state()
    }

    /// Target computed by the last back-off step.
    #[must_use]
    pub fn backoff_target(&self) -> Option<f32> {
        self.backoff.target()
    }

    /// Whether collision back-off is disabled.
    #[must_use]
    pub fn xray(&self) -> bool {
        self.xray
    }

    /// Enable or disable collision back-off at runtime.
    pub fn set_xray(&mut self, xray: bool) {
        if self.xray != xray {
            log::info!("wall x-ray {}", if xray { "on" } else { "off" });
            self.xray = xray;
        }
    }

    // -- Per-tick operations --

    /// Move the anchor toward the subject, then run collision back-off.
    ///
    /// `dt <= 0` (or non-finite) leaves the anchor and the follow velocity
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] if the rig's nodes were built
    /// against a different scene.
    pub fn follow(
        &mut self,
        scene: &mut SceneGraph,
        dt: f32,
    ) -> Result<(), RigError> {
        if dt.is_finite() && dt > 0.0 {
            let subject = scene.world_position(self.nodes.subject)?;
            let current = scene.world_position(self.nodes.anchor)?;
            let smooth_time = dt / self.options.follow.follow_speed;
            let next = self.follow.step(current, subject, smooth_time, dt);
            scene.set_world_position(self.nodes.anchor, next)?;
        }
        self.back_off(scene, dt)
    }

    /// Apply pointer deltas to pan and tilt and write them to the anchor
    /// (yaw only) and mount (pitch only).
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] if the rig's nodes were built
    /// against a different scene.
    pub fn rotate(
        &mut self,
        scene: &mut SceneGraph,
        dt: f32,
        delta: Vec2,
    ) -> Result<(), RigError> {
        self.angles.apply(&self.options.look, dt, delta);
        scene.set_world_rotation(
            self.nodes.anchor,
            self.angles.yaw_rotation(),
        )?;
        scene.local_mut(self.nodes.mount)?.rotation =
            self.angles.pitch_rotation();
        Ok(())
    }

    /// Probe between mount and camera and blend the camera's local Z
    /// toward the resulting stand-off. No-op while x-ray is on.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] if the rig's nodes were built
    /// against a different scene.
    pub fn back_off(
        &mut self,
        scene: &mut SceneGraph,
        dt: f32,
    ) -> Result<(), RigError> {
        if self.xray {
            self.backoff.bypass();
            return Ok(());
        }

        let mount = scene.world(self.nodes.mount)?;
        let camera_position = scene.world_position(self.nodes.camera)?;
        let target = self.backoff.evaluate(
            &self.probe,
            mount.translation,
            camera_position,
            mount.rotation * Vec3::NEG_Z,
            self.backup_distance,
            &self.options.collision,
        );

        let camera = scene.local_mut(self.nodes.camera)?;
        camera.translation.z = settle(camera.translation.z, target, dt);
        Ok(())
    }

    /// One driver tick: follow (with back-off), then rotate.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`follow`](Self::follow) and
    /// [`rotate`](Self::rotate).
    pub fn tick(
        &mut self,
        scene: &mut SceneGraph,
        dt: f32,
        look_delta: Vec2,
    ) -> Result<(), RigError> {
        self.follow(scene, dt)?;
        self.rotate(scene, dt, look_delta)
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::physics::{ColliderWorld, LayerMask, ProbeError, ProbeHit};
    use crate::scene::Transform;

    const DT: f32 = 1.0 / 60.0;

    type ProbeResult = Result<Option<ProbeHit>, ProbeError>;

    /// Probe answering from a closure, for scripting hits.
    struct FnProbe<F>(F);

    impl<F> SphereCaster for FnProbe<F>
    where
        F: Fn(Vec3, Vec3) -> ProbeResult,
    {
        fn sphere_cast(
            &self,
            origin: Vec3,
            _radius: f32,
            direction: Vec3,
            _max_distance: f32,
            _mask: LayerMask,
        ) -> ProbeResult {
            (self.0)(origin, direction)
        }
    }

    /// Probe that always reports a hit `distance` away from the mount.
    fn hit_at(distance: f32) -> FnProbe<impl Fn(Vec3, Vec3) -> ProbeResult> {
        FnProbe(move |origin: Vec3, dir: Vec3| -> ProbeResult {
            Ok(Some(ProbeHit {
                point: origin + dir * distance,
                distance,
            }))
        })
    }

    fn build_scene() -> (SceneGraph, RigNodes) {
        let mut scene = SceneGraph::new();
        let subject = scene.add_root("subject", Transform::IDENTITY);
        let anchor = scene.add_root("rig", Transform::IDENTITY);
        let mount = scene
            .add_child(
                anchor,
                "mount",
                Transform::from_translation(Vec3::new(0.0, 1.5, 0.0)),
            )
            .unwrap();
        let camera = scene
            .add_child(
                mount,
                "camera",
                Transform::from_translation(Vec3::new(0.0, 0.0, -3.0)),
            )
            .unwrap();
        (
            scene,
            RigNodes {
                subject,
                anchor,
                mount,
                camera,
            },
        )
    }

    fn default_rig<P: SphereCaster>(
        scene: &SceneGraph,
        nodes: RigNodes,
        probe: P,
    ) -> CameraRig<P> {
        CameraRig::new(scene, nodes, RigOptions::default(), probe).unwrap()
    }

    fn camera_z(scene: &SceneGraph, nodes: RigNodes) -> f32 {
        scene.local(nodes.camera).unwrap().translation.z
    }

    #[test]
    fn new_adopts_authored_camera_offset() {
        let (scene, nodes) = build_scene();
        let rig = default_rig(&scene, nodes, ColliderWorld::new());
        assert_eq!(rig.backup_distance(), -3.0);
        assert_eq!(rig.pan(), 0.0);
        assert_eq!(rig.tilt(), 0.0);
        assert!(!rig.xray());

        let mut options = RigOptions::default();
        options.collision.backup_distance = Some(-5.0);
        let rig = CameraRig::new(&scene, nodes, options, ColliderWorld::new())
            .unwrap();
        assert_eq!(rig.backup_distance(), -5.0);
    }

    #[test]
    fn new_adopts_authored_orientation() {
        let (mut scene, nodes) = build_scene();
        scene.local_mut(nodes.anchor).unwrap().rotation =
            Quat::from_rotation_y(90f32.to_radians());
        scene.local_mut(nodes.mount).unwrap().rotation =
            Quat::from_rotation_x(80f32.to_radians());
        let rig = default_rig(&scene, nodes, ColliderWorld::new());
        assert!((rig.pan() - 90.0).abs() < 1e-3, "{}", rig.pan());
        // Clamped into the default tilt range.
        assert_eq!(rig.tilt(), 35.0);
    }

    #[test]
    fn new_rejects_bad_options_and_hierarchy() {
        let (scene, nodes) = build_scene();
        let mut options = RigOptions::default();
        options.look.minimum_tilt = 10.0;
        options.look.maximum_tilt = -10.0;
        assert!(matches!(
            CameraRig::new(&scene, nodes, options, ColliderWorld::new()),
            Err(RigError::InvalidOptions(_))
        ));

        let swapped = RigNodes {
            mount: nodes.camera,
            camera: nodes.mount,
            ..nodes
        };
        let result = CameraRig::new(
            &scene,
            swapped,
            RigOptions::default(),
            ColliderWorld::new(),
        );
        assert!(matches!(result, Err(RigError::Hierarchy(_))));
    }

    #[test]
    fn follow_converges_on_static_subject() {
        let (mut scene, nodes) = build_scene();
        let goal = Vec3::new(6.0, 0.0, -4.0);
        scene.set_world_position(nodes.subject, goal).unwrap();
        let mut rig = default_rig(&scene, nodes, ColliderWorld::new());

        let mut last = f32::INFINITY;
        for _ in 0..600 {
            rig.follow(&mut scene, DT).unwrap();
            let anchor = scene.world_position(nodes.anchor).unwrap();
            let remaining = anchor.distance(goal);
            assert!(remaining <= last + 1e-5);
            last = remaining;
        }
        assert!(last < 1e-3, "anchor still {last} away");
        assert!(rig.follow_velocity().length() < 1e-2);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let (mut scene, nodes) = build_scene();
        scene
            .set_world_position(nodes.subject, Vec3::new(3.0, 0.0, 0.0))
            .unwrap();
        let mut rig = default_rig(&scene, nodes, hit_at(1.0));
        rig.tick(&mut scene, DT, Vec2::new(0.5, 0.5)).unwrap();

        let anchor = scene.world(nodes.anchor).unwrap();
        let z = camera_z(&scene, nodes);
        let velocity = rig.follow_velocity();
        let (pan, tilt) = (rig.pan(), rig.tilt());

        rig.tick(&mut scene, 0.0, Vec2::new(3.0, -3.0)).unwrap();

        assert_eq!(scene.world(nodes.anchor).unwrap(), anchor);
        assert_eq!(camera_z(&scene, nodes), z);
        assert_eq!(rig.follow_velocity(), velocity);
        assert_eq!((rig.pan(), rig.tilt()), (pan, tilt));
    }

    #[test]
    fn rotate_splits_yaw_and_pitch_across_nodes() {
        let (mut scene, nodes) = build_scene();
        let mut rig = default_rig(&scene, nodes, ColliderWorld::new());
        // 1 * 0.1 / 0.02 = 5 degrees pan, 1 * 0.03 / 0.02 = 1.5 degrees up.
        rig.rotate(&mut scene, 0.02, Vec2::new(1.0, 1.0)).unwrap();

        let anchor = scene.world(nodes.anchor).unwrap().rotation;
        let mount = scene.local(nodes.mount).unwrap().rotation;
        let expected_yaw = Quat::from_rotation_y(5f32.to_radians());
        let expected_pitch = Quat::from_rotation_x((-1.5f32).to_radians());
        assert!(anchor.angle_between(expected_yaw) < 1e-4);
        assert!(mount.angle_between(expected_pitch) < 1e-4);

        // Pure yaw on the anchor: its up axis stays vertical.
        assert!((anchor * Vec3::Y - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn rotation_invariants_hold_under_random_input() {
        let (mut scene, nodes) = build_scene();
        let mut rig = default_rig(&scene, nodes, ColliderWorld::new());
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..5_000 {
            let dt = rng.random_range(1e-6..0.1);
            let delta = Vec2::new(
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
            );
            rig.rotate(&mut scene, dt, delta).unwrap();
            assert!((0.0..360.0).contains(&rig.pan()));
            assert!((-35.0..=35.0).contains(&rig.tilt()));
        }
    }

    #[test]
    fn hit_pulls_camera_to_margin() {
        let (mut scene, nodes) = build_scene();
        let mut options = RigOptions::default();
        options.collision.collision_margin = 0.2;
        options.collision.minimum_collision_offset = 0.3;
        let mut rig =
            CameraRig::new(&scene, nodes, options, hit_at(1.0)).unwrap();

        rig.back_off(&mut scene, 0.05).unwrap();
        assert_eq!(rig.backoff_state(), BackoffState::Blocked);
        let target = rig.backoff_target().unwrap();
        assert!((target + 0.8).abs() < 1e-5, "{target}");
        // First step covers a quarter of the way from -3.0.
        assert!((camera_z(&scene, nodes) + 2.45).abs() < 1e-5);

        for _ in 0..100 {
            rig.back_off(&mut scene, 0.05).unwrap();
        }
        assert!((camera_z(&scene, nodes) + 0.8).abs() < 1e-4);
    }

    #[test]
    fn back_off_only_moves_camera_along_local_z() {
        let (mut scene, nodes) = build_scene();
        scene.local_mut(nodes.camera).unwrap().translation =
            Vec3::new(0.4, 0.3, -3.0);
        let mut options = RigOptions::default();
        options.collision.collision_margin = 0.2;
        options.collision.minimum_collision_offset = 0.3;
        let mut rig =
            CameraRig::new(&scene, nodes, options, hit_at(1.0)).unwrap();

        for _ in 0..200 {
            rig.follow(&mut scene, DT).unwrap();
            let local = scene.local(nodes.camera).unwrap().translation;
            assert_eq!((local.x, local.y), (0.4, 0.3));
        }
        assert_eq!(rig.backoff_state(), BackoffState::Blocked);
        assert!((camera_z(&scene, nodes) + 0.8).abs() < 1e-4);
    }

    #[test]
    fn hit_inside_margin_clamps_to_minimum() {
        let (mut scene, nodes) = build_scene();
        let mut options = RigOptions::default();
        options.collision.collision_margin = 0.2;
        options.collision.minimum_collision_offset = 0.3;
        let mut rig =
            CameraRig::new(&scene, nodes, options, hit_at(0.1)).unwrap();
        for _ in 0..50 {
            rig.follow(&mut scene, DT).unwrap();
            let target = rig.backoff_target().unwrap();
            assert!(target <= 0.0);
            assert!(target.abs() >= 0.3);
            assert!(camera_z(&scene, nodes) < 0.0);
        }
        assert_eq!(rig.backoff_target(), Some(-0.3));
    }

    #[test]
    fn xray_never_touches_the_camera() {
        let (mut scene, nodes) = build_scene();
        let calls = std::cell::Cell::new(0_u32);
        let probe = FnProbe(|origin: Vec3, dir: Vec3| -> ProbeResult {
            calls.set(calls.get() + 1);
            Ok(Some(ProbeHit {
                point: origin + dir * 0.5,
                distance: 0.5,
            }))
        });
        let mut options = RigOptions::default();
        options.collision.xray = true;
        let mut rig = CameraRig::new(&scene, nodes, options, probe).unwrap();

        for i in 0..200 {
            let dt = if i % 2 == 0 { DT } else { 0.5 };
            rig.tick(&mut scene, dt, Vec2::new(0.3, -0.1)).unwrap();
            assert_eq!(camera_z(&scene, nodes), -3.0);
        }
        assert_eq!(rig.backoff_state(), BackoffState::XRay);
        assert_eq!(rig.backoff_target(), None);

        rig.set_xray(false);
        rig.tick(&mut scene, DT, Vec2::ZERO).unwrap();
        assert_eq!(rig.backoff_state(), BackoffState::Blocked);
        assert!(camera_z(&scene, nodes) > -3.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn probe_failure_is_treated_as_clear() {
        let (mut scene, nodes) = build_scene();
        let probe = FnProbe(|_: Vec3, _: Vec3| -> ProbeResult {
            Err(ProbeError::Unavailable("no physics".to_owned()))
        });
        let mut rig = default_rig(&scene, nodes, probe);
        for _ in 0..10 {
            rig.tick(&mut scene, DT, Vec2::ZERO).unwrap();
        }
        assert_eq!(rig.backoff_state(), BackoffState::Clear);
        assert_eq!(rig.backoff_target(), Some(-3.0));
        assert_eq!(camera_z(&scene, nodes), -3.0);
    }

    #[test]
    fn wall_behind_rig_pulls_camera_in() {
        let (mut scene, nodes) = build_scene();
        let mut world = ColliderWorld::new();
        // Wall with its face at z = -2, behind the mount.
        world.add_box(
            Vec3::new(-5.0, -5.0, -2.5),
            Vec3::new(5.0, 5.0, -2.0),
            0,
        );
        // Subject body on an ignored layer, between mount and camera.
        world.add_sphere(Vec3::new(0.0, 1.5, -1.0), 0.3, 8);
        let mut rig = default_rig(&scene, nodes, world);

        for _ in 0..120 {
            rig.tick(&mut scene, DT, Vec2::ZERO).unwrap();
        }
        assert_eq!(rig.backoff_state(), BackoffState::Blocked);
        // Contact at 2.0 from the mount minus the 0.2 margin.
        assert!((camera_z(&scene, nodes) + 1.8).abs() < 1e-3);

        rig.probe_mut().clear();
        for _ in 0..120 {
            rig.tick(&mut scene, DT, Vec2::ZERO).unwrap();
        }
        assert_eq!(rig.backoff_state(), BackoffState::Clear);
        assert!((camera_z(&scene, nodes) + 3.0).abs() < 1e-3);
    }
}
