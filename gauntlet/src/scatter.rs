//! Icon scatter: outward explosion past the fire threshold, low-pass settle
//! back home below it, and per-frame opacity flicker.

use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::timeline::FIRE_AT;

/// Tunable scatter constants. Only their ratios matter visually.
#[derive(Resource, Clone, Debug)]
pub struct ScatterSettings {
    /// Progress at which icons start flying out.
    pub threshold: f32,
    /// Progress span over which the explosion completes.
    pub window: f32,
    /// Final travel distance along the velocity direction.
    pub distance: f32,
    /// Extra scale gained by the end of the explosion.
    pub growth: f32,
    /// Explosion fraction after which scale and opacity start changing.
    pub fade_after: f32,
    /// Weight of the camera direction mixed into each velocity.
    pub forward_bias: f32,
    /// Maximum per-axis spin in radians per frame.
    pub spin: f32,
    /// Per-frame low-pass factor toward the rest state.
    pub settle: f32,
    pub settle_epsilon: f32,
    pub rest_opacity: f32,
    /// Half-width of the per-frame opacity jitter.
    pub flicker: f32,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            threshold: FIRE_AT,
            window: 0.20,
            distance: 60.0,
            growth: 2.0,
            fade_after: 0.1,
            forward_bias: 0.5,
            spin: 0.02,
            settle: 0.1,
            settle_epsilon: 1e-3,
            rest_opacity: 0.85,
            flicker: 0.05,
        }
    }
}

/// Direction and spin fixed for one scatter episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scatter {
    pub velocity: Vec3,
    pub spin: Vec3,
}

/// Animated state of one hologram icon, kept outside the render entity.
#[derive(Clone, Debug, PartialEq)]
pub struct IconMotion {
    pub home: Vec3,
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
    /// Accumulated spin angles (radians) for the current episode.
    pub tumble: Vec3,
    pub scatter: Option<Scatter>,
}

impl IconMotion {
    pub fn at_rest(home: Vec3, settings: &ScatterSettings) -> Self {
        Self {
            home,
            position: home,
            scale: 1.0,
            opacity: settings.rest_opacity,
            tumble: Vec3::ZERO,
            scatter: None,
        }
    }

    pub fn is_scattering(&self) -> bool {
        self.scatter.is_some()
    }

    pub fn displacement(&self) -> f32 {
        self.position.distance(self.home)
    }

    /// Advances one frame at `progress`. `toward_camera` is the unit
    /// direction to the camera in the icon's parent space.
    pub fn step(
        &mut self,
        progress: f32,
        toward_camera: Vec3,
        settings: &ScatterSettings,
        rng: &mut impl Rng,
    ) {
        if progress >= settings.threshold {
            self.explode(progress, toward_camera, settings, rng);
        } else {
            self.settle(settings);
        }
    }

    fn explode(
        &mut self,
        progress: f32,
        toward_camera: Vec3,
        settings: &ScatterSettings,
        rng: &mut impl Rng,
    ) {
        let home = self.home;
        let scatter = *self
            .scatter
            .get_or_insert_with(|| launch(home, toward_camera, settings, rng));

        let t = ((progress - settings.threshold) / settings.window).clamp(0.0, 1.0);
        let dist = settings.distance * (1.0 - (1.0 - t) * (1.0 - t));
        self.position = self.home + scatter.velocity * dist;
        self.tumble += scatter.spin;
        if t > settings.fade_after {
            self.scale = 1.0 + settings.growth * t;
            self.opacity = 1.0 - t;
        }
    }

    fn settle(&mut self, settings: &ScatterSettings) {
        let k = settings.settle;
        self.position = self.position.lerp(self.home, k);
        self.scale += (1.0 - self.scale) * k;
        self.opacity += (settings.rest_opacity - self.opacity) * k;
        self.tumble = self.tumble.lerp(Vec3::ZERO, k);

        let eps = settings.settle_epsilon;
        let converged = self.position.distance(self.home) < eps
            && (self.scale - 1.0).abs() < eps
            && (self.opacity - settings.rest_opacity).abs() < eps;
        if converged {
            *self = Self::at_rest(self.home, settings);
        }
    }
}

fn launch(home: Vec3, toward_camera: Vec3, settings: &ScatterSettings, rng: &mut impl Rng) -> Scatter {
    let outward = home.normalize_or(Vec3::Y);
    let velocity = (outward + toward_camera * settings.forward_bias).normalize_or(outward);
    let spin = Vec3::new(
        rng.gen_range(-0.5..0.5),
        rng.gen_range(-0.5..0.5),
        rng.gen_range(-0.5..0.5),
    ) * settings.spin;
    Scatter { velocity, spin }
}

/// Rendered opacity for one frame: `opacity` plus uniform jitter.
pub fn flicker(opacity: f32, amplitude: f32, rng: &mut impl Rng) -> f32 {
    if amplitude <= 0.0 {
        return opacity.clamp(0.0, 1.0);
    }
    (opacity + rng.gen_range(-amplitude..amplitude)).clamp(0.0, 1.0)
}

/// Scatter state of every icon, indexed like the skill list.
#[derive(Resource, Clone, Debug, Default)]
pub struct IconField {
    pub motions: Vec<IconMotion>,
}

impl IconField {
    pub fn new(homes: &[Vec3], settings: &ScatterSettings) -> Self {
        Self {
            motions: homes
                .iter()
                .map(|home| IconMotion::at_rest(*home, settings))
                .collect(),
        }
    }

    pub fn step(
        &mut self,
        progress: f32,
        toward_camera: Vec3,
        settings: &ScatterSettings,
        rng: &mut impl Rng,
    ) {
        for motion in &mut self.motions {
            motion.step(progress, toward_camera, settings, rng);
        }
    }

    pub fn scattered(&self) -> usize {
        self.motions.iter().filter(|m| m.is_scattering()).count()
    }
}

/// Random source for spin and flicker.
#[derive(Resource)]
pub struct ScatterRng(pub SmallRng);

impl ScatterRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_entropy()),
        }
    }
}

impl Default for ScatterRng {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::icons::home_positions;

    fn field() -> (IconField, ScatterSettings, SmallRng) {
        let settings = ScatterSettings::default();
        let homes = home_positions(9, 4.5, 0.5);
        (
            IconField::new(&homes, &settings),
            settings,
            SmallRng::seed_from_u64(7),
        )
    }

    #[test]
    fn just_below_threshold_nothing_moves() {
        let (mut field, settings, mut rng) = field();
        field.step(0.449999, Vec3::Z, &settings, &mut rng);
        for motion in &field.motions {
            assert_eq!(motion.displacement(), 0.0);
            assert!(motion.scatter.is_none());
        }
    }

    #[test]
    fn threshold_frame_assigns_velocity_without_moving() {
        let (mut field, settings, mut rng) = field();
        field.step(0.45, Vec3::Z, &settings, &mut rng);
        assert_eq!(field.scattered(), 9);
        for motion in &field.motions {
            let scatter = motion.scatter.expect("velocity assigned");
            assert!((scatter.velocity.length() - 1.0).abs() < 1e-5);
            assert!(motion.displacement() < 1e-5);
            assert!(scatter.spin.abs().max_element() <= settings.spin * 0.5);
        }
    }

    #[test]
    fn velocity_leans_toward_the_camera() {
        let (mut field, settings, mut rng) = field();
        field.step(0.45, Vec3::Z, &settings, &mut rng);
        for motion in &field.motions {
            let outward = motion.home.normalize();
            let velocity = motion.scatter.unwrap().velocity;
            assert!(velocity.z >= outward.z - 1e-5);
        }
    }

    #[test]
    fn velocity_is_fixed_for_the_episode() {
        let (mut field, settings, mut rng) = field();
        field.step(0.45, Vec3::Z, &settings, &mut rng);
        let first: Vec<Scatter> = field.motions.iter().filter_map(|m| m.scatter).collect();
        field.step(0.5, Vec3::X, &settings, &mut rng);
        field.step(0.6, -Vec3::Z, &settings, &mut rng);
        let later: Vec<Scatter> = field.motions.iter().filter_map(|m| m.scatter).collect();
        assert_eq!(first, later);
    }

    #[test]
    fn mid_explosion_icons_are_out_bigger_and_fainter() {
        let (mut field, settings, mut rng) = field();
        field.step(0.45, Vec3::Z, &settings, &mut rng);
        field.step(0.55, Vec3::Z, &settings, &mut rng);
        for motion in &field.motions {
            // clampedT = 0.5 → 60 · (1 − 0.25)
            assert!((motion.displacement() - 45.0).abs() < 1e-3);
            assert!((motion.scale - 2.0).abs() < 1e-5);
            assert!((motion.opacity - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn spin_accumulates_every_frame() {
        let (mut field, settings, mut rng) = field();
        for _ in 0..10 {
            field.step(0.5, Vec3::Z, &settings, &mut rng);
        }
        for motion in &field.motions {
            let spin = motion.scatter.unwrap().spin;
            assert!(motion.tumble.abs_diff_eq(spin * 10.0, 1e-5));
        }
    }

    #[test]
    fn scale_and_opacity_hold_early_in_the_explosion() {
        let (mut field, settings, mut rng) = field();
        field.step(0.46, Vec3::Z, &settings, &mut rng);
        for motion in &field.motions {
            assert_eq!(motion.scale, 1.0);
            assert_eq!(motion.opacity, settings.rest_opacity);
            assert!(motion.displacement() > 0.0);
        }
    }

    #[test]
    fn round_trip_settles_home_and_clears_state() {
        let (mut field, settings, mut rng) = field();
        let start = field.clone();
        for progress in [0.0, 0.3, 0.45, 0.5, 0.6] {
            field.step(progress, Vec3::Z, &settings, &mut rng);
        }
        assert!(field.motions.iter().all(|m| m.displacement() > 1.0));

        let mut frames = 0;
        while field.scattered() > 0 {
            field.step(0.0, Vec3::Z, &settings, &mut rng);
            frames += 1;
            assert!(frames < 1_000, "icons never settled");
        }
        for (motion, original) in field.motions.iter().zip(&start.motions) {
            assert!(motion.position.distance(original.home) < 1e-4);
            assert_eq!(motion.scale, 1.0);
            assert_eq!(motion.opacity, settings.rest_opacity);
        }
    }

    #[test]
    fn new_episode_draws_fresh_spin() {
        let (mut field, settings, mut rng) = field();
        field.step(0.5, Vec3::Z, &settings, &mut rng);
        let first = field.motions[0].scatter.unwrap().spin;
        while field.scattered() > 0 {
            field.step(0.0, Vec3::Z, &settings, &mut rng);
        }
        field.step(0.5, Vec3::Z, &settings, &mut rng);
        assert_ne!(field.motions[0].scatter.unwrap().spin, first);
    }

    #[test]
    fn flicker_stays_in_unit_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let value = flicker(0.98, 0.05, &mut rng);
            assert!((0.0..=1.0).contains(&value));
            assert!(value >= 0.93 - 1e-6);
        }
        assert_eq!(flicker(1.4, 0.0, &mut rng), 1.0);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = ScatterRng::new(Some(42));
        let mut b = ScatterRng::new(Some(42));
        assert_eq!(a.0.gen::<u32>(), b.0.gen::<u32>());
    }
}
