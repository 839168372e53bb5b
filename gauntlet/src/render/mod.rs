//! Per-frame render loop: mount, ordered update sets, resize handling.

mod hologram;
mod pose;

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::scatter::{ScatterRng, ScatterSettings};
use crate::scene::icons::{setup_icon_field, spawn_loaded_icons, PendingIcons, SkillSet};
use crate::scene::labels::track_skill_labels;
use crate::scene::setup::setup_scene;
use crate::timeline::{gauntlet_timeline, ScrollLayout, ScrubDriver};

pub use hologram::{billboard_icons, idle_cloud_spin, scatter_step, IDLE_SPIN};
pub use pose::{advance_timeline, apply_pose, idle_sway, posed_transforms, scroll_input, Backdrop};

/// Present once the scene found a window to draw into. Every runtime system
/// is gated on it.
#[derive(Resource, Debug)]
pub struct Mounted;

/// Drawable surface size in logical pixels.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

/// Scroll progress to place the page at when mounting.
#[derive(Resource, Clone, Copy, Debug)]
pub struct InitialProgress(pub f32);

/// Update stages, run in this order every frame.
#[derive(SystemSet, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GauntletSet {
    Input,
    Timeline,
    Pose,
    Camera,
    Icons,
    Scatter,
    /// Cloud spin; before billboarding so panels face the camera as drawn.
    Idle,
    Billboard,
}

impl GauntletSet {
    const ALL: [GauntletSet; 8] = [
        GauntletSet::Input,
        GauntletSet::Timeline,
        GauntletSet::Pose,
        GauntletSet::Camera,
        GauntletSet::Icons,
        GauntletSet::Scatter,
        GauntletSet::Idle,
        GauntletSet::Billboard,
    ];
}

/// Mounts the scene on the primary window. Without one (headless runs,
/// tests) this is a silent no-op and nothing else ever runs.
pub fn init_skills_3d(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut layout: ResMut<ScrollLayout>,
    mut scrub: ResMut<ScrubDriver>,
    initial: Option<Res<InitialProgress>>,
) {
    let Ok(window) = windows.get_single() else {
        debug!("no primary window, skills 3d not mounted");
        return;
    };
    let size = SurfaceSize {
        width: window.width(),
        height: window.height(),
    };
    layout.resize(size.height);
    if let Some(initial) = initial {
        let offset = layout.offset_for(initial.0);
        layout.scroll_offset = offset;
        scrub.jump_to(layout.progress());
    }
    commands.insert_resource(size);
    commands.insert_resource(Mounted);
    info!("skills 3d mounted on {}x{} surface", size.width, size.height);
}

/// Applies a new surface size to the camera, the recorded surface and the
/// scroll viewport.
pub fn apply_resize(
    width: f32,
    height: f32,
    projection: &mut Projection,
    surface: &mut SurfaceSize,
    layout: &mut ScrollLayout,
) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    if let Projection::Perspective(perspective) = projection {
        perspective.aspect_ratio = width / height;
    }
    *surface = SurfaceSize { width, height };
    layout.resize(height);
}

pub fn handle_resize(
    mut resized: EventReader<WindowResized>,
    mut cameras: Query<&mut Projection, With<Camera3d>>,
    mut surface: ResMut<SurfaceSize>,
    mut layout: ResMut<ScrollLayout>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    for mut projection in &mut cameras {
        apply_resize(last.width, last.height, &mut projection, &mut surface, &mut layout);
    }
    debug!("surface resized to {}x{}", last.width, last.height);
}

/// Chains the update stages and gates each on `Mounted`.
pub(crate) fn configure_gauntlet_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GauntletSet::Input,
            GauntletSet::Timeline,
            GauntletSet::Pose,
            GauntletSet::Camera,
            GauntletSet::Icons,
            GauntletSet::Scatter,
            GauntletSet::Idle,
            GauntletSet::Billboard,
        )
            .chain(),
    );
    for set in GauntletSet::ALL {
        app.configure_sets(Update, set.run_if(resource_exists::<Mounted>));
    }
}

/// Scene, mount, pose and hologram billboards. Shared by both variants.
pub fn render_plugin(app: &mut App) {
    app.init_resource::<ScrollLayout>()
        .init_resource::<ScrubDriver>()
        .init_resource::<ScatterSettings>()
        .init_resource::<ScatterRng>()
        .init_resource::<SkillSet>()
        .init_resource::<Backdrop>()
        .init_resource::<PendingIcons>()
        .init_resource::<SurfaceSize>()
        .insert_resource(gauntlet_timeline());
    configure_gauntlet_sets(app);

    app.add_systems(
        Startup,
        (
            init_skills_3d,
            (setup_scene, setup_icon_field).run_if(resource_exists::<Mounted>),
        )
            .chain(),
    )
    .add_systems(
        Update,
        (
            handle_resize.in_set(GauntletSet::Input).before(scroll_input),
            apply_pose.in_set(GauntletSet::Pose),
            spawn_loaded_icons.in_set(GauntletSet::Icons),
            (billboard_icons, track_skill_labels)
                .chain()
                .in_set(GauntletSet::Billboard),
            idle_cloud_spin.in_set(GauntletSet::Idle),
        ),
    );
}

/// Scroll-driven firing sequence and icon scatter.
pub fn scroll_plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            scroll_input.in_set(GauntletSet::Input),
            advance_timeline.in_set(GauntletSet::Timeline),
            scatter_step.in_set(GauntletSet::Scatter),
        ),
    );
}
