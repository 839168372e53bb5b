//! Capture mode: wait for the hologram textures to settle, save one frame, exit.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};

use crate::render::Mounted;
use crate::scene::icons::PendingIcons;

/// Frames to wait after every icon resolved, so the pose and billboards
/// have been applied at least once.
const SETTLE_FRAMES: u32 = 10;

#[derive(Resource, Debug)]
pub struct ScreenshotMode {
    pub path: PathBuf,
    pub frames_remaining: u32,
    pub captured: bool,
}

impl ScreenshotMode {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            frames_remaining: SETTLE_FRAMES,
            captured: false,
        }
    }

    /// Counts down one frame. True when the capture should happen now.
    pub fn tick(&mut self, icons_pending: bool) -> bool {
        if self.captured {
            return false;
        }
        if icons_pending {
            self.frames_remaining = SETTLE_FRAMES;
            return false;
        }
        if self.frames_remaining > 0 {
            self.frames_remaining -= 1;
            return false;
        }
        self.captured = true;
        true
    }
}

fn capture_system(
    mut commands: Commands,
    mut mode: ResMut<ScreenshotMode>,
    pending: Option<Res<PendingIcons>>,
    mut exit: EventWriter<AppExit>,
) {
    if mode.captured {
        info!("screenshot written to {:?}", mode.path);
        exit.send(AppExit::Success);
        return;
    }
    let icons_pending = pending.is_some_and(|p| !p.loads.is_empty());
    if mode.tick(icons_pending) {
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(mode.path.clone()));
    }
}

pub fn screenshot_plugin(app: &mut App) {
    app.add_systems(Last, capture_system.run_if(resource_exists::<Mounted>));
}
