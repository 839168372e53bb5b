//! Virtual page scroll → normalized progress, and the scrub that chases it.

use bevy::input::mouse::MouseScrollUnit;
use bevy::prelude::*;

use crate::timeline::easing::Easing;
use crate::timeline::track::unit_progress;

/// Pixels scrolled per wheel line.
pub const LINE_HEIGHT_PX: f32 = 40.0;
/// Seconds the scrub takes to catch up with a new scroll target.
pub const SCRUB_SECONDS: f32 = 0.6;

/// The page the gauntlet container lives on. Lengths other than the
/// viewport height and scroll offset are in viewport heights, so the
/// layout follows window resizes.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct ScrollLayout {
    pub viewport_height: f32,
    pub container_top: f32,
    pub container_height: f32,
    pub page_height: f32,
    pub scroll_offset: f32,
}

impl Default for ScrollLayout {
    fn default() -> Self {
        Self {
            viewport_height: 720.0,
            container_top: 1.0,
            container_height: 1.5,
            page_height: 3.5,
            scroll_offset: 0.0,
        }
    }
}

impl ScrollLayout {
    fn max_offset(&self) -> f32 {
        ((self.page_height - 1.0) * self.viewport_height).max(0.0)
    }

    /// Scrolls by `delta` pixels (positive = down the page).
    pub fn scroll_by(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, self.max_offset());
    }

    /// Applies one wheel event. Wheel-up (`y > 0`) moves back up the page.
    pub fn scroll_wheel(&mut self, unit: MouseScrollUnit, y: f32) {
        let pixels = match unit {
            MouseScrollUnit::Line => y * LINE_HEIGHT_PX,
            MouseScrollUnit::Pixel => y,
        };
        self.scroll_by(-pixels);
    }

    /// Keeps the same relative page position across a viewport change.
    pub fn resize(&mut self, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let relative = self.scroll_offset / self.viewport_height.max(1.0);
        self.viewport_height = viewport_height;
        self.scroll_offset = (relative * viewport_height).clamp(0.0, self.max_offset());
    }

    /// Container top edge in viewport pixels (0 = top of the window).
    pub fn container_top_on_screen(&self) -> f32 {
        self.container_top * self.viewport_height - self.scroll_offset
    }

    /// 0 until the container's top reaches the bottom of the viewport, 1
    /// once its bottom has passed the top, linear in between.
    pub fn progress(&self) -> f32 {
        let vh = self.viewport_height;
        let travel = vh + self.container_height * vh;
        if travel <= 0.0 {
            return 0.0;
        }
        ((vh - self.container_top_on_screen()) / travel).clamp(0.0, 1.0)
    }

    /// Scroll offset that yields `progress`.
    pub fn offset_for(&self, progress: f32) -> f32 {
        let vh = self.viewport_height;
        let travel = vh + self.container_height * vh;
        let top = vh - unit_progress(progress) * travel;
        (self.container_top * vh - top).clamp(0.0, self.max_offset())
    }
}

/// Eases the played progress toward the scroll target. Each new target
/// restarts the tween from wherever the playhead currently is.
#[derive(Resource, Clone, Debug)]
pub struct ScrubDriver {
    from: f32,
    target: f32,
    current: f32,
    elapsed: f32,
    duration: f32,
}

impl Default for ScrubDriver {
    fn default() -> Self {
        Self::new(SCRUB_SECONDS)
    }
}

impl ScrubDriver {
    pub fn new(duration: f32) -> Self {
        Self {
            from: 0.0,
            target: 0.0,
            current: 0.0,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn set_target(&mut self, target: f32) {
        let target = unit_progress(target);
        if target == self.target {
            return;
        }
        self.from = self.current;
        self.target = target;
        self.elapsed = 0.0;
    }

    /// Places the playhead on `progress` immediately.
    pub fn jump_to(&mut self, progress: f32) {
        let progress = unit_progress(progress);
        self.from = progress;
        self.target = progress;
        self.current = progress;
        self.elapsed = self.duration;
    }

    pub fn tick(&mut self, dt: f32) -> f32 {
        if self.is_settled() {
            return self.current;
        }
        self.elapsed += dt.max(0.0);
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };
        if t >= 1.0 {
            self.current = self.target;
        } else {
            let eased = Easing::QuadOut.apply(t);
            self.current = self.from + (self.target - self.from) * eased;
        }
        self.current
    }
}
