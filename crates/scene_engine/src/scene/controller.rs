//! Time-driven controllers attached to spatials
//!
//! A controller runs at the start of every update pass of the spatial it is
//! attached to, before the world transform is refreshed. Controllers are not
//! themselves controllable: only spatials own controllers.

use std::fmt;

use crate::foundation::math::{utils, Point3, Vec3};
use crate::scene::geometry::VertexBuffer;
use crate::scene::transform::Transform;
use crate::scene::visual::Visual;

/// How application time outside `[min_time, max_time]` is mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatType {
    /// Clamp to the interval ends
    #[default]
    Clamp,
    /// Jump back to `min_time` after reaching `max_time`
    Wrap,
    /// Ping-pong between the interval ends
    Cycle,
}

/// Timing parameters shared by every controller
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerTiming {
    /// Out-of-range handling
    pub repeat: RepeatType,
    /// Interval start in controller time
    pub min_time: f64,
    /// Interval end in controller time
    pub max_time: f64,
    /// Offset added after scaling application time
    pub phase: f64,
    /// Scale applied to application time
    pub frequency: f64,
    /// Inactive controllers are skipped
    pub active: bool,
}

impl Default for ControllerTiming {
    fn default() -> Self {
        Self {
            repeat: RepeatType::Clamp,
            min_time: 0.0,
            max_time: 0.0,
            phase: 0.0,
            frequency: 1.0,
            active: true,
        }
    }
}

impl ControllerTiming {
    /// Timing over `[min_time, max_time]` with the given repeat mode
    pub fn new(repeat: RepeatType, min_time: f64, max_time: f64) -> Self {
        Self {
            repeat,
            min_time,
            max_time,
            ..Self::default()
        }
    }

    /// Map application time into controller time
    pub fn control_time(&self, app_time: f64) -> f64 {
        let time = self.frequency * app_time + self.phase;

        if self.repeat == RepeatType::Clamp {
            return time.clamp(self.min_time, self.max_time.max(self.min_time));
        }

        let range = self.max_time - self.min_time;
        if range <= 0.0 {
            return self.min_time;
        }

        let multiples = (time - self.min_time) / range;
        let whole = multiples.floor();
        let frac = multiples - whole;
        match self.repeat {
            RepeatType::Cycle if whole.rem_euclid(2.0) >= 1.0 => self.max_time - frac * range,
            _ => self.min_time + frac * range,
        }
    }
}

/// The parts of a spatial a controller may mutate
pub struct ControlledTarget<'a> {
    local: &'a mut Transform,
    visual: Option<&'a mut Visual>,
    geometry_dirty: bool,
}

impl<'a> ControlledTarget<'a> {
    pub(crate) fn new(local: &'a mut Transform, visual: Option<&'a mut Visual>) -> Self {
        Self {
            local,
            visual,
            geometry_dirty: false,
        }
    }

    /// Local transform of the controlled spatial
    pub fn local_transform(&self) -> &Transform {
        &*self.local
    }

    /// Mutable local transform of the controlled spatial
    pub fn local_transform_mut(&mut self) -> &mut Transform {
        &mut *self.local
    }

    /// Vertex data of a controlled visual, `None` for nodes.
    ///
    /// Borrowing the vertices marks the geometry as modified; the model bound
    /// is recomputed once all controllers have run.
    pub fn vertices_mut(&mut self) -> Option<&mut VertexBuffer> {
        let visual = self.visual.as_deref_mut()?;
        self.geometry_dirty = true;
        Some(visual.vertices_mut_unbounded())
    }

    /// Read-only vertex data of a controlled visual
    pub fn vertices(&self) -> Option<&VertexBuffer> {
        self.visual.as_deref().map(Visual::vertices)
    }

    /// Apply deferred geometry bookkeeping
    pub(crate) fn finish(self) {
        if self.geometry_dirty {
            if let Some(visual) = self.visual {
                visual.update_model_bound();
            }
        }
    }
}

/// Time-driven mutator of a spatial
pub trait Controller: fmt::Debug {
    /// Timing parameters
    fn timing(&self) -> &ControllerTiming;

    /// Mutable timing parameters
    fn timing_mut(&mut self) -> &mut ControllerTiming;

    /// Advance to `app_time`; returns true when the target changed
    fn update(&mut self, app_time: f64, target: &mut ControlledTarget<'_>) -> bool;

    /// Whether the controller runs during updates
    fn is_active(&self) -> bool {
        self.timing().active
    }

    /// Enable or disable the controller
    fn set_active(&mut self, active: bool) {
        self.timing_mut().active = active;
    }
}

/// Spins the local rotation about a fixed axis
#[derive(Debug, Clone)]
pub struct SpinController {
    timing: ControllerTiming,
    axis: Vec3,
    angular_speed: f32,
}

impl SpinController {
    /// Spin about `axis` at `angular_speed` radians per second
    pub fn new(axis: Vec3, angular_speed: f32) -> Self {
        let period = if angular_speed == 0.0 {
            0.0
        } else {
            f64::from(std::f32::consts::TAU / angular_speed.abs())
        };
        Self {
            timing: ControllerTiming::new(RepeatType::Wrap, 0.0, period),
            axis,
            angular_speed,
        }
    }

    /// Rotation angle at a controller time
    pub fn angle_at(&self, control_time: f64) -> f32 {
        self.angular_speed * control_time as f32
    }
}

impl Controller for SpinController {
    fn timing(&self) -> &ControllerTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut ControllerTiming {
        &mut self.timing
    }

    fn update(&mut self, app_time: f64, target: &mut ControlledTarget<'_>) -> bool {
        let angle = self.angle_at(self.timing.control_time(app_time));
        let rotate = utils::rotation_about_axis(&self.axis, angle);
        let local = target.local_transform_mut();
        if local.is_rs_matrix() && *local.rotate() == rotate {
            return false;
        }
        local.set_rotate(rotate);
        true
    }
}

/// Moves the local translation between two positions over the timing interval
#[derive(Debug, Clone)]
pub struct TranslationController {
    timing: ControllerTiming,
    from: Vec3,
    to: Vec3,
}

impl TranslationController {
    /// Travel from `from` to `to` while controller time runs over `timing`
    pub fn new(from: Vec3, to: Vec3, timing: ControllerTiming) -> Self {
        Self { timing, from, to }
    }

    /// Interpolated position at a controller time
    pub fn position_at(&self, control_time: f64) -> Vec3 {
        let range = self.timing.max_time - self.timing.min_time;
        let s = if range > 0.0 {
            ((control_time - self.timing.min_time) / range).clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        self.from.lerp(&self.to, s)
    }
}

impl Controller for TranslationController {
    fn timing(&self) -> &ControllerTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut ControllerTiming {
        &mut self.timing
    }

    fn update(&mut self, app_time: f64, target: &mut ControlledTarget<'_>) -> bool {
        let position = self.position_at(self.timing.control_time(app_time));
        let local = target.local_transform_mut();
        if *local.translate() == position {
            return false;
        }
        local.set_translate(position);
        true
    }
}

/// Displaces visual vertices along Y with a travelling sine wave
#[derive(Debug, Clone)]
pub struct WaveController {
    timing: ControllerTiming,
    amplitude: f32,
    wave_number: f32,
    angular_speed: f32,
    rest_positions: Option<Vec<Point3>>,
}

impl WaveController {
    /// Wave of the given amplitude, spatial frequency along X and speed
    pub fn new(amplitude: f32, wave_number: f32, angular_speed: f32) -> Self {
        Self {
            timing: ControllerTiming::new(RepeatType::Clamp, 0.0, f64::MAX),
            amplitude,
            wave_number,
            angular_speed,
            rest_positions: None,
        }
    }
}

impl Controller for WaveController {
    fn timing(&self) -> &ControllerTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut ControllerTiming {
        &mut self.timing
    }

    fn update(&mut self, app_time: f64, target: &mut ControlledTarget<'_>) -> bool {
        let time = self.timing.control_time(app_time) as f32;
        let Some(vertices) = target.vertices_mut() else {
            return false;
        };

        // Replaced geometry with a different vertex count gets new rest positions.
        let vertex_count = vertices.vertex_count();
        if !matches!(&self.rest_positions, Some(rest) if rest.len() == vertex_count) {
            self.rest_positions = Some(vertices.positions().collect());
        }
        let Some(rest) = self.rest_positions.as_ref() else {
            return false;
        };

        for (i, p) in rest.iter().enumerate() {
            let phase = self.wave_number * p.x + self.angular_speed * time;
            vertices.set_position(i, Point3::new(p.x, p.y + self.amplitude * phase.sin(), p.z));
        }
        true
    }
}
