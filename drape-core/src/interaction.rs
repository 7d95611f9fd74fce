//! Per-frame interaction handed to the solver: at most one grabbed vertex and
//! a rigid transform the rest pose is carried by.
use drape_core_cpu::Grab;
use drape_model::VertexIndex;
use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

pub trait InteractionSource {
    fn grab(&self) -> Option<Grab>;
    fn transform(&self) -> Isometry3<f32>;
}

/// Interaction given as plain values; the default grabs nothing and leaves the rest pose in place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInteraction {
    pub grab: Option<Grab>,
    pub transform: Isometry3<f32>,
}

impl Default for FrameInteraction {
    fn default() -> Self {
        Self {
            grab: None,
            transform: Isometry3::identity(),
        }
    }
}

impl InteractionSource for FrameInteraction {
    fn grab(&self) -> Option<Grab> {
        self.grab
    }

    fn transform(&self) -> Isometry3<f32> {
        self.transform
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Slerp factor toward the pulled orientation while dragging
    pub follow: f32,
    /// Slerp factor back to rest after release
    pub release: f32,
    /// Added to the grabbed vertex's polar angle to cap the rotation
    pub normal_margin: f32,
    /// Radians of rotation per unit of inward pull
    pub pull_gain: f32,
}

impl DragConfig {
    pub const DEFAULT: Self = Self {
        follow: 0.1,
        release: 0.05,
        normal_margin: 0.1,
        pull_gain: 2.0,
    };
}

impl Default for DragConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    vertex: VertexIndex,
    rest: Vector3<f32>,
    start: Vector3<f32>,
    point: Vector3<f32>,
}

/// Pointer drag on the surface.
///
/// The grabbed vertex follows the drag point. Pulling it inward, toward the
/// z axis, also turns the whole surface about `start × point`, by at most the
/// vertex's polar angle, so that a hard pull reads as tugging the cloth around.
/// Picking the vertex from a screen ray is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DragInteraction {
    config: DragConfig,
    drag: Option<Drag>,
    rotation: UnitQuaternion<f32>,
}

impl Default for DragInteraction {
    fn default() -> Self {
        Self::with_config(DragConfig::DEFAULT)
    }
}

impl DragInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DragConfig) -> Self {
        Self {
            config,
            drag: None,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Starts dragging `vertex`, whose rest position is `rest`, from `point`.
    pub fn begin(&mut self, vertex: VertexIndex, rest: Vector3<f32>, point: Vector3<f32>) {
        self.drag = Some(Drag {
            vertex,
            rest,
            start: point,
            point,
        });
    }

    /// Starts dragging whichever corner of a hit triangle lies nearest the hit `point`.
    pub fn begin_nearest(&mut self, corners: [(VertexIndex, Vector3<f32>); 3], point: Vector3<f32>) {
        let [first, rest @ ..] = corners;
        let (vertex, position) = rest.into_iter().fold(first, |nearest, corner| {
            if (corner.1 - point).norm_squared() < (nearest.1 - point).norm_squared() {
                corner
            } else {
                nearest
            }
        });
        self.begin(vertex, position, point);
    }

    pub fn drag_to(&mut self, point: Vector3<f32>) {
        if let Some(drag) = self.drag.as_mut() {
            drag.point = point;
        }
    }

    pub fn end(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    /// Orientation the surface is being pulled toward right now
    pub fn target_rotation(&self) -> UnitQuaternion<f32> {
        let identity = UnitQuaternion::identity();
        let Some(drag) = self.drag else {
            return identity;
        };
        let Some(direction) = drag.rest.try_normalize(f32::EPSILON) else {
            return identity;
        };
        let Some(outward) = Vector3::new(direction.x, direction.y, 0.0).try_normalize(f32::EPSILON)
        else {
            return identity;
        };

        // Signed pull away from the vertex, measured in the xy plane
        let distance = outward.dot(&(drag.point - drag.rest));
        if distance >= 0.0 {
            return identity;
        }
        let Some(axis) = Unit::try_new(drag.start.cross(&drag.point), f32::EPSILON) else {
            return identity;
        };

        let normal_angle = direction.z.clamp(-1.0, 1.0).acos() + self.config.normal_margin;
        let pull_angle = distance.abs() * self.config.pull_gain;
        UnitQuaternion::from_axis_angle(&axis, normal_angle.min(pull_angle))
    }

    /// Eases the current rotation toward [`Self::target_rotation`]; call once per frame.
    pub fn update(&mut self) {
        let target = self.target_rotation();
        let t = if self.is_dragging() {
            self.config.follow
        } else {
            self.config.release
        };
        self.rotation = self
            .rotation
            .try_slerp(&target, t, f32::EPSILON)
            .unwrap_or(target);
    }
}

impl InteractionSource for DragInteraction {
    fn grab(&self) -> Option<Grab> {
        self.drag.map(|drag| Grab {
            vertex: drag.vertex,
            target: drag.point,
        })
    }

    fn transform(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::identity(), self.rotation)
    }
}
