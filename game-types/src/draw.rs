use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StampShape {
    Circle,
    Square,
    Star,
}

/// Geometry/tool payload of one drawing primitive.
///
/// Every field is produced on the drawer's client and echoed verbatim to all
/// replicas. Spray particle positions in particular are generated once at
/// the source, so replaying the log can never diverge from what was drawn
/// live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrawPayload {
    StrokeSegment {
        from: Point,
        to: Point,
        color: String,
        width: f32,
    },
    SprayBurst {
        particles: Vec<Point>,
        color: String,
        radius: f32,
    },
    Stamp {
        shape: StampShape,
        at: Point,
        size: f32,
        color: String,
    },
    Clear,
}

impl DrawPayload {
    /// Structural validation of the required fields. Payloads failing this
    /// check are dropped silently.
    pub fn is_well_formed(&self) -> bool {
        match self {
            DrawPayload::StrokeSegment { from, to, width, .. } => {
                from.is_finite() && to.is_finite() && width.is_finite() && *width > 0.0
            }
            DrawPayload::SprayBurst { particles, radius, .. } => {
                !particles.is_empty()
                    && particles.iter().all(Point::is_finite)
                    && radius.is_finite()
                    && *radius > 0.0
            }
            DrawPayload::Stamp { at, size, .. } => {
                at.is_finite() && size.is_finite() && *size > 0.0
            }
            DrawPayload::Clear => true,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, DrawPayload::Clear)
    }
}

/// A drawing primitive as recorded in the round's log.
///
/// `seq` is assigned by the room when the event is serialized into the log,
/// never by the sender, starting at 1 each round and strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DrawEvent {
    pub seq: u64,
    pub payload: DrawPayload,
}

/// The two capabilities a drawing surface exposes upward: wipe, and export.
/// The engine depends on this seam, never on a rendering handle.
pub trait CanvasPort {
    /// Reset the surface to empty.
    fn clear(&mut self);
    /// Serialized image of the current surface state.
    fn export_snapshot(&self) -> Vec<u8>;
}
