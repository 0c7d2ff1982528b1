//! Input abstraction layer.
//!
//! Normalizes raw pointer notifications from the UI into a single
//! `PointerEvent` enum. Coordinates are already in canvas space; `target`
//! is the entity under the pointer as reported by the UI's own hit test.

use erd_core::geometry::Point;
use erd_core::id::NodeId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed. `target` is `None` on empty canvas.
    PointerDown {
        x: f32,
        y: f32,
        target: Option<NodeId>,
    },

    PointerMove { x: f32, y: f32 },

    PointerUp { x: f32, y: f32 },

    /// Pointer entered an entity block.
    PointerOver { target: NodeId },

    /// Pointer left an entity block.
    PointerOut { target: NodeId },

    /// Native drag moved a node; `(x, y)` is its new anchor.
    DragMove { target: NodeId, x: f32, y: f32 },

    /// Native drag finished with the node anchored at `(x, y)`.
    DragEnd { target: NodeId, x: f32, y: f32 },
}

impl PointerEvent {
    pub fn down(point: Point, target: Option<NodeId>) -> Self {
        Self::PointerDown {
            x: point.x,
            y: point.y,
            target,
        }
    }

    pub fn moved(point: Point) -> Self {
        Self::PointerMove {
            x: point.x,
            y: point.y,
        }
    }

    pub fn up(point: Point) -> Self {
        Self::PointerUp {
            x: point.x,
            y: point.y,
        }
    }

    /// Extract the pointer or anchor position, if the event carries one.
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::DragMove { x, y, .. }
            | Self::DragEnd { x, y, .. } => Some(Point::new(x, y)),
            Self::PointerOver { .. } | Self::PointerOut { .. } => None,
        }
    }
}
