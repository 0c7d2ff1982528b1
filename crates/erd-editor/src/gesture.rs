//! Pointer gesture state machine.
//!
//! Turns pointer events into intents the UI applies: selection changes,
//! hover emphasis, committed connections, and node moves reported by the
//! renderer's native drag.
//!
//! | State | Event | Result |
//! |-------|-------|--------|
//! | any | down on entity | `Select`, → Idle |
//! | Idle, selection set | down on empty canvas | `ClearSelection`, stay Idle |
//! | Idle, no selection | down on empty canvas | → DrawingConnection |
//! | DrawingConnection | move | update `to`, `HoverEnd` if `to` left the hovered box |
//! | DrawingConnection | over entity | `HoverStart` if the box contains `to` |
//! | DrawingConnection | up | `ConnectionCommitted` if hovering, → Idle |
//! | any | drag move / end | `MoveNode`, → DraggingEntity / Idle |
//!
//! A down event while a gesture is in progress abandons that gesture first.
//!
//! The controller also remembers the current selection, since a down on
//! empty canvas behaves differently depending on it. Everything else it
//! holds is reset when a gesture ends.

use crate::input::PointerEvent;
use erd_core::geometry::{Point, Rect, contains_point};
use erd_core::id::NodeId;
use erd_core::model::{Connection, Diagram};
use serde::Serialize;
use smallvec::{SmallVec, smallvec};

/// Offset of a connection's start from the pointer-down point, so a fresh
/// segment has visible length before the pointer moves.
pub const CONNECTION_EPSILON: f32 = 10.0;

/// Source of current entity bounding boxes.
pub trait BoundsLookup {
    fn bounds_of(&self, id: NodeId) -> Option<Rect>;
}

impl BoundsLookup for Diagram {
    fn bounds_of(&self, id: NodeId) -> Option<Rect> {
        Diagram::bounds_of(self, id)
    }
}

/// Something the UI should do in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    Select { id: NodeId },
    ClearSelection,
    /// Emphasize the block a connection would snap to.
    HoverStart { id: NodeId },
    HoverEnd { id: NodeId },
    ConnectionCommitted { connection: Connection },
    MoveNode { id: NodeId, position: Point },
}

pub type Intents = SmallVec<[Intent; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    DrawingConnection {
        from: Point,
        to: Point,
        hovered: Option<NodeId>,
    },
    DraggingEntity {
        id: NodeId,
    },
}

#[derive(Debug, Default)]
pub struct InteractionController {
    state: GestureState,
    selected: Option<NodeId>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Set the selection from outside a gesture (e.g. a UI list).
    pub fn set_selected(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    pub fn hovered(&self) -> Option<NodeId> {
        match self.state {
            GestureState::DrawingConnection { hovered, .. } => hovered,
            _ => None,
        }
    }

    /// The segment of the connection currently being drawn.
    pub fn pending_connection(&self) -> Option<Connection> {
        match self.state {
            GestureState::DrawingConnection { from, to, .. } => Some(Connection::new(from, to)),
            _ => None,
        }
    }

    /// Interpret one pointer event against the current entity boxes.
    pub fn apply(&mut self, event: &PointerEvent, bounds: &impl BoundsLookup) -> Intents {
        match *event {
            PointerEvent::PointerDown { x, y, target } => {
                let mut out = self.abandon();
                match target {
                    Some(id) => {
                        self.selected = Some(id);
                        out.push(Intent::Select { id });
                    }
                    None if self.selected.is_some() => {
                        self.selected = None;
                        out.push(Intent::ClearSelection);
                    }
                    None => {
                        let to = Point::new(x, y);
                        let from = to.offset(-CONNECTION_EPSILON, -CONNECTION_EPSILON);
                        log::trace!("gesture: start connection at ({x}, {y})");
                        self.state = GestureState::DrawingConnection {
                            from,
                            to,
                            hovered: None,
                        };
                    }
                }
                out
            }
            PointerEvent::PointerMove { x, y } => self.track(Point::new(x, y), bounds),
            PointerEvent::PointerOver { target } => self.enter(target, bounds),
            PointerEvent::PointerOut { .. } => Intents::new(),
            PointerEvent::PointerUp { x, y } => self.release(Point::new(x, y), bounds),
            PointerEvent::DragMove { target, x, y } => {
                let mut out = self.abandon();
                self.state = GestureState::DraggingEntity { id: target };
                out.push(Intent::MoveNode {
                    id: target,
                    position: Point::new(x, y),
                });
                out
            }
            PointerEvent::DragEnd { target, x, y } => {
                let mut out = self.abandon();
                out.push(Intent::MoveNode {
                    id: target,
                    position: Point::new(x, y),
                });
                out
            }
        }
    }

    /// Drop whatever gesture is in progress, un-emphasizing its target.
    pub fn abandon(&mut self) -> Intents {
        let previous = std::mem::take(&mut self.state);
        match previous {
            GestureState::DrawingConnection {
                hovered: Some(id), ..
            } => {
                log::trace!("gesture: abandon connection hovering {id}");
                smallvec![Intent::HoverEnd { id }]
            }
            _ => Intents::new(),
        }
    }

    fn track(&mut self, point: Point, bounds: &impl BoundsLookup) -> Intents {
        let GestureState::DrawingConnection { to, hovered, .. } = &mut self.state else {
            return Intents::new();
        };
        *to = point;
        match *hovered {
            Some(id) if !box_contains(bounds, id, point) => {
                *hovered = None;
                smallvec![Intent::HoverEnd { id }]
            }
            _ => Intents::new(),
        }
    }

    fn enter(&mut self, target: NodeId, bounds: &impl BoundsLookup) -> Intents {
        let GestureState::DrawingConnection { to, hovered, .. } = &mut self.state else {
            return Intents::new();
        };
        if *hovered == Some(target) || !box_contains(bounds, target, *to) {
            return Intents::new();
        }
        let mut out = Intents::new();
        if let Some(previous) = hovered.replace(target) {
            out.push(Intent::HoverEnd { id: previous });
        }
        out.push(Intent::HoverStart { id: target });
        out
    }

    fn release(&mut self, point: Point, bounds: &impl BoundsLookup) -> Intents {
        let mut out = self.track(point, bounds);
        let previous = std::mem::take(&mut self.state);
        if let GestureState::DrawingConnection {
            from,
            to,
            hovered: Some(id),
        } = previous
        {
            let connection = Connection::new(from, to);
            log::trace!("gesture: connection snapped to {id}");
            out.push(Intent::ConnectionCommitted { connection });
            out.push(Intent::HoverEnd { id });
        } else if matches!(previous, GestureState::DrawingConnection { .. }) {
            log::trace!("gesture: connection discarded");
        }
        out
    }
}

fn box_contains(bounds: &impl BoundsLookup, id: NodeId, point: Point) -> bool {
    bounds
        .bounds_of(id)
        .is_some_and(|rect| contains_point(&rect, point))
}
