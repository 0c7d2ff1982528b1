//! Diagram engine: model + gesture controller glue.
//!
//! The engine is what a UI shell talks to. It owns the authoritative
//! [`Diagram`] and the [`InteractionController`], runs every pointer event
//! through the controller against the live diagram, and applies the
//! resulting intents to the model:
//!
//! - `ConnectionCommitted` appends the segment,
//! - `MoveNode` moves the node,
//! - selection and hover intents only update controller state.
//!
//! The intents are returned so the shell can mirror them visually.
//! Bounding boxes are derived from the current schema on every query, so a
//! committed edit is visible to the very next hit test.

use crate::gesture::{GestureState, Intent, Intents, InteractionController};
use crate::input::PointerEvent;
use crate::palette::{PaletteItem, drop_item};
use crate::session::EditSession;
use erd_core::geometry::Point;
use erd_core::id::NodeId;
use erd_core::layout::{BlockLayout, GridConfig, Viewport, layout_entity};
use erd_core::model::{Diagram, Entity, ViewMode};
use erd_render::hit::hit_test;
use erd_render::paint::FrameState;

/// Runtime settings for an editor surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EditorConfig {
    pub viewport: Viewport,
    pub grid: GridConfig,
}

pub struct DiagramEngine {
    diagram: Diagram,
    controller: InteractionController,
    pub config: EditorConfig,
}

impl DiagramEngine {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            diagram: Diagram::new(),
            controller: InteractionController::new(),
            config,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.controller.selected()
    }

    /// Select an entity by ID, or clear the selection with `None`.
    /// Returns `false` when the ID is unknown.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        match id {
            Some(id) if self.diagram.entity(id).is_none() => false,
            _ => {
                self.controller.set_selected(id);
                true
            }
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Run one pre-classified event through the controller and apply it.
    pub fn handle(&mut self, event: &PointerEvent) -> Intents {
        let intents = self.controller.apply(event, &self.diagram);
        for intent in &intents {
            self.apply_intent(intent);
        }
        intents
    }

    /// Pointer pressed at `point`; the target is found by hit testing.
    pub fn pointer_down(&mut self, point: Point) -> Intents {
        let target = hit_test(&self.diagram, point);
        self.handle(&PointerEvent::down(point, target))
    }

    /// Pointer moved to `point`.
    ///
    /// While drawing a connection, entering a block the controller is not
    /// already hovering is reported as a pointer-over after the move.
    pub fn pointer_move(&mut self, point: Point) -> Intents {
        let mut intents = self.handle(&PointerEvent::moved(point));
        if matches!(
            self.controller.state(),
            GestureState::DrawingConnection { .. }
        ) && let Some(target) = hit_test(&self.diagram, point)
            && self.controller.hovered() != Some(target)
        {
            intents.extend(self.handle(&PointerEvent::PointerOver { target }));
        }
        intents
    }

    pub fn pointer_up(&mut self, point: Point) -> Intents {
        self.handle(&PointerEvent::up(point))
    }

    pub fn drag_move(&mut self, id: NodeId, position: Point) -> Intents {
        self.handle(&PointerEvent::DragMove {
            target: id,
            x: position.x,
            y: position.y,
        })
    }

    pub fn drag_end(&mut self, id: NodeId, position: Point) -> Intents {
        self.handle(&PointerEvent::DragEnd {
            target: id,
            x: position.x,
            y: position.y,
        })
    }

    fn apply_intent(&mut self, intent: &Intent) {
        match *intent {
            Intent::ConnectionCommitted { connection } => self.diagram.add_connection(connection),
            Intent::MoveNode { id, position } => {
                if !self.diagram.move_node(id, position) {
                    log::debug!("move ignored: no node {id}");
                }
            }
            Intent::Select { .. }
            | Intent::ClearSelection
            | Intent::HoverStart { .. }
            | Intent::HoverEnd { .. } => {}
        }
    }

    // ─── Model edits ─────────────────────────────────────────────────────

    pub fn drop_item(&mut self, item: PaletteItem, point: Point) -> Option<NodeId> {
        drop_item(&mut self.diagram, item, point)
    }

    /// Session seeded from entity `id`, or `None` if it does not exist.
    pub fn edit_entity(&self, id: NodeId) -> Option<EditSession> {
        self.diagram
            .entity(id)
            .map(|entity| EditSession::open(Some(entity)))
    }

    pub fn commit_session(&mut self, session: &EditSession) -> Option<Entity> {
        session.commit(&mut self.diagram)
    }

    pub fn toggle_view_mode(&mut self, id: NodeId) -> Option<ViewMode> {
        self.diagram.toggle_view_mode(id)
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// Current layout of every entity, in insertion order.
    pub fn layouts(&self) -> Vec<(NodeId, BlockLayout)> {
        self.diagram
            .entities()
            .iter()
            .map(|entity| (entity.id, layout_entity(entity)))
            .collect()
    }

    /// Interaction state the painter needs for the next frame.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.config.viewport,
            grid: self.config.grid,
            selected: self.controller.selected(),
            hovered: self.controller.hovered(),
            pending: self.controller.pending_connection(),
        }
    }
}

impl Default for DiagramEngine {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
