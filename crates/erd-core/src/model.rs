//! Diagram data model.
//!
//! The diagram is three ordered collections: entity blocks, decorative
//! circles, and connector segments. Insertion order is the only ordering
//! guarantee and doubles as paint order (last inserted = topmost).
//! Connections are free-floating segments in canvas space; they hold no
//! reference to the blocks they were drawn between, so moving a block leaves
//! its connections where they were.

use crate::geometry::{Point, Rect};
use crate::id::NodeId;
use crate::layout::entity_bounds;
use serde::{Deserialize, Serialize};

// ─── Schema ──────────────────────────────────────────────────────────────

/// One column of an entity's schema.
///
/// Names are not validated: empty names and duplicates are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub not_null: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            primary_key: false,
            not_null: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Method {
    #[serde(default)]
    pub name: String,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// How an entity block presents its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// One row per field and method.
    #[default]
    Compact,
    /// The whole schema as a single formatted text block.
    Raw,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Compact => ViewMode::Raw,
            ViewMode::Raw => ViewMode::Compact,
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A named schema block on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: NodeId,
    pub name: String,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    /// Top-left anchor.
    pub position: Point,
    pub view_mode: ViewMode,
}

/// A decorative circle dropped from the palette. Never a connection target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: NodeId,
    pub center: Point,
    pub radius: f32,
}

/// A straight connector segment between two canvas points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: Point,
    pub to: Point,
}

impl Connection {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Detached working copy of an entity's schema.
///
/// `id` is `None` until the draft is first committed. `position` is only
/// consulted when the draft creates a new entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDraft {
    pub id: Option<NodeId>,
    pub name: String,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub position: Point,
}

impl EntityDraft {
    /// Deep copy of an existing entity's schema.
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            id: Some(entity.id),
            name: entity.name.clone(),
            fields: entity.fields.clone(),
            methods: entity.methods.clone(),
            position: entity.position,
        }
    }
}

// ─── Diagram ─────────────────────────────────────────────────────────────

/// Owner of every entity, circle, and connection on the canvas.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagram {
    entities: Vec<Entity>,
    circles: Vec<Circle>,
    connections: Vec<Connection>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entity built from `draft` and return its fresh ID.
    ///
    /// Any `id` already on the draft is ignored; every call creates a
    /// distinct entity.
    pub fn create_entity(&mut self, draft: &EntityDraft) -> NodeId {
        let id = NodeId::with_prefix("entity");
        self.entities.push(Entity {
            id,
            name: draft.name.clone(),
            fields: draft.fields.clone(),
            methods: draft.methods.clone(),
            position: draft.position,
            view_mode: ViewMode::default(),
        });
        log::debug!(
            "create entity {id} ({} fields, {} methods)",
            draft.fields.len(),
            draft.methods.len()
        );
        id
    }

    /// Replace the schema of entity `id` with the draft's content.
    ///
    /// The entity keeps its ID, slot in the collection, position, and view
    /// mode. Returns `false` and leaves the diagram untouched when `id` is
    /// unknown.
    pub fn update_entity(&mut self, id: NodeId, draft: &EntityDraft) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            log::debug!("update ignored: no entity {id}");
            return false;
        };
        entity.name = draft.name.clone();
        entity.fields = draft.fields.clone();
        entity.methods = draft.methods.clone();
        log::debug!("update entity {id}");
        true
    }

    /// Append a connection. No deduplication, no endpoint validation.
    pub fn add_connection(&mut self, connection: Connection) {
        log::debug!(
            "add connection ({}, {}) -> ({}, {})",
            connection.from.x,
            connection.from.y,
            connection.to.x,
            connection.to.y
        );
        self.connections.push(connection);
    }

    pub fn add_circle(&mut self, center: Point, radius: f32) -> NodeId {
        let id = NodeId::with_prefix("circle");
        self.circles.push(Circle { id, center, radius });
        log::debug!("create circle {id}");
        id
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn entity(&self, id: NodeId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn entity_mut(&mut self, id: NodeId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Position of entity `id` in insertion order.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    /// Move an entity's top-left anchor or a circle's center.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        if let Some(entity) = self.entity_mut(id) {
            entity.position = position;
            return true;
        }
        if let Some(circle) = self.circles.iter_mut().find(|c| c.id == id) {
            circle.center = position;
            return true;
        }
        false
    }

    /// Change how an entity presents its schema. The schema itself is untouched.
    pub fn set_view_mode(&mut self, id: NodeId, mode: ViewMode) -> bool {
        match self.entity_mut(id) {
            Some(entity) => {
                entity.view_mode = mode;
                true
            }
            None => false,
        }
    }

    /// Flip an entity between compact and raw, returning the new mode.
    pub fn toggle_view_mode(&mut self, id: NodeId) -> Option<ViewMode> {
        let entity = self.entity_mut(id)?;
        entity.view_mode = entity.view_mode.toggled();
        Some(entity.view_mode)
    }

    /// Current bounding box of entity `id`, derived from its latest layout.
    pub fn bounds_of(&self, id: NodeId) -> Option<Rect> {
        self.entity(id).map(entity_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft(name: &str) -> EntityDraft {
        EntityDraft {
            name: name.to_string(),
            ..EntityDraft::default()
        }
    }

    #[test]
    fn create_assigns_unique_ids_in_order() {
        let mut diagram = Diagram::new();
        let a = diagram.create_entity(&draft("users"));
        let b = diagram.create_entity(&draft("orders"));
        assert_ne!(a, b);
        let names: Vec<_> = diagram.entities().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["users", "orders"]);
    }

    #[test]
    fn create_keeps_field_order() {
        let mut diagram = Diagram::new();
        let mut d = draft("users");
        d.fields = vec![
            Field::new("id", "int"),
            Field::new("email", "text"),
            Field::new("age", "int"),
        ];
        let id = diagram.create_entity(&d);
        let entity = diagram.entity(id).unwrap();
        assert_eq!(entity.fields, d.fields);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut diagram = Diagram::new();
        diagram.create_entity(&draft("users"));
        let before = diagram.entities().to_vec();
        assert!(!diagram.update_entity(NodeId::intern("missing"), &draft("x")));
        assert_eq!(diagram.entities(), before.as_slice());
    }

    #[test]
    fn update_preserves_slot_and_position() {
        let mut diagram = Diagram::new();
        let a = diagram.create_entity(&draft("a"));
        let b = diagram.create_entity(&draft("b"));
        diagram.move_node(a, Point::new(40.0, 50.0));

        let mut d = EntityDraft::from_entity(diagram.entity(a).unwrap());
        d.name = "renamed".into();
        d.position = Point::new(999.0, 999.0);
        assert!(diagram.update_entity(a, &d));

        assert_eq!(diagram.index_of(a), Some(0));
        assert_eq!(diagram.index_of(b), Some(1));
        let entity = diagram.entity(a).unwrap();
        assert_eq!(entity.name, "renamed");
        assert_eq!(entity.position, Point::new(40.0, 50.0));
    }

    #[test]
    fn connections_are_not_deduplicated() {
        let mut diagram = Diagram::new();
        let c = Connection::new(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        diagram.add_connection(c);
        diagram.add_connection(c);
        assert_eq!(diagram.connections().len(), 2);
    }

    #[test]
    fn moving_entity_leaves_connections_in_place() {
        let mut diagram = Diagram::new();
        let id = diagram.create_entity(&draft("a"));
        let c = Connection::new(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        diagram.add_connection(c);
        diagram.move_node(id, Point::new(300.0, 300.0));
        assert_eq!(diagram.connections(), &[c]);
    }

    #[test]
    fn move_node_handles_circles_and_unknown_ids() {
        let mut diagram = Diagram::new();
        let circle = diagram.add_circle(Point::new(10.0, 10.0), 100.0);
        assert!(diagram.move_node(circle, Point::new(20.0, 30.0)));
        assert_eq!(diagram.circles()[0].center, Point::new(20.0, 30.0));
        assert!(!diagram.move_node(NodeId::intern("nowhere"), Point::new(0.0, 0.0)));
    }

    #[test]
    fn toggle_view_mode_keeps_schema() {
        let mut diagram = Diagram::new();
        let mut d = draft("users");
        d.fields = vec![Field::new("id", "int").primary_key()];
        d.methods = vec![Method::new("save")];
        let id = diagram.create_entity(&d);

        assert_eq!(diagram.toggle_view_mode(id), Some(ViewMode::Raw));
        let entity = diagram.entity(id).unwrap();
        assert_eq!(entity.fields, d.fields);
        assert_eq!(entity.methods, d.methods);
        assert_eq!(diagram.toggle_view_mode(id), Some(ViewMode::Compact));
    }

    #[test]
    fn field_serializes_with_camel_case_keys() {
        let field = Field::new("id", "int").primary_key().not_null();
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "id", "type": "int", "primaryKey": true, "notNull": true})
        );
    }
}
