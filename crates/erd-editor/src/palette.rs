//! Palette items dropped onto the canvas.

use crate::session::EditSession;
use erd_core::geometry::Point;
use erd_core::id::NodeId;
use erd_core::layout::{BLOCK_WIDTH, CIRCLE_RADIUS, MIN_BLOCK_HEIGHT};
use erd_core::model::Diagram;

/// Name given to entities created from the palette.
pub const DEFAULT_ENTITY_NAME: &str = "Entity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteItem {
    Entity,
    Circle,
}

impl PaletteItem {
    /// Parse the drag payload type set by the palette (`"rect"`, `"circle"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rect" | "entity" => Some(Self::Entity),
            "circle" => Some(Self::Circle),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Circle => "circle",
        }
    }
}

/// Create the node for `item` dropped at `point`.
///
/// Entities are centered on the drop point at their nominal block size;
/// circles are centered on it.
pub fn drop_item(diagram: &mut Diagram, item: PaletteItem, point: Point) -> Option<NodeId> {
    match item {
        PaletteItem::Entity => {
            let origin = point.offset(-BLOCK_WIDTH / 2.0, -MIN_BLOCK_HEIGHT / 2.0);
            let mut session = EditSession::new().with_position(origin);
            session.set_name(DEFAULT_ENTITY_NAME);
            session.commit(diagram).map(|entity| entity.id)
        }
        PaletteItem::Circle => Some(diagram.add_circle(point, CIRCLE_RADIUS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erd_core::model::ViewMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn entity_drop_centers_nominal_block() {
        let mut diagram = Diagram::new();
        let id = drop_item(&mut diagram, PaletteItem::Entity, Point::new(300.0, 250.0)).unwrap();
        let entity = diagram.entity(id).unwrap();
        assert_eq!(entity.position, Point::new(200.0, 150.0));
        assert_eq!(entity.name, DEFAULT_ENTITY_NAME);
        assert!(entity.fields.is_empty());
        assert_eq!(entity.view_mode, ViewMode::Compact);
    }

    #[test]
    fn circle_drop_centers_circle() {
        let mut diagram = Diagram::new();
        drop_item(&mut diagram, PaletteItem::Circle, Point::new(10.0, 20.0));
        assert_eq!(diagram.circles()[0].center, Point::new(10.0, 20.0));
        assert_eq!(diagram.circles()[0].radius, CIRCLE_RADIUS);
        assert!(diagram.entities().is_empty());
    }

    #[test]
    fn payload_names() {
        assert_eq!(PaletteItem::from_name("rect"), Some(PaletteItem::Entity));
        assert_eq!(PaletteItem::from_name("circle"), Some(PaletteItem::Circle));
        assert_eq!(PaletteItem::from_name("triangle"), None);
        assert_eq!(PaletteItem::from_name(PaletteItem::Circle.name()), Some(PaletteItem::Circle));
    }
}
