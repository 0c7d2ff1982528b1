//! Hit testing: point → entity lookup.
//!
//! Walks the entity collection back-to-front (last inserted = topmost) and
//! tests each block's current bounding box with strict containment.

use erd_core::geometry::{Point, contains_point};
use erd_core::id::NodeId;
use erd_core::layout::entity_bounds;
use erd_core::model::Diagram;

/// Find the topmost entity whose block strictly contains `point`.
/// Returns `None` for empty canvas. Circles are never hit.
pub fn hit_test(diagram: &Diagram, point: Point) -> Option<NodeId> {
    diagram
        .entities()
        .iter()
        .rev()
        .find(|entity| contains_point(&entity_bounds(entity), point))
        .map(|entity| entity.id)
}

/// All entities whose block strictly contains `point`, topmost first.
pub fn hit_test_all(diagram: &Diagram, point: Point) -> Vec<NodeId> {
    diagram
        .entities()
        .iter()
        .rev()
        .filter(|entity| contains_point(&entity_bounds(entity), point))
        .map(|entity| entity.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use erd_core::model::{EntityDraft, Field};
    use pretty_assertions::assert_eq;

    fn place(diagram: &mut Diagram, name: &str, x: f32, y: f32) -> NodeId {
        diagram.create_entity(&EntityDraft {
            name: name.into(),
            position: Point::new(x, y),
            ..EntityDraft::default()
        })
    }

    #[test]
    fn hit_inside_block() {
        let mut diagram = Diagram::new();
        let a = place(&mut diagram, "a", 10.0, 10.0);
        assert_eq!(hit_test(&diagram, Point::new(20.0, 20.0)), Some(a));
        assert_eq!(hit_test(&diagram, Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn block_edge_is_a_miss() {
        let mut diagram = Diagram::new();
        place(&mut diagram, "a", 10.0, 10.0);
        assert_eq!(hit_test(&diagram, Point::new(10.0, 20.0)), None);
    }

    #[test]
    fn later_entity_is_on_top() {
        let mut diagram = Diagram::new();
        let a = place(&mut diagram, "a", 0.0, 0.0);
        let b = place(&mut diagram, "b", 20.0, 20.0);
        let p = Point::new(30.0, 30.0);
        assert_eq!(hit_test(&diagram, p), Some(b));
        assert_eq!(hit_test_all(&diagram, p), vec![b, a]);
    }

    #[test]
    fn hit_box_grows_with_schema() {
        let mut diagram = Diagram::new();
        let a = place(&mut diagram, "a", 0.0, 0.0);
        // Empty block is 50 tall.
        let below = Point::new(50.0, 60.0);
        assert_eq!(hit_test(&diagram, below), None);

        let mut draft = EntityDraft::from_entity(diagram.entity(a).unwrap());
        draft.fields.push(Field::new("id", "int"));
        diagram.update_entity(a, &draft);
        assert_eq!(hit_test(&diagram, below), Some(a));
    }

    #[test]
    fn circles_are_ignored() {
        let mut diagram = Diagram::new();
        diagram.add_circle(Point::new(100.0, 100.0), 100.0);
        assert_eq!(hit_test(&diagram, Point::new(100.0, 100.0)), None);
    }
}
