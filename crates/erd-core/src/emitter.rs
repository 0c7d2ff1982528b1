//! Emitter: entity schema → raw text block.
//!
//! Raw view mode shows the field list exactly as it serializes, one
//! property per line, so the block height can be estimated from the field
//! count alone.

use crate::model::Entity;

/// Pretty-printed JSON of `entity`'s fields.
#[must_use]
pub fn emit_raw_schema(entity: &Entity) -> String {
    serde_json::to_string_pretty(&entity.fields).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::id::NodeId;
    use crate::layout::raw_line_count;
    use crate::model::{Field, ViewMode};
    use pretty_assertions::assert_eq;

    fn entity(fields: Vec<Field>) -> Entity {
        Entity {
            id: NodeId::intern("emit_test"),
            name: "users".into(),
            fields,
            methods: vec![],
            position: Point::default(),
            view_mode: ViewMode::Raw,
        }
    }

    #[test]
    fn emits_fields_in_order() {
        let text = emit_raw_schema(&entity(vec![
            Field::new("id", "int").primary_key(),
            Field::new("email", "text").not_null(),
        ]));
        let id_at = text.find("\"id\"").unwrap();
        let email_at = text.find("\"email\"").unwrap();
        assert!(id_at < email_at);
        assert!(text.contains("\"primaryKey\": true"));
        assert!(text.contains("\"notNull\": true"));
    }

    #[test]
    fn line_estimate_matches_output() {
        for n in 1..4 {
            let fields = (0..n).map(|i| Field::new(format!("f{i}"), "int")).collect();
            let text = emit_raw_schema(&entity(fields));
            assert_eq!(text.lines().count(), raw_line_count(n));
        }
    }

    #[test]
    fn empty_schema() {
        assert_eq!(emit_raw_schema(&entity(vec![])), "[]");
    }
}
