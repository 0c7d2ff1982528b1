pub mod emitter;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;

pub use emitter::emit_raw_schema;
pub use geometry::{Point, Rect, contains_point};
pub use id::NodeId;
pub use layout::{
    BlockLayout, GridConfig, GridLayout, LayoutRow, RowKind, TextAlign, TextCell, Viewport,
    background_grid, compute_layout, entity_bounds, layout_entity,
};
pub use model::*;
