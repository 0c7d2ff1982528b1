//! Diagram → drawing primitives → Vello scene.
//!
//! [`build_display_list`] walks the diagram in paint order (grid, circles,
//! entity blocks, connections, in-progress segment) and produces
//! backend-neutral primitives. [`paint_scene`] replays them into a Vello
//! `Scene`; the host presents the scene however it likes.

use erd_core::geometry::Point as CanvasPoint;
use erd_core::id::NodeId;
use erd_core::layout::{
    BlockLayout, GridConfig, HEADER_HEIGHT, RowKind, Viewport, background_grid, layout_entity,
};
use erd_core::model::{Connection, Diagram, Entity};
use kurbo::{Affine, Circle, Line, Point, Rect, RoundedRect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

const CORNER_RADIUS: f64 = 8.0;
const BORDER_WIDTH: f64 = 1.0;
const EMPHASIS_WIDTH: f64 = 2.0;
const GRID_WIDTH: f64 = 1.0;
const CONNECTION_WIDTH: f64 = 10.0;

/// Colors used when painting the canvas.
#[derive(Debug, Clone, Copy)]
pub struct CanvasTheme {
    pub background: Color,
    pub grid: Color,
    pub block_fill: Color,
    pub header_fill: Color,
    pub border: Color,
    pub selected: Color,
    /// Stroke of the block a connection is about to snap to.
    pub highlight: Color,
    pub connection: Color,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            background: Color::from_rgb8(0xF2, 0xF3, 0xF5),
            grid: Color::from_rgb8(0xE2, 0xE4, 0xE8),
            block_fill: Color::from_rgb8(0xFF, 0xFF, 0xFF),
            header_fill: Color::from_rgb8(0xE5, 0xE5, 0xE5),
            border: Color::from_rgb8(0xBD, 0xBD, 0xBD),
            selected: Color::from_rgb8(0x3B, 0x82, 0xF6),
            highlight: Color::from_rgb8(0xFF, 0x00, 0x00),
            connection: Color::from_rgb8(0xFF, 0x00, 0x00),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::from_rgb8(0x1E, 0x1E, 0x22),
            grid: Color::from_rgb8(0x2C, 0x2C, 0x32),
            block_fill: Color::from_rgb8(0x2A, 0x2A, 0x30),
            header_fill: Color::from_rgb8(0x38, 0x38, 0x40),
            border: Color::from_rgb8(0x55, 0x55, 0x5E),
            selected: Color::from_rgb8(0x60, 0xA5, 0xFA),
            highlight: Color::from_rgb8(0xF8, 0x71, 0x71),
            connection: Color::from_rgb8(0xF8, 0x71, 0x71),
        }
    }
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Transient interaction state that affects how the canvas looks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameState {
    pub viewport: Viewport,
    pub grid: GridConfig,
    pub selected: Option<NodeId>,
    pub hovered: Option<NodeId>,
    /// Segment of a connection gesture that has not been committed yet.
    pub pending: Option<Connection>,
}

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Rect(Rect),
    RoundedRect(RoundedRect),
    Circle(Circle),
    Line(Line),
}

#[derive(Debug, Clone, Copy)]
pub enum Primitive {
    Fill { shape: Shape, color: Color },
    Stroke { shape: Shape, color: Color, width: f64 },
}

/// Flatten the diagram into primitives in paint order.
pub fn build_display_list(
    diagram: &Diagram,
    frame: &FrameState,
    theme: &CanvasTheme,
) -> Vec<Primitive> {
    let mut out = Vec::new();

    push_background(&mut out, frame, theme);

    for circle in diagram.circles() {
        let shape = Shape::Circle(Circle::new(
            to_kurbo(circle.center),
            f64::from(circle.radius),
        ));
        out.push(Primitive::Fill {
            shape,
            color: theme.block_fill,
        });
        out.push(Primitive::Stroke {
            shape,
            color: theme.border,
            width: BORDER_WIDTH,
        });
    }

    for entity in diagram.entities() {
        let layout = layout_entity(entity);
        push_block(&mut out, entity, &layout, frame, theme);
    }

    for connection in diagram.connections() {
        push_connection(&mut out, connection, theme);
    }
    if let Some(pending) = &frame.pending {
        push_connection(&mut out, pending, theme);
    }

    out
}

/// Paint the diagram into a Vello scene.
///
/// Call once per frame with a freshly-cleared `Scene`.
pub fn paint_scene(scene: &mut Scene, diagram: &Diagram, frame: &FrameState, theme: &CanvasTheme) {
    let list = build_display_list(diagram, frame, theme);
    log::trace!("PAINT {} primitives", list.len());
    for primitive in &list {
        paint_primitive(scene, primitive);
    }
}

fn paint_primitive(scene: &mut Scene, primitive: &Primitive) {
    match *primitive {
        Primitive::Fill { shape, color } => match shape {
            Shape::Rect(s) => scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &s),
            Shape::RoundedRect(s) => scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &s),
            Shape::Circle(s) => scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &s),
            Shape::Line(s) => scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &s),
        },
        Primitive::Stroke {
            shape,
            color,
            width,
        } => {
            let stroke = Stroke::new(width);
            match shape {
                Shape::Rect(s) => scene.stroke(&stroke, Affine::IDENTITY, color, None, &s),
                Shape::RoundedRect(s) => scene.stroke(&stroke, Affine::IDENTITY, color, None, &s),
                Shape::Circle(s) => scene.stroke(&stroke, Affine::IDENTITY, color, None, &s),
                Shape::Line(s) => scene.stroke(&stroke, Affine::IDENTITY, color, None, &s),
            }
        }
    }
}

// ─── Pieces ──────────────────────────────────────────────────────────────

fn push_background(out: &mut Vec<Primitive>, frame: &FrameState, theme: &CanvasTheme) {
    let width = f64::from(frame.viewport.width);
    let height = f64::from(frame.viewport.height);
    out.push(Primitive::Fill {
        shape: Shape::Rect(Rect::new(0.0, 0.0, width, height)),
        color: theme.background,
    });

    let grid = background_grid(frame.viewport, &frame.grid);
    for &x in &grid.columns {
        let x = f64::from(x);
        out.push(Primitive::Stroke {
            shape: Shape::Line(Line::new((x, 0.0), (x, height))),
            color: theme.grid,
            width: GRID_WIDTH,
        });
    }
    for &y in &grid.rows {
        let y = f64::from(y);
        out.push(Primitive::Stroke {
            shape: Shape::Line(Line::new((0.0, y), (width, y))),
            color: theme.grid,
            width: GRID_WIDTH,
        });
    }
}

fn push_block(
    out: &mut Vec<Primitive>,
    entity: &Entity,
    layout: &BlockLayout,
    frame: &FrameState,
    theme: &CanvasTheme,
) {
    let x0 = f64::from(entity.position.x);
    let y0 = f64::from(entity.position.y);
    let x1 = x0 + f64::from(layout.width);
    let body = Rect::new(x0, y0, x1, y0 + f64::from(layout.height));
    let rounded = body.to_rounded_rect(CORNER_RADIUS);

    out.push(Primitive::Fill {
        shape: Shape::RoundedRect(rounded),
        color: theme.block_fill,
    });

    let header_bottom = y0 + f64::from(HEADER_HEIGHT);
    out.push(Primitive::Fill {
        shape: Shape::Rect(Rect::new(x0, y0, x1, header_bottom)),
        color: theme.header_fill,
    });
    out.push(Primitive::Stroke {
        shape: Shape::Line(Line::new((x0, header_bottom), (x1, header_bottom))),
        color: theme.border,
        width: BORDER_WIDTH,
    });

    for row in &layout.rows {
        match row.kind {
            RowKind::Divider => {
                let y = y0 + f64::from(row.y + row.height / 2.0);
                out.push(Primitive::Stroke {
                    shape: Shape::Line(Line::new((x0, y), (x1, y))),
                    color: theme.border,
                    width: BORDER_WIDTH,
                });
            }
            _ => {
                for cell in &row.cells {
                    log::trace!(
                        "TEXT {} {:?} at ({}, {})",
                        entity.id,
                        cell.text,
                        entity.position.x + cell.x,
                        entity.position.y + row.y
                    );
                }
            }
        }
    }

    let (color, width) = if frame.hovered == Some(entity.id) {
        (theme.highlight, EMPHASIS_WIDTH)
    } else if frame.selected == Some(entity.id) {
        (theme.selected, EMPHASIS_WIDTH)
    } else {
        (theme.border, BORDER_WIDTH)
    };
    out.push(Primitive::Stroke {
        shape: Shape::RoundedRect(rounded),
        color,
        width,
    });
}

fn push_connection(out: &mut Vec<Primitive>, connection: &Connection, theme: &CanvasTheme) {
    out.push(Primitive::Stroke {
        shape: Shape::Line(Line::new(
            to_kurbo(connection.from),
            to_kurbo(connection.to),
        )),
        color: theme.connection,
        width: CONNECTION_WIDTH,
    });
}

fn to_kurbo(p: CanvasPoint) -> Point {
    Point::new(f64::from(p.x), f64::from(p.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use erd_core::model::{EntityDraft, Field, Method};
    use peniko::color::Rgba8;
    use pretty_assertions::assert_eq;

    fn frame() -> FrameState {
        FrameState {
            viewport: Viewport {
                width: 100.0,
                height: 100.0,
            },
            grid: GridConfig { spacing: 50.0 },
            ..FrameState::default()
        }
    }

    fn diagram_with_block() -> (Diagram, NodeId) {
        let mut diagram = Diagram::new();
        let id = diagram.create_entity(&EntityDraft {
            name: "users".into(),
            fields: vec![Field::new("id", "int")],
            methods: vec![Method::new("save")],
            position: CanvasPoint::new(10.0, 10.0),
            ..EntityDraft::default()
        });
        (diagram, id)
    }

    fn block_outline(list: &[Primitive]) -> (Rgba8, f64) {
        list.iter()
            .rev()
            .find_map(|p| match p {
                Primitive::Stroke {
                    shape: Shape::RoundedRect(_),
                    color,
                    width,
                } => Some((color.to_rgba8(), *width)),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn empty_diagram_paints_background_and_grid() {
        let list = build_display_list(&Diagram::new(), &frame(), &CanvasTheme::light());
        // 1 background + 2 columns + 2 rows
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn block_outline_reflects_hover_and_selection() {
        let theme = CanvasTheme::light();
        let (diagram, id) = diagram_with_block();

        let plain = build_display_list(&diagram, &frame(), &theme);
        assert_eq!(block_outline(&plain), (theme.border.to_rgba8(), BORDER_WIDTH));

        let selected = FrameState {
            selected: Some(id),
            ..frame()
        };
        let list = build_display_list(&diagram, &selected, &theme);
        assert_eq!(block_outline(&list), (theme.selected.to_rgba8(), EMPHASIS_WIDTH));

        let hovered = FrameState {
            hovered: Some(id),
            ..selected
        };
        let list = build_display_list(&diagram, &hovered, &theme);
        assert_eq!(block_outline(&list), (theme.highlight.to_rgba8(), EMPHASIS_WIDTH));
    }

    #[test]
    fn block_body_matches_layout() {
        let (diagram, _) = diagram_with_block();
        let list = build_display_list(&diagram, &frame(), &CanvasTheme::light());
        let body = list
            .iter()
            .find_map(|p| match p {
                Primitive::Fill {
                    shape: Shape::RoundedRect(r),
                    ..
                } => Some(r.rect()),
                _ => None,
            })
            .unwrap();
        let layout = layout_entity(&diagram.entities()[0]);
        assert_eq!(body.height(), f64::from(layout.height));
        assert_eq!(body.width(), f64::from(layout.width));
    }

    #[test]
    fn pending_segment_is_painted_last() {
        let (mut diagram, _) = diagram_with_block();
        diagram.add_connection(Connection::new(
            CanvasPoint::new(0.0, 0.0),
            CanvasPoint::new(1.0, 1.0),
        ));
        let pending = Connection::new(CanvasPoint::new(5.0, 5.0), CanvasPoint::new(9.0, 9.0));
        let state = FrameState {
            pending: Some(pending),
            ..frame()
        };
        let list = build_display_list(&diagram, &state, &CanvasTheme::light());
        match list.last().unwrap() {
            Primitive::Stroke {
                shape: Shape::Line(line),
                width,
                ..
            } => {
                assert_eq!(line.p0, Point::new(5.0, 5.0));
                assert_eq!(line.p1, Point::new(9.0, 9.0));
                assert_eq!(*width, CONNECTION_WIDTH);
            }
            other => panic!("expected pending line, got {other:?}"),
        }
    }

    #[test]
    fn paint_scene_accepts_full_diagram() {
        let (mut diagram, _) = diagram_with_block();
        diagram.add_circle(CanvasPoint::new(300.0, 300.0), 100.0);
        let mut scene = Scene::new();
        paint_scene(&mut scene, &diagram, &frame(), &CanvasTheme::dark());
    }
}
