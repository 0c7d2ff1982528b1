//! Block layout engine.
//!
//! Computes the rendered geometry of an entity block from its schema and a
//! view mode: total size plus the vertical offset of every row (title,
//! fields, divider, methods). Layout is a pure function of its inputs and
//! is recomputed on demand rather than cached, so a block's bounding box
//! always reflects the latest schema.
//!
//! Also hosts the background grid computation, which takes the viewport
//! size explicitly.

use crate::emitter::emit_raw_schema;
use crate::geometry::Rect;
use crate::model::{Entity, ViewMode};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

// ─── Block metrics ───────────────────────────────────────────────────────

pub const BLOCK_WIDTH: f32 = 200.0;
/// Nominal block height; the header and palette drop offset derive from it.
pub const MIN_BLOCK_HEIGHT: f32 = 200.0;
/// A fifth of [`MIN_BLOCK_HEIGHT`].
pub const HEADER_HEIGHT: f32 = 40.0;
pub const HORIZONTAL_PADDING: f32 = 5.0;
pub const VERTICAL_PADDING: f32 = 5.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const DIVIDER_HEIGHT: f32 = 10.0;

/// 65% of the block width; the type cell takes the rest.
pub const NAME_CELL_WIDTH: f32 = 130.0;
pub const TYPE_CELL_WIDTH: f32 = BLOCK_WIDTH - NAME_CELL_WIDTH;

pub const TITLE_FONT_SIZE: f32 = HEADER_HEIGHT / 2.0;
pub const ROW_FONT_SIZE: f32 = 12.0;
pub const TYPE_FONT_SIZE: f32 = ROW_FONT_SIZE - 1.0;

/// Line height of the raw schema text block.
pub const RAW_LINE_HEIGHT: f32 = ROW_FONT_SIZE;
/// Serialized properties per field in raw mode (name, type, primaryKey, notNull).
pub const PROPERTIES_PER_FIELD: usize = 4;

pub const CIRCLE_RADIUS: f32 = 100.0;

// ─── Layout result ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    Title,
    Field,
    Divider,
    Method,
    /// Whole schema as one multi-line text block.
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A text run positioned relative to its row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCell {
    pub text: String,
    pub x: f32,
    pub width: f32,
    pub align: TextAlign,
    pub font_size: f32,
    pub italic: bool,
    pub bold: bool,
}

/// One horizontal band of a block. `y` is relative to the block's top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRow {
    pub kind: RowKind,
    pub y: f32,
    pub height: f32,
    pub cells: SmallVec<[TextCell; 2]>,
}

/// Computed geometry of one entity block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockLayout {
    pub width: f32,
    pub height: f32,
    pub rows: Vec<LayoutRow>,
}

impl BlockLayout {
    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &LayoutRow> {
        self.rows.iter().filter(move |r| r.kind == kind)
    }

    pub fn has_divider(&self) -> bool {
        self.rows.iter().any(|r| r.kind == RowKind::Divider)
    }
}

// ─── Layout computation ──────────────────────────────────────────────────

/// Lay out `entity` in the given view mode.
///
/// `view_mode` overrides `entity.view_mode`, so callers can preview either
/// presentation without touching the entity.
pub fn compute_layout(entity: &Entity, view_mode: ViewMode) -> BlockLayout {
    let mut rows = Vec::with_capacity(entity.fields.len() + entity.methods.len() + 2);
    rows.push(title_row(&entity.name));

    let height = match view_mode {
        ViewMode::Compact => layout_compact(entity, &mut rows),
        ViewMode::Raw => layout_raw(entity, &mut rows),
    };

    BlockLayout {
        width: BLOCK_WIDTH,
        height,
        rows,
    }
}

/// Lay out `entity` in its own view mode.
pub fn layout_entity(entity: &Entity) -> BlockLayout {
    compute_layout(entity, entity.view_mode)
}

/// Canvas-space bounding box of `entity` from its current layout.
pub fn entity_bounds(entity: &Entity) -> Rect {
    let layout = layout_entity(entity);
    Rect::from_origin(entity.position, layout.width, layout.height)
}

/// Estimated line count of the raw schema text for `field_count` fields.
pub fn raw_line_count(field_count: usize) -> usize {
    2 + field_count * (2 + PROPERTIES_PER_FIELD)
}

fn layout_compact(entity: &Entity, rows: &mut Vec<LayoutRow>) -> f32 {
    let mut y = HEADER_HEIGHT + VERTICAL_PADDING;

    for field in &entity.fields {
        rows.push(LayoutRow {
            kind: RowKind::Field,
            y,
            height: ROW_HEIGHT,
            cells: smallvec![
                TextCell {
                    text: field.name.clone(),
                    x: HORIZONTAL_PADDING,
                    width: NAME_CELL_WIDTH - HORIZONTAL_PADDING,
                    align: TextAlign::Left,
                    font_size: ROW_FONT_SIZE,
                    italic: false,
                    bold: field.primary_key,
                },
                TextCell {
                    text: field.field_type.clone(),
                    x: NAME_CELL_WIDTH,
                    width: TYPE_CELL_WIDTH - HORIZONTAL_PADDING,
                    align: TextAlign::Right,
                    font_size: TYPE_FONT_SIZE,
                    italic: true,
                    bold: false,
                },
            ],
        });
        y += ROW_HEIGHT;
    }

    if !entity.methods.is_empty() {
        rows.push(LayoutRow {
            kind: RowKind::Divider,
            y,
            height: DIVIDER_HEIGHT,
            cells: SmallVec::new(),
        });
        y += DIVIDER_HEIGHT;
    }

    for method in &entity.methods {
        rows.push(LayoutRow {
            kind: RowKind::Method,
            y,
            height: ROW_HEIGHT,
            cells: smallvec![TextCell {
                text: method.name.clone(),
                x: HORIZONTAL_PADDING,
                width: BLOCK_WIDTH - 2.0 * HORIZONTAL_PADDING,
                align: TextAlign::Left,
                font_size: ROW_FONT_SIZE,
                italic: false,
                bold: false,
            }],
        });
        y += ROW_HEIGHT;
    }

    y + VERTICAL_PADDING
}

fn layout_raw(entity: &Entity, rows: &mut Vec<LayoutRow>) -> f32 {
    let text_height = raw_line_count(entity.fields.len()) as f32 * RAW_LINE_HEIGHT;
    rows.push(LayoutRow {
        kind: RowKind::Raw,
        y: HEADER_HEIGHT + VERTICAL_PADDING,
        height: text_height,
        cells: smallvec![TextCell {
            text: emit_raw_schema(entity),
            x: HORIZONTAL_PADDING,
            width: BLOCK_WIDTH - 2.0 * HORIZONTAL_PADDING,
            align: TextAlign::Left,
            font_size: RAW_LINE_HEIGHT,
            italic: false,
            bold: false,
        }],
    });
    HEADER_HEIGHT + text_height + 2.0 * VERTICAL_PADDING
}

fn title_row(name: &str) -> LayoutRow {
    LayoutRow {
        kind: RowKind::Title,
        y: 0.0,
        height: HEADER_HEIGHT,
        cells: smallvec![TextCell {
            text: name.to_string(),
            x: HORIZONTAL_PADDING,
            width: BLOCK_WIDTH - 2.0 * HORIZONTAL_PADDING,
            align: TextAlign::Center,
            font_size: TITLE_FONT_SIZE,
            italic: false,
            bold: false,
        }],
    }
}

// ─── Background grid ─────────────────────────────────────────────────────

/// The canvas (viewport) dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Distance between grid lines in canvas units.
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { spacing: 20.0 }
    }
}

/// Upper bound on grid lines per axis.
pub const MAX_GRID_LINES: usize = 4096;

/// Positions of the background grid lines covering `viewport`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// x of each vertical line.
    pub columns: Vec<f32>,
    /// y of each horizontal line.
    pub rows: Vec<f32>,
}

/// Grid lines at every multiple of `grid.spacing` inside the viewport.
///
/// A non-positive or non-finite spacing yields an empty grid. An axis that
/// would need more than [`MAX_GRID_LINES`] lines gets none.
pub fn background_grid(viewport: Viewport, grid: &GridConfig) -> GridLayout {
    if !(grid.spacing.is_finite() && grid.spacing > 0.0) {
        return GridLayout::default();
    }
    GridLayout {
        columns: grid_stops(viewport.width, grid.spacing),
        rows: grid_stops(viewport.height, grid.spacing),
    }
}

fn grid_stops(extent: f32, spacing: f32) -> Vec<f32> {
    if !(extent.is_finite() && extent > 0.0) {
        return Vec::new();
    }
    let count = (extent / spacing).ceil();
    if !count.is_finite() || count > MAX_GRID_LINES as f32 {
        log::trace!("grid: {count} lines over {extent}, skipped");
        return Vec::new();
    }
    (0..count as usize).map(|i| i as f32 * spacing).collect()
}
