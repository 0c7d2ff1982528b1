//! WASM bridge for the ERD canvas: exposes the diagram engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. Every pointer handler
//! returns the resulting intents as a JSON array so the page can update
//! emphasis and selection; geometry is fetched with [`DiagramCanvas::get_layouts`].

use erd_core::geometry::Point;
use erd_core::id::NodeId;
use erd_core::layout::{BlockLayout, GridConfig, Viewport, background_grid};
use erd_core::model::{Field, Method};
use erd_editor::gesture::Intent;
use erd_editor::palette::PaletteItem;
use erd_editor::session::EditSession;
use erd_editor::sync::{DiagramEngine, EditorConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
///
/// Holds the diagram engine and at most one open edit session (the modal
/// form edits one entity at a time).
#[wasm_bindgen]
pub struct DiagramCanvas {
    engine: DiagramEngine,
    session: Option<EditSession>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntityLayout<'a> {
    id: NodeId,
    x: f32,
    y: f32,
    selected: bool,
    hovered: bool,
    #[serde(flatten)]
    layout: &'a BlockLayout,
}

#[wasm_bindgen]
impl DiagramCanvas {
    /// Create a canvas controller for a viewport of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();

        let config = EditorConfig {
            viewport: Viewport { width, height },
            grid: GridConfig::default(),
        };
        Self {
            engine: DiagramEngine::new(config),
            session: None,
        }
    }

    /// Resize the canvas viewport. Only the background grid depends on it;
    /// see [`DiagramCanvas::get_grid`].
    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.resize(Viewport { width, height });
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> String {
        let intents = self.engine.pointer_down(Point::new(x, y));
        intents_json(&intents)
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> String {
        let intents = self.engine.pointer_move(Point::new(x, y));
        intents_json(&intents)
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> String {
        let intents = self.engine.pointer_up(Point::new(x, y));
        intents_json(&intents)
    }

    /// Report a native drag step of node `id`, anchored at `(x, y)`.
    pub fn handle_drag_move(&mut self, id: &str, x: f32, y: f32) -> String {
        let intents = self.engine.drag_move(NodeId::intern(id), Point::new(x, y));
        intents_json(&intents)
    }

    pub fn handle_drag_end(&mut self, id: &str, x: f32, y: f32) -> String {
        let intents = self.engine.drag_end(NodeId::intern(id), Point::new(x, y));
        intents_json(&intents)
    }

    /// Drop a palette item (`"rect"` or `"circle"`) at `(x, y)`.
    /// Returns the new node ID, or an empty string for an unknown item.
    pub fn drop_item(&mut self, kind: &str, x: f32, y: f32) -> String {
        PaletteItem::from_name(kind)
            .and_then(|item| self.engine.drop_item(item, Point::new(x, y)))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── Selection & view ────────────────────────────────────────────────

    /// Get the selected entity ID, or empty string if none.
    pub fn get_selected_id(&self) -> String {
        self.engine
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select an entity by ID; an empty string clears the selection.
    /// Returns `true` if the selection changed to something valid.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return self.engine.select(None);
        }
        self.engine.select(Some(NodeId::intern(id)))
    }

    /// Flip an entity between compact and raw view.
    /// Returns the new mode (`"compact"` / `"raw"`), or empty string.
    pub fn toggle_view_mode(&mut self, id: &str) -> String {
        self.engine
            .toggle_view_mode(NodeId::intern(id))
            .and_then(|mode| serde_json::to_value(mode).ok())
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    // ─── Edit session API ────────────────────────────────────────────────

    /// Open the edit form for entity `id`, or for a new entity when `id`
    /// is empty. Replaces any session already open. Returns `false` for an
    /// unknown ID.
    pub fn begin_edit(&mut self, id: &str, x: f32, y: f32) -> bool {
        let session = if id.is_empty() {
            Some(EditSession::new().with_position(Point::new(x, y)))
        } else {
            self.engine.edit_entity(NodeId::intern(id))
        };
        let opened = session.is_some();
        self.session = session;
        opened
    }

    pub fn set_entity_name(&mut self, name: &str) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.set_name(name);
                true
            }
            None => false,
        }
    }

    /// Append a field from JSON
    /// (`{"name":..,"type":..,"primaryKey":..,"notNull":..}`).
    pub fn add_field(&mut self, json: &str) -> Result<(), JsValue> {
        let field: Field = serde_json::from_str(json).map_err(to_js_error)?;
        self.open_session()?.add_field(field);
        Ok(())
    }

    /// Append a method from JSON (`{"name":..}`).
    pub fn add_method(&mut self, json: &str) -> Result<(), JsValue> {
        let method: Method = serde_json::from_str(json).map_err(to_js_error)?;
        self.open_session()?.add_method(method);
        Ok(())
    }

    /// Commit the open session. Returns the committed entity as JSON, or
    /// an empty string when nothing was committed. The session is closed.
    pub fn commit_edit(&mut self) -> String {
        let Some(session) = self.session.take() else {
            return String::new();
        };
        self.engine
            .commit_session(&session)
            .and_then(|entity| serde_json::to_string(&entity).ok())
            .unwrap_or_default()
    }

    pub fn discard_edit(&mut self) {
        if let Some(session) = self.session.take() {
            session.discard();
        }
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// Layout of every entity as a JSON array, in paint order.
    pub fn get_layouts(&self) -> String {
        let selected = self.engine.selected();
        let hovered = self.engine.controller().hovered();
        let layouts = self.engine.layouts();
        let diagram = self.engine.diagram();
        let out: Vec<EntityLayout> = layouts
            .iter()
            .filter_map(|(id, layout)| {
                let entity = diagram.entity(*id)?;
                Some(EntityLayout {
                    id: *id,
                    x: entity.position.x,
                    y: entity.position.y,
                    selected: selected == Some(*id),
                    hovered: hovered == Some(*id),
                    layout,
                })
            })
            .collect();
        serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
    }

    /// Background grid lines for the current viewport as JSON
    /// (`{"columns":[..],"rows":[..]}`).
    pub fn get_grid(&self) -> String {
        let config = &self.engine.config;
        serde_json::to_string(&background_grid(config.viewport, &config.grid))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// The full diagram (entities, circles, connections) as JSON.
    pub fn get_diagram(&self) -> String {
        serde_json::to_string(self.engine.diagram()).unwrap_or_else(|_| "{}".to_string())
    }

    /// The connection being drawn as JSON, or `"null"`.
    pub fn get_pending_connection(&self) -> String {
        serde_json::to_string(&self.engine.frame_state().pending)
            .unwrap_or_else(|_| "null".to_string())
    }
}

impl DiagramCanvas {
    fn open_session(&mut self) -> Result<&mut EditSession, JsValue> {
        self.session
            .as_mut()
            .ok_or_else(|| JsValue::from_str("no edit session is open"))
    }
}

fn intents_json(intents: &[Intent]) -> String {
    serde_json::to_string(intents).unwrap_or_else(|_| "[]".to_string())
}

fn to_js_error(err: serde_json::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("ERD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
