//! Entity edit sessions.
//!
//! A session owns a detached [`EntityDraft`] while the form workflow adds
//! fields and methods. Nothing reaches the [`Diagram`] until [`commit`],
//! which either creates a new entity (draft without an ID) or replaces the
//! schema of the entity the draft was seeded from.
//!
//! Field and method names are taken as given: empty names and duplicates
//! are appended like any other row.
//!
//! [`commit`]: EditSession::commit

use erd_core::geometry::Point;
use erd_core::model::{Diagram, Entity, EntityDraft, Field, Method};

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    draft: EntityDraft,
}

impl EditSession {
    /// Start a session for a brand-new entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session that is empty (`None`) or seeded with a deep copy of
    /// `existing`.
    pub fn open(existing: Option<&Entity>) -> Self {
        match existing {
            Some(entity) => Self {
                draft: EntityDraft::from_entity(entity),
            },
            None => Self::new(),
        }
    }

    /// Where a newly created entity is placed. Ignored when editing.
    pub fn with_position(mut self, position: Point) -> Self {
        self.draft.position = position;
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn add_field(&mut self, field: Field) {
        self.draft.fields.push(field);
    }

    pub fn add_method(&mut self, method: Method) {
        self.draft.methods.push(method);
    }

    pub fn draft(&self) -> &EntityDraft {
        &self.draft
    }

    /// Whether committing will create a new entity rather than update one.
    pub fn is_new(&self) -> bool {
        self.draft.id.is_none()
    }

    /// Merge the draft into `diagram` and return the committed entity.
    ///
    /// The session stays usable afterwards. A new-entity session is not
    /// bound to what it created, so committing it again creates another
    /// entity. Returns `None` when the edited entity no longer exists.
    pub fn commit(&self, diagram: &mut Diagram) -> Option<Entity> {
        let id = match self.draft.id {
            None => diagram.create_entity(&self.draft),
            Some(id) => {
                if !diagram.update_entity(id, &self.draft) {
                    return None;
                }
                id
            }
        };
        diagram.entity(id).cloned()
    }

    /// Drop the draft without touching the diagram.
    pub fn discard(self) {
        log::trace!(
            "discard draft ({} fields, {} methods)",
            self.draft.fields.len(),
            self.draft.methods.len()
        );
    }
}
