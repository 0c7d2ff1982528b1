pub mod gesture;
pub mod input;
pub mod palette;
pub mod session;
pub mod sync;

pub use gesture::{BoundsLookup, GestureState, Intent, Intents, InteractionController};
pub use input::PointerEvent;
pub use palette::PaletteItem;
pub use session::EditSession;
pub use sync::{DiagramEngine, EditorConfig};
