pub mod hit;
pub mod paint;

pub use hit::{hit_test, hit_test_all};
pub use paint::{CanvasTheme, FrameState, Primitive, Shape, build_display_list, paint_scene};
