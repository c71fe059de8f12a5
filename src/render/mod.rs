pub mod directive;
pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

pub use directive::{cues, Color, Cue, DrawDirective, TextSlot};
pub use skeleton::SKELETON_BONES;
#[cfg(feature = "desktop")]
pub use minifb::Key;
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;
