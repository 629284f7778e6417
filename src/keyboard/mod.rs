pub mod handlers;
pub mod keysyms;

pub use handlers::{Arg, ButtonBinding, KeyAction, KeyBinding, clean_mask};
