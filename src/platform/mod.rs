//! Platform abstraction layer
//!
//! Frame scheduling for the two hosts:
//! - `browser`: requestAnimationFrame (wasm32 only)
//! - `headless`: virtual clock for the native runner and tests

#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserFrames;
pub use headless::{HeadlessDriver, ManualFrames};
