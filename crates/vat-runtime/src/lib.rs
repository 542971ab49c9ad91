//! VAT Runtime - Playback-side components for baked vertex animations
//!
//! The produced `VatObject` carries the merged mesh and an `AnimationSelector`
//! choosing which baked clip material is rendered. `AutoCycle` steps through
//! the clips on a timer for previewing.

mod auto_cycle;
mod error;
mod object;
mod selector;

pub use auto_cycle::AutoCycle;
pub use error::SelectorError;
pub use object::{RenderMaterials, VatObject};
pub use selector::{AnimationSelector, Selection, SelectorState};
