use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::SelectorError;

/// Lifecycle of an [`AnimationSelector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectorState<M> {
    /// No materials bound yet.
    Idle,
    /// Materials bound; `index` is taken modulo `materials.len()` when resolved.
    Active { materials: Vec<M>, index: usize },
}

/// The material a selector resolved to after a change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a, M> {
    /// Stored index, not wrapped.
    pub index: usize,
    /// Position in the material list actually used.
    pub slot: usize,
    pub material: &'a M,
}

/// Chooses which baked animation material is rendered.
///
/// Callers must serialize `set_active`/`next`; `&mut self` enforces it within one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "M: Deserialize<'de>"))]
pub struct AnimationSelector<M> {
    #[serde(deserialize_with = "deserialize_state")]
    state: SelectorState<M>,
}

/// `Active` with no materials is not a reachable state; load it as `Idle`.
fn deserialize_state<'de, D, M>(deserializer: D) -> Result<SelectorState<M>, D::Error>
where
    D: Deserializer<'de>,
    M: Deserialize<'de>,
{
    Ok(match SelectorState::deserialize(deserializer)? {
        SelectorState::Active { materials, .. } if materials.is_empty() => {
            warn!("Loaded an animation selector without materials as idle");
            SelectorState::Idle
        }
        state => state,
    })
}

impl<M> Default for AnimationSelector<M> {
    fn default() -> Self {
        Self {
            state: SelectorState::Idle,
        }
    }
}

impl<M> AnimationSelector<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A selector already bound to `materials`; idle when the list is empty.
    pub fn with_materials(materials: Vec<M>) -> Self {
        let mut selector = Self::new();
        if let Err(err) = selector.init(materials) {
            // Unreachable for a fresh selector.
            warn!("Animation selector rejected its materials: {}", err);
        }
        selector
    }

    /// Bind the materials and move to `Active` with index 0.
    ///
    /// An empty list leaves the selector `Idle`. A selector can only be initialized once.
    pub fn init(&mut self, materials: Vec<M>) -> Result<(), SelectorError> {
        if let SelectorState::Active { materials, .. } = &self.state {
            return Err(SelectorError::AlreadyInitialized(materials.len()));
        }
        if materials.is_empty() {
            warn!("Animation selector initialized without materials");
            return Ok(());
        }
        debug!("Animation selector bound to {} materials", materials.len());
        self.state = SelectorState::Active {
            materials,
            index: 0,
        };
        Ok(())
    }

    pub fn state(&self) -> &SelectorState<M> {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SelectorState::Active { .. })
    }

    pub fn materials(&self) -> &[M] {
        match &self.state {
            SelectorState::Idle => &[],
            SelectorState::Active { materials, .. } => materials,
        }
    }

    /// The stored, unwrapped index. `None` while idle.
    pub fn index(&self) -> Option<usize> {
        match self.state {
            SelectorState::Idle => None,
            SelectorState::Active { index, .. } => Some(index),
        }
    }

    /// The material currently rendered.
    pub fn current(&self) -> Option<Selection<'_, M>> {
        match &self.state {
            SelectorState::Idle => None,
            SelectorState::Active { materials, index } => {
                let slot = index.checked_rem(materials.len())?;
                Some(Selection {
                    index: *index,
                    slot,
                    material: &materials[slot],
                })
            }
        }
    }

    /// Store `index` and switch to `materials[index mod len]`.
    pub fn set_active(&mut self, index: usize) -> Result<Selection<'_, M>, SelectorError> {
        match &mut self.state {
            SelectorState::Idle => {
                warn!("set_active({}) ignored: no animation materials bound", index);
                Err(SelectorError::Underflow)
            }
            SelectorState::Active {
                materials,
                index: current,
            } => {
                let Some(slot) = index.checked_rem(materials.len()) else {
                    warn!("set_active({}) ignored: material list is empty", index);
                    return Err(SelectorError::Underflow);
                };
                *current = index;
                Ok(Selection {
                    index,
                    slot,
                    material: &materials[slot],
                })
            }
        }
    }

    /// Advance to the following animation, wrapping around the material list.
    pub fn next(&mut self) -> Result<Selection<'_, M>, SelectorError> {
        self.advance(1)
    }

    /// Advance by `steps` animations at once. The stored index wraps at `usize::MAX`.
    pub fn advance(&mut self, steps: usize) -> Result<Selection<'_, M>, SelectorError> {
        let Some(index) = self.index() else {
            warn!("advance({}) ignored: no animation materials bound", steps);
            return Err(SelectorError::Underflow);
        };
        self.set_active(index.wrapping_add(steps))
    }
}
