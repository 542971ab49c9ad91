//! VAT Playback - CPU evaluation of glTF rigs
//!
//! Evaluates keyframe channels into node poses and deforms mesh parts with
//! linear-blend skinning, exposing the result through the baker's
//! [`vat_bake::AnimationPlayer`] trait.

mod keyframe;
mod player;
mod pose;
mod skinning;

pub use keyframe::{apply_channel, sample_pose};
pub use player::RigPlayer;
pub use pose::{Pose, Transform};
pub use skinning::{deform_part, joint_matrices};
