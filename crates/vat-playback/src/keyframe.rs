use glam::{Quat, Vec3};
use vat_assets::{AnimationData, ChannelData, ChannelValues, Interpolation, RigNode};

use crate::pose::Pose;

/// Keyframes around `time` and the blend factor between them.
///
/// Times before the first or after the last keyframe hold that keyframe.
fn segment(times: &[f32], time: f32, interpolation: Interpolation) -> Option<(usize, usize, f32)> {
    let last = times.len().checked_sub(1)?;
    if time <= times[0] {
        return Some((0, 0, 0.0));
    }
    if time >= times[last] {
        return Some((last, last, 0.0));
    }

    let next = times.partition_point(|&t| t <= time);
    let prev = next - 1;
    let span = times[next] - times[prev];
    let factor = match interpolation {
        Interpolation::Step => 0.0,
        Interpolation::Linear if span > f32::EPSILON => (time - times[prev]) / span,
        Interpolation::Linear => 0.0,
    };
    Some((prev, next, factor))
}

fn sample_vec3(values: &[Vec3], (prev, next, factor): (usize, usize, f32)) -> Option<Vec3> {
    let a = *values.get(prev)?;
    let b = values.get(next).copied().unwrap_or(a);
    Some(a.lerp(b, factor))
}

fn sample_quat(values: &[Quat], (prev, next, factor): (usize, usize, f32)) -> Option<Quat> {
    let a = *values.get(prev)?;
    let b = values.get(next).copied().unwrap_or(a);
    Some(a.slerp(b, factor).normalize())
}

/// Write the value of `channel` at `time` seconds into `pose`.
///
/// Channels targeting unknown nodes, or with fewer values than keyframes, are
/// ignored where they have no value.
pub fn apply_channel(channel: &ChannelData, time: f32, pose: &mut Pose) {
    let Some(key) = segment(&channel.times, time, channel.interpolation) else {
        return;
    };
    let Some(local) = pose.local_mut(channel.node) else {
        return;
    };
    match &channel.values {
        ChannelValues::Translation(values) => {
            if let Some(v) = sample_vec3(values, key) {
                local.translation = v;
            }
        }
        ChannelValues::Rotation(values) => {
            if let Some(q) = sample_quat(values, key) {
                local.rotation = q;
            }
        }
        ChannelValues::Scale(values) => {
            if let Some(v) = sample_vec3(values, key) {
                local.scale = v;
            }
        }
    }
}

/// Pose of `nodes` at `time` seconds into `animation`. Unanimated nodes keep their rest transform.
pub fn sample_pose(nodes: &[RigNode], animation: &AnimationData, time: f32) -> Pose {
    let mut pose = Pose::rest(nodes);
    for channel in &animation.channels {
        apply_channel(channel, time, &mut pose);
    }
    pose
}
