//! Animation clips and the looping animator that drives them.
//!
//! A clip groups the keyframe channels an asset authored under one name
//! (e.g. a walk cycle touching several nodes). The [`Animator`] owns every
//! clip of the loaded model, advances a per-clip time cursor each frame and
//! writes the sampled transforms back into the scene graph.

use instant::Duration;

use cgmath::VectorSpace;

use crate::data_structures::scene_graph::{NodeId, SceneGraph};

#[derive(Clone, Debug)]
pub enum Keyframes {
    Translation(Vec<cgmath::Vector3<f32>>),
    Rotation(Vec<cgmath::Quaternion<f32>>),
    Scale(Vec<cgmath::Vector3<f32>>),
}

/// One keyframe track: sorted timestamps plus the values they key.
#[derive(Clone, Debug)]
pub struct Track {
    pub timestamps: Vec<f32>,
    pub keyframes: Keyframes,
}

impl Track {
    fn duration(&self) -> f32 {
        self.timestamps.last().copied().unwrap_or(0.0)
    }

    /// Surrounding keyframe indices and the interpolation weight for `t`.
    fn sample_indices(&self, t: f32) -> (usize, usize, f32) {
        let ts = &self.timestamps;
        if ts.is_empty() {
            return (0, 0, 0.0);
        }
        if t <= ts[0] {
            return (0, 0, 0.0);
        }
        let last = ts.len() - 1;
        if t >= ts[last] {
            return (last, last, 0.0);
        }
        let next = ts.partition_point(|&stamp| stamp <= t);
        let prev = next - 1;
        let span = ts[next] - ts[prev];
        let alpha = if span > f32::EPSILON {
            (t - ts[prev]) / span
        } else {
            0.0
        };
        (prev, next, alpha)
    }
}

/// A channel binds one track to the scene-graph node it animates.
#[derive(Clone, Debug)]
pub struct Channel {
    pub node: NodeId,
    pub track: Track,
}

/// A named animation: every channel the asset authored under this name.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    /// Clip length: the largest timestamp across all channels.
    pub fn duration(&self) -> f32 {
        self.channels
            .iter()
            .map(|c| c.track.duration())
            .fold(0.0, f32::max)
    }
}

/// Playback state of one clip inside the animator.
#[derive(Clone, Debug)]
pub struct ActiveClip {
    pub clip: AnimationClip,
    pub time: f32,
    pub playing: bool,
    pub looping: bool,
}

/// Advances all clips of the loaded model and applies the sampled keyframes
/// to the node transforms. Created only when the asset carries clips.
#[derive(Clone, Debug)]
pub struct Animator {
    clips: Vec<ActiveClip>,
}

impl Animator {
    /// Start every clip in indefinite looping playback.
    /// `None` when the asset carries no animation data.
    pub fn from_clips(clips: Vec<AnimationClip>) -> Option<Self> {
        if clips.is_empty() {
            return None;
        }
        let clips = clips
            .into_iter()
            .map(|clip| ActiveClip {
                clip,
                time: 0.0,
                playing: true,
                looping: true,
            })
            .collect();
        Some(Self { clips })
    }

    pub fn active_clips(&self) -> &[ActiveClip] {
        &self.clips
    }

    pub fn active_clips_mut(&mut self) -> &mut [ActiveClip] {
        &mut self.clips
    }

    /// Advance every playing clip by `dt` and write the sampled transforms
    /// into the graph, then refresh world transforms.
    pub fn update(&mut self, dt: Duration, graph: &mut SceneGraph) {
        for active in self.clips.iter_mut() {
            if !active.playing {
                continue;
            }
            let duration = active.clip.duration();
            active.time += dt.as_secs_f32();
            if active.looping && duration > f32::EPSILON {
                active.time %= duration;
            } else {
                active.time = active.time.min(duration);
            }
            for channel in &active.clip.channels {
                apply_channel(channel, active.time, graph);
            }
        }
        graph.update_world_transforms();
    }
}

fn apply_channel(channel: &Channel, time: f32, graph: &mut SceneGraph) {
    let (prev, next, alpha) = channel.track.sample_indices(time);
    let local = &mut graph.node_mut(channel.node).local;
    match &channel.track.keyframes {
        Keyframes::Translation(values) => {
            if let (Some(a), Some(b)) = (values.get(prev), values.get(next)) {
                local.position = a.lerp(*b, alpha);
            }
        }
        Keyframes::Rotation(values) => {
            if let (Some(a), Some(b)) = (values.get(prev), values.get(next)) {
                local.rotation = a.slerp(*b, alpha);
            }
        }
        Keyframes::Scale(values) => {
            if let (Some(a), Some(b)) = (values.get(prev), values.get(next)) {
                local.scale = a.lerp(*b, alpha);
            }
        }
    }
}
