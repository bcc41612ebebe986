// Animation mixer: named clip actions with crossfade and finish notification

use std::collections::HashMap;

use log::debug;

/// Metadata for a single named animation clip.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Name of the clip (e.g., "idle", "punch", "slash")
    pub name: String,
    /// Total clip duration in seconds
    pub duration: f32,
    /// Whether the clip repeats by default
    pub looping: bool,
}

impl AnimationClip {
    pub fn new(name: &str, duration: f32, looping: bool) -> Self {
        Self {
            name: name.to_string(),
            duration,
            looping,
        }
    }

    /// Create a repeating clip (idle poses and the like)
    pub fn looping(name: &str, duration: f32) -> Self {
        Self::new(name, duration, true)
    }

    /// Create a one-shot clip (attacks, reactions, deaths)
    pub fn one_shot(name: &str, duration: f32) -> Self {
        Self::new(name, duration, false)
    }
}

/// Weight ramp applied to an action during a crossfade.
#[derive(Debug)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Fade {
    fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state for one clip's action.
#[derive(Debug)]
struct ActionState {
    time: f32,
    playing: bool,
    loop_once: bool,
    weight: f32,
    fade: Option<Fade>,
    finished_armed: bool,
    finished: bool,
}

impl ActionState {
    fn new() -> Self {
        Self {
            time: 0.0,
            playing: false,
            loop_once: false,
            weight: 1.0,
            fade: None,
            finished_armed: false,
            finished: false,
        }
    }
}

/// One named entry in the mixer: clip metadata plus its playable action.
#[derive(Debug)]
struct AnimationEntry {
    clip: AnimationClip,
    action: ActionState,
}

/// Drives playback for a character's set of animation actions.
///
/// This is the surface the combat core needs from the animation subsystem:
/// clip durations, play/reset/loop-once, weight crossfades, and one-shot
/// "finished" notifications for clips whose listener has been armed. Skeletal
/// and mesh detail never appear here.
#[derive(Debug, Default)]
pub struct Mixer {
    entries: HashMap<String, AnimationEntry>,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a clip. Called once at load time; clip metadata is read-only
    /// afterwards.
    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.entries.insert(
            clip.name.clone(),
            AnimationEntry {
                clip,
                action: ActionState::new(),
            },
        );
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Duration of a clip in seconds, if registered.
    pub fn duration(&self, name: &str) -> Option<f32> {
        self.entries.get(name).map(|e| e.clip.duration)
    }

    /// Start (or continue) playing an action. Does not rewind.
    pub fn play(&mut self, name: &str) {
        let Some(entry) = self.entries.get_mut(name) else {
            debug!("play requested for unknown clip '{name}'");
            return;
        };
        entry.action.playing = true;
    }

    /// Rewind an action to its start and clear its finished flag.
    pub fn reset(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.action.time = 0.0;
            entry.action.finished = false;
        }
    }

    /// Make an action play once and clamp on its last frame.
    pub fn set_loop_once(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.action.loop_once = true;
        }
    }

    /// Blend `name` in from `prev` over `blend_secs`. The incoming action ramps
    /// from zero weight to full; the outgoing one fades to zero and stops when
    /// it gets there. `warp` matches the provider contract; time warping is a
    /// renderer concern and has no effect on combat timing.
    pub fn cross_fade_from(&mut self, name: &str, prev: &str, blend_secs: f32, warp: bool) {
        let _ = warp;
        if name == prev {
            return;
        }
        if let Some(entry) = self.entries.get_mut(name) {
            entry.action.weight = 0.0;
            entry.action.fade = Some(Fade {
                from: 0.0,
                to: 1.0,
                elapsed: 0.0,
                duration: blend_secs,
            });
        }
        if let Some(entry) = self.entries.get_mut(prev) {
            entry.action.fade = Some(Fade {
                from: entry.action.weight,
                to: 0.0,
                elapsed: 0.0,
                duration: blend_secs,
            });
        }
    }

    /// Arm the finished listener for an action. A loop-once action that runs
    /// past its end reports exactly one finish while armed.
    pub fn arm_finished(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.action.finished_armed = true;
        }
    }

    /// Detach the finished listener. Safe to call when not armed.
    pub fn disarm_finished(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.action.finished_armed = false;
        }
    }

    pub fn is_finished_armed(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .map(|e| e.action.finished_armed)
            .unwrap_or(false)
    }

    /// Advance all playing actions and fades by `dt` seconds. Returns the names
    /// of armed actions that finished during this step.
    pub fn advance(&mut self, dt: f32) -> Vec<String> {
        let mut finished = Vec::new();

        for entry in self.entries.values_mut() {
            // Weight ramps run even for actions that are stopping
            if let Some(fade) = entry.action.fade.as_mut() {
                fade.elapsed += dt;
                entry.action.weight = fade.value();
                if fade.done() {
                    let faded_out = entry.action.weight <= 0.0;
                    entry.action.fade = None;
                    if faded_out {
                        entry.action.playing = false;
                    }
                }
            }

            if !entry.action.playing || entry.clip.duration <= 0.0 {
                continue;
            }

            entry.action.time += dt;

            if entry.action.loop_once {
                if entry.action.time >= entry.clip.duration && !entry.action.finished {
                    // Clamp on the final pose; fire the listener at most once
                    entry.action.time = entry.clip.duration;
                    entry.action.playing = false;
                    entry.action.finished = true;
                    if entry.action.finished_armed {
                        finished.push(entry.clip.name.clone());
                    }
                }
            } else if entry.clip.looping {
                while entry.action.time >= entry.clip.duration {
                    entry.action.time -= entry.clip.duration;
                }
            }
        }

        finished
    }

    /// Current playback time of an action in seconds.
    pub fn time(&self, name: &str) -> Option<f32> {
        self.entries.get(name).map(|e| e.action.time)
    }

    /// Playback progress in [0, 1] (unrounded; callers round as needed).
    pub fn normalized_progress(&self, name: &str) -> Option<f32> {
        self.entries.get(name).and_then(|e| {
            if e.clip.duration > 0.0 {
                Some(e.action.time / e.clip.duration)
            } else {
                None
            }
        })
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .map(|e| e.action.playing)
            .unwrap_or(false)
    }

    pub fn weight(&self, name: &str) -> Option<f32> {
        self.entries.get(name).map(|e| e.action.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mixer_with(clips: &[AnimationClip]) -> Mixer {
        let mut mixer = Mixer::new();
        for clip in clips {
            mixer.add_clip(clip.clone());
        }
        mixer
    }

    #[test]
    fn test_clip_lookup() {
        let mixer = mixer_with(&[AnimationClip::one_shot("punch", 1.2)]);
        assert!(mixer.has_clip("punch"));
        assert_eq!(mixer.duration("punch"), Some(1.2));
        assert_eq!(mixer.duration("missing"), None);
    }

    #[test]
    fn test_play_and_advance() {
        let mut mixer = mixer_with(&[AnimationClip::looping("idle", 2.0)]);
        mixer.play("idle");
        mixer.advance(0.5);
        assert_relative_eq!(mixer.time("idle").unwrap(), 0.5);
        assert!(mixer.is_playing("idle"));
    }

    #[test]
    fn test_looping_wraps() {
        let mut mixer = mixer_with(&[AnimationClip::looping("idle", 1.0)]);
        mixer.play("idle");
        mixer.advance(2.3);
        let t = mixer.time("idle").unwrap();
        assert!(t >= 0.0 && t < 1.0);
    }

    #[test]
    fn test_loop_once_clamps_and_stops() {
        let mut mixer = mixer_with(&[AnimationClip::one_shot("punch", 1.0)]);
        mixer.set_loop_once("punch");
        mixer.play("punch");
        mixer.advance(1.5);
        assert_relative_eq!(mixer.time("punch").unwrap(), 1.0);
        assert!(!mixer.is_playing("punch"));
    }

    #[test]
    fn test_finished_fires_only_when_armed() {
        let mut mixer = mixer_with(&[AnimationClip::one_shot("punch", 1.0)]);
        mixer.set_loop_once("punch");
        mixer.play("punch");
        let finished = mixer.advance(1.5);
        assert!(finished.is_empty(), "unarmed finish must not be reported");

        mixer.reset("punch");
        mixer.arm_finished("punch");
        mixer.play("punch");
        let finished = mixer.advance(1.5);
        assert_eq!(finished, vec!["punch".to_string()]);
    }

    #[test]
    fn test_finished_fires_at_most_once() {
        let mut mixer = mixer_with(&[AnimationClip::one_shot("punch", 1.0)]);
        mixer.set_loop_once("punch");
        mixer.arm_finished("punch");
        mixer.play("punch");
        assert_eq!(mixer.advance(1.5).len(), 1);
        assert!(mixer.advance(0.5).is_empty());
    }

    #[test]
    fn test_disarm_suppresses_finish() {
        let mut mixer = mixer_with(&[AnimationClip::one_shot("punch", 1.0)]);
        mixer.set_loop_once("punch");
        mixer.arm_finished("punch");
        mixer.disarm_finished("punch");
        mixer.play("punch");
        assert!(mixer.advance(1.5).is_empty());
    }

    #[test]
    fn test_crossfade_ramps_weights() {
        let mut mixer = mixer_with(&[
            AnimationClip::looping("idle", 2.0),
            AnimationClip::one_shot("punch", 1.0),
        ]);
        mixer.play("idle");
        mixer.cross_fade_from("punch", "idle", 0.5, true);
        mixer.play("punch");

        assert_relative_eq!(mixer.weight("punch").unwrap(), 0.0);

        mixer.advance(0.25);
        assert_relative_eq!(mixer.weight("punch").unwrap(), 0.5);
        assert_relative_eq!(mixer.weight("idle").unwrap(), 0.5);

        mixer.advance(0.25);
        assert_relative_eq!(mixer.weight("punch").unwrap(), 1.0);
        assert_relative_eq!(mixer.weight("idle").unwrap(), 0.0);
        assert!(!mixer.is_playing("idle"), "faded-out action stops");
    }

    #[test]
    fn test_reset_clears_finish() {
        let mut mixer = mixer_with(&[AnimationClip::one_shot("react", 0.8)]);
        mixer.set_loop_once("react");
        mixer.arm_finished("react");
        mixer.play("react");
        assert_eq!(mixer.advance(1.0).len(), 1);

        mixer.reset("react");
        mixer.play("react");
        assert_relative_eq!(mixer.time("react").unwrap(), 0.0);
        assert_eq!(mixer.advance(1.0).len(), 1, "reset re-enables the finish");
    }

    #[test]
    fn test_normalized_progress() {
        let mut mixer = mixer_with(&[AnimationClip::one_shot("punch", 2.0)]);
        mixer.set_loop_once("punch");
        mixer.play("punch");
        mixer.advance(0.5);
        assert_relative_eq!(mixer.normalized_progress("punch").unwrap(), 0.25);
    }

    #[test]
    fn test_unknown_clip_is_silent() {
        let mut mixer = Mixer::new();
        mixer.play("ghost");
        mixer.reset("ghost");
        mixer.arm_finished("ghost");
        assert!(!mixer.is_playing("ghost"));
        assert!(!mixer.is_finished_armed("ghost"));
    }
}
