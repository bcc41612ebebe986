// Effect and sound side channel

use log::debug;

/// Fire-and-forget sink for cosmetic feedback. The core calls these as one-way
/// notifications; there is no completion signal and no error path.
pub trait EffectSink {
    /// Show a named visual effect overlay (e.g., a sword-slash sprite).
    fn play_effect(&mut self, name: &str);
    /// Play a named sound (e.g., "slash", "block").
    fn play_sound(&mut self, name: &str);
}

/// Sink that reports effects and sounds through the logger. Used by the
/// headless demo in place of a real audio/overlay backend.
#[derive(Debug, Default)]
pub struct LogSink;

impl EffectSink for LogSink {
    fn play_effect(&mut self, name: &str) {
        debug!("effect: {name}");
    }

    fn play_sound(&mut self, name: &str) {
        debug!("sound: {name}");
    }
}

/// Sink that drops everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn play_effect(&mut self, _name: &str) {}
    fn play_sound(&mut self, _name: &str) {}
}

/// Sink that records every call, for asserting on cosmetic side effects.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub effects: Vec<String>,
    pub sounds: Vec<String>,
}

impl EffectSink for RecordingSink {
    fn play_effect(&mut self, name: &str) {
        self.effects.push(name.to_string());
    }

    fn play_sound(&mut self, name: &str) {
        self.sounds.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_captures_calls() {
        let mut sink = RecordingSink::default();
        sink.play_effect("slash");
        sink.play_sound("block");
        sink.play_sound("block");

        assert_eq!(sink.effects, vec!["slash"]);
        assert_eq!(sink.sounds, vec!["block", "block"]);
    }

    #[test]
    fn test_null_sink_is_silent() {
        let mut sink = NullSink;
        sink.play_effect("slash");
        sink.play_sound("slash");
    }
}
