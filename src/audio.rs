/// Sound cue requests and the engine-hum state machine.
///
/// Playback itself belongs to whoever implements `SoundSink`; this module
/// only decides *when* a cue should be requested.

use tracing::trace;

/// Speed above which a stopped engine starts humming.
pub const HUM_START_SPEED: f32 = 35.0;
/// Speed below which a running engine winds down.
pub const HUM_STOP_SPEED: f32 = 25.0;
/// Seconds between repeated cabin cues while the engine runs.
pub const CABIN_INTERVAL: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    JetStart,
    JetStop,
    JetCabin,
    Explosion,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::JetStart => "jet-start",
            SoundCue::JetStop => "jet-stop",
            SoundCue::JetCabin => "jet-cabin",
            SoundCue::Explosion => "explosion",
        }
    }
}

/// Fire-and-forget sound playback.
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Drops every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl SoundSink for Silence {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Remembers every requested cue in order.
#[derive(Clone, Debug, Default)]
pub struct CueLog {
    pub cues: Vec<SoundCue>,
}

impl SoundSink for CueLog {
    fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

// ── Engine hum ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
}

/// Two-threshold filter over ship speed so the hum does not chatter when
/// the speed hovers around a single threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineHum {
    state: EngineState,
    /// Seconds since the last transition or cue.
    timer: f32,
}

impl EngineHum {
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Force the engine silent without requesting a cue.
    pub fn stop(&mut self) {
        self.state = EngineState::Stopped;
    }

    /// Feed one frame of elapsed time and the current speed.
    pub fn step<S: SoundSink>(&mut self, speed: f32, dt: f32, sink: &mut S) {
        self.timer += dt;

        match self.state {
            EngineState::Stopped => {
                if speed > HUM_START_SPEED {
                    self.state = EngineState::Running;
                    self.cue(SoundCue::JetStart, sink);
                }
            }
            EngineState::Running => {
                if speed < HUM_STOP_SPEED {
                    self.state = EngineState::Stopped;
                    self.cue(SoundCue::JetStop, sink);
                } else if self.timer > CABIN_INTERVAL {
                    self.cue(SoundCue::JetCabin, sink);
                }
            }
        }
    }

    fn cue<S: SoundSink>(&mut self, cue: SoundCue, sink: &mut S) {
        trace!(cue = cue.name(), "engine hum cue");
        sink.play(cue);
        self.timer = 0.0;
    }
}
