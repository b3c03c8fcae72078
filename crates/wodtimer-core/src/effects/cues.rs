use serde::{Deserialize, Serialize};

/// The four audio cues an engine can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cue {
    /// One per pre-roll second.
    CountdownBeep,
    /// Pre-roll reached zero.
    Start,
    /// Ten seconds left before a fixed end.
    Alert,
    /// Segment complete. Fires once per segment.
    Finish,
}

/// Plays cues. Muting and volume are the implementor's business.
pub trait CuePlayer {
    fn play(&self, cue: Cue);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play(&self, _cue: Cue) {}
}
