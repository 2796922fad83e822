//! UI boundary consumed by the game loop
//!
//! The DOM implementation lives in the web entry point; tests use recorders.

/// Label state of the score submission button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmitState {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitState::Idle => "Submit Score",
            SubmitState::Submitting => "Submitting...",
            SubmitState::Succeeded => "Submitted!",
            SubmitState::Failed => "Submit Failed",
        }
    }

    /// Button accepts clicks only when idle
    pub fn enabled(&self) -> bool {
        *self == SubmitState::Idle
    }
}

/// Screens, counters and cues shown around the playfield
pub trait Ui {
    fn show_start_screen(&mut self, visible: bool);
    fn show_end_screen(&mut self, visible: bool);
    fn set_score(&mut self, score: u64);
    fn set_high_score(&mut self, score: u64);
    fn set_final_score(&mut self, score: u64);
    /// Transient milestone cue; must clear itself after `duration_ms`
    fn flash(&mut self, duration_ms: u32);
    fn set_submit_state(&mut self, state: SubmitState);
}
