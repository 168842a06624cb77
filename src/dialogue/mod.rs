//! Dialogue analysis: dialogue-act classification and speaker turns.

pub mod act;
pub mod turns;
pub mod types;

pub use act::classify;
pub use turns::{TurnTracker, assign_speakers};
pub use types::{
    ActKind, AnnotatedSegment, DialogueAct, DialogueSegment, RawSegment, Speaker,
    TranslatedSegment,
};
