//! Query intake: typing, suggestions, dictation, recent queries and submission

pub mod controller;
pub mod debounce;
pub mod recent;


pub use controller::{
    IntakeController, IntakeEvent, IntakeOptions, IntakeView, Submission, VoiceState,
};
