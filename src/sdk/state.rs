// src/sdk/state.rs
//! Local mirror of the native session lifecycle
//!
//! The native library enforces call ordering only through its return codes;
//! an out-of-sequence command comes back as `ID_WRONG_SEQUENCY_OF_COMMAND`
//! after the round trip. The wrapper keeps this local mirror so
//! known-illegal transitions are rejected before the native call is made,
//! while every allowed call still passes through and surfaces the native
//! code untouched.

/// Where the implicit native session currently is.
///
/// `StopAcquisition` resets the vendor session entirely, so `Stopped`
/// behaves like `Uninitialized` for the purposes of starting over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Initialized,
    Acquiring,
    Paused,
    Stopped,
}

/// Lifecycle commands the wrapper sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Init,
    Start,
    Pause,
    Resume,
    Stop,
}

impl SessionPhase {
    /// Whether `command` is legal from this phase.
    pub fn permits(self, command: SessionCommand) -> bool {
        use SessionCommand::*;
        use SessionPhase::*;
        match command {
            Init => matches!(self, Uninitialized | Stopped),
            Start => matches!(self, Initialized),
            Pause => matches!(self, Acquiring),
            Resume => matches!(self, Paused),
            Stop => matches!(self, Acquiring | Paused),
        }
    }

    /// The phase after `command` succeeds. Caller checks `permits` first;
    /// applying a forbidden command leaves the phase unchanged.
    pub fn after(self, command: SessionCommand) -> SessionPhase {
        use SessionCommand::*;
        use SessionPhase::*;
        if !self.permits(command) {
            return self;
        }
        match command {
            Init => Initialized,
            Start => Acquiring,
            Pause => Paused,
            Resume => Acquiring,
            Stop => Stopped,
        }
    }
}
