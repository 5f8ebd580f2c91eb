//! Execution state for TinyVM

/// Lifecycle of the fetch-decode-execute loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecState {
    /// Not running; the ip doubles as the encoder's write cursor
    #[default]
    Idle,
    /// Inside `run`
    Running,
    /// `ret` executed; the loop exits and the machine returns to Idle
    Halted,
}

impl ExecState {
    pub fn is_running(&self) -> bool {
        matches!(self, ExecState::Running)
    }
}

/// Why `run` stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// `ret` instruction
    Ret,
    /// Configured cycle limit reached
    CycleLimit,
}
