use std::fmt;

/// One scripted call against the rollup wallet service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Setup,
    Register,
    Deposit,
    Withdraw,
    Transfer,
}

impl Step {
    /// Endpoint path relative to the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Step::Setup => "setup",
            Step::Register => "register",
            Step::Deposit => "deposit",
            Step::Withdraw => "withdraw",
            Step::Transfer => "transfer",
        }
    }

    /// Line printed to stdout when the step does not return 200.
    ///
    /// Withdraw shares the deposit message; operators grep for it.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Step::Setup => "ERROR",
            Step::Register => "ERROR REGISTER",
            Step::Deposit | Step::Withdraw => "ERROR DEPOSIT",
            Step::Transfer => "ERROR TRANSFER",
        }
    }

    /// Progress banner logged before the step starts.
    pub fn banner(&self) -> &'static str {
        match self {
            Step::Setup => "Start setup...",
            Step::Register => "Start register test",
            Step::Deposit => "Start deposit test",
            Step::Withdraw => "Start withdraw test",
            Step::Transfer => "Start transfer test (CTRL+c to stop)",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
