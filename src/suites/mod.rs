pub mod backend;
pub mod integration;

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::testing::Tester;

/// Named groups of test cases the binary can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Suite {
    /// One request per API route
    #[default]
    Backend,
    /// Chained directive workflows
    Integration,
    /// Backend cases followed by the integration workflows
    All,
}

impl Suite {
    pub fn title(self) -> &'static str {
        match self {
            Suite::Backend => "GhostChart API Testing",
            Suite::Integration => "GhostChart Integration Testing",
            Suite::All => "GhostChart API & Integration Testing",
        }
    }

    pub fn results_heading(self) -> &'static str {
        match self {
            Suite::Backend => "FINAL RESULTS",
            Suite::Integration => "INTEGRATION TEST RESULTS",
            Suite::All => "COMBINED RESULTS",
        }
    }

    pub async fn run(self, tester: &mut Tester) {
        match self {
            Suite::Backend => backend::run(tester).await,
            Suite::Integration => integration::run(tester).await,
            Suite::All => {
                backend::run(tester).await;
                integration::run(tester).await;
            }
        }
    }
}

impl Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Suite::Backend => "backend",
            Suite::Integration => "integration",
            Suite::All => "all",
        };
        write!(f, "{label}")
    }
}
