//! # Test runner
//!
//! Sends one request per named test case, compares the observed status code
//! with the expected one and keeps the run/pass tally. Every failure is
//! absorbed here: a case either passes or it does not, and the run goes on.

use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::environment::Variables;
use crate::history::{LogEntry, RunLog};
use crate::http::client::ApiClient;
use crate::http::request::RequestSpec;
use crate::http::response::{preview, preview_json};

/// Pass/fail counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub tests_run: usize,
    pub tests_passed: usize,
}

impl Tally {
    pub fn tests_failed(&self) -> usize {
        self.tests_run - self.tests_passed
    }

    /// Percentage of passed tests, `None` when nothing ran.
    pub fn success_rate(&self) -> Option<f64> {
        (self.tests_run > 0).then(|| self.tests_passed as f64 / self.tests_run as f64 * 100.0)
    }

    pub fn all_passed(&self) -> bool {
        self.tests_run > 0 && self.tests_passed == self.tests_run
    }
}

/// What a single test case hands back to the scenario that ran it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    /// Parsed response body; an empty object on failure or non-JSON bodies.
    pub body: Value,
}

impl Outcome {
    fn passed(body: Value) -> Self {
        Self {
            success: true,
            body,
        }
    }

    fn failed() -> Self {
        Self {
            success: false,
            body: empty_object(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// How a chained scenario ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum WorkflowVerdict {
    Completed,
    /// Every call passed but the payloads did not show the expected effect.
    CompletedWithWarning(String),
    /// The named step failed and the scenario stopped.
    Aborted(String),
}

impl Display for WorkflowVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowVerdict::Completed => write!(f, "completed"),
            WorkflowVerdict::CompletedWithWarning(reason) => write!(f, "completed with warning ({reason})"),
            WorkflowVerdict::Aborted(step) => write!(f, "aborted at `{step}`"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub name: String,
    #[serde(flatten)]
    pub verdict: WorkflowVerdict,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub suite: String,
    pub api_url: String,
    #[serde(flatten)]
    pub tally: Tally,
    pub tests_failed: usize,
    pub success_rate: Option<f64>,
    pub workflows: Vec<WorkflowResult>,
    pub requests: RunLog,
}

impl RunReport {
    pub fn has_warnings(&self) -> bool {
        self.workflows
            .iter()
            .any(|w| matches!(w.verdict, WorkflowVerdict::CompletedWithWarning(_)))
    }

    /// 0 when every request passed (and at least one ran), 1 otherwise.
    /// With `strict`, workflow warnings also fail the run.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.tally.all_passed() && !(strict && self.has_warnings()) {
            0
        } else {
            1
        }
    }
}

/// Sequential runner shared by every case in a suite.
pub struct Tester {
    client: ApiClient,
    vars: Variables,
    tally: Tally,
    log: RunLog,
    workflows: Vec<WorkflowResult>,
}

impl Tester {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            vars: Variables::default(),
            tally: Tally::default(),
            log: RunLog::default(),
            workflows: Vec::new(),
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn vars(&self) -> &Variables {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut Variables {
        &mut self.vars
    }

    /// Run a single API test.
    pub async fn run_test(&mut self, request: &RequestSpec) -> Outcome {
        self.tally.tests_run += 1;
        println!("\n🔍 Testing {}...", request.name);

        let mut entry = LogEntry {
            name: request.name.clone(),
            method: request.method,
            url: self.vars.interpolate(&request.endpoint),
            expected_status: request.expected_status,
            status: None,
            duration_ms: None,
            passed: false,
            error: None,
        };

        let sent = match self.client.url_for(request, &self.vars) {
            Ok(url) => {
                println!("   URL: {url}");
                entry.url = url.to_string();
                debug!(name = %request.name, method = %request.method, %url, "dispatching request");
                self.client.send(request, url).await
            }
            Err(err) => Err(err),
        };

        let outcome = match sent {
            Ok(response) => {
                println!("   Status Code: {}", response.status);
                entry.status = Some(response.status);
                entry.duration_ms = Some(response.duration_ms);

                if response.status == request.expected_status {
                    self.tally.tests_passed += 1;
                    entry.passed = true;
                    println!("✅ Passed - Status: {}", response.status);
                    match response.json() {
                        Some(body) => {
                            println!("   Response: {}...", preview_json(&body));
                            Outcome::passed(body)
                        }
                        None => {
                            println!("   Response: {}...", preview(&response.body));
                            Outcome::passed(empty_object())
                        }
                    }
                } else {
                    println!(
                        "❌ Failed - Expected {}, got {}",
                        request.expected_status, response.status
                    );
                    println!("   Response: {}...", preview(&response.body));
                    Outcome::failed()
                }
            }
            Err(err) => {
                warn!(name = %request.name, error = %err, "request did not complete");
                println!("❌ Failed - Error: {err}");
                entry.error = Some(err.to_string());
                Outcome::failed()
            }
        };

        self.log.push(entry);
        outcome
    }

    pub fn record_workflow(&mut self, name: impl Into<String>, verdict: WorkflowVerdict) {
        self.workflows.push(WorkflowResult {
            name: name.into(),
            verdict,
        });
    }

    pub fn finish(self, suite: impl Into<String>) -> RunReport {
        RunReport {
            suite: suite.into(),
            api_url: self.client.api_url().to_string(),
            tally: self.tally,
            tests_failed: self.tally.tests_failed(),
            success_rate: self.tally.success_rate(),
            workflows: self.workflows,
            requests: self.log,
        }
    }
}
