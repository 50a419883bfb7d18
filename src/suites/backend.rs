//! One request per GhostChart route, in a fixed order: the DNR emergency
//! check runs after a directive has been submitted.

use serde_json::{Value, json};

use crate::http::request::RequestSpec;
use crate::testing::Tester;

pub const HOSPITAL_ID: &str = "EMERGENCY_ROOM_001";
pub const SITUATION: &str = "cardiac_arrest";

const DIRECTIVE_TEXT: &str = "I do not want resuscitation if I have less than 5% chance of recovery. Donate my kidneys and corneas.";

/// Body for `POST /api/emergency/check`.
pub fn emergency_check_body(patient_id: &str) -> Value {
    json!({
        "patient_id": patient_id,
        "hospital_id": HOSPITAL_ID,
        "situation": SITUATION,
        "vitals": { "bp": "80/50", "pulse": 120, "oxygen": 85 }
    })
}

/// Body for `POST /api/directives/process`.
pub fn directive_body(patient_id: &str, patient_name: &str, directive_text: &str) -> Value {
    json!({
        "patient_id": patient_id,
        "patient_name": patient_name,
        "directive_text": directive_text
    })
}

pub fn cases() -> Vec<RequestSpec> {
    vec![
        RequestSpec::get("Health Check", ""),
        RequestSpec::post("Emergency Check - Unknown Patient", "emergency/check")
            .json(emergency_check_body("unknown_patient_999")),
        RequestSpec::post("Directive Processing - AI NLP", "directives/process").json(directive_body(
            "test_patient_001",
            "John Test Patient",
            DIRECTIVE_TEXT,
        )),
        RequestSpec::post("Emergency Check - DNR Patient", "emergency/check")
            .json(emergency_check_body("dnr_patient_002")),
        RequestSpec::post("Death Directive Execution", "death/execute").param("patient_id", "organ_donor_003"),
        RequestSpec::get("Get Patient Directives", "patients/test_patient_001/directives"),
        RequestSpec::get("Get Recent Alerts", "alerts/recent"),
        RequestSpec::get("Get Active Organ Referrals", "organ-referrals/active"),
    ]
}

pub async fn run(tester: &mut Tester) {
    for case in cases() {
        tester.run_test(&case).await;
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::environment::ProbeConfig;
    use crate::http::client::ApiClient;
    use crate::testing::Tally;

    const ROUTES: [(&str, &str); 7] = [
        ("GET", "/api/"),
        ("POST", "/api/emergency/check"),
        ("POST", "/api/directives/process"),
        ("POST", "/api/death/execute"),
        ("GET", "/api/patients/test_patient_001/directives"),
        ("GET", "/api/alerts/recent"),
        ("GET", "/api/organ-referrals/active"),
    ];

    fn tester_for(base_url: &str) -> Tester {
        Tester::new(ApiClient::new(&ProbeConfig::new(base_url)).unwrap())
    }

    async fn mock_route(server: &mut Server, method: &str, path: &str, status: usize) {
        server
            .mock(method, Matcher::Regex(format!("^{}($|\\?)", regex_escape(path))))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;
    }

    fn regex_escape(path: &str) -> String {
        path.replace('.', "\\.").replace('?', "\\?")
    }

    #[test]
    fn cases_cover_every_route_in_order() {
        let names: Vec<_> = cases().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "Health Check",
                "Emergency Check - Unknown Patient",
                "Directive Processing - AI NLP",
                "Emergency Check - DNR Patient",
                "Death Directive Execution",
                "Get Patient Directives",
                "Get Recent Alerts",
                "Get Active Organ Referrals",
            ]
        );
    }

    #[test]
    fn emergency_body_carries_vitals() {
        let body = emergency_check_body("dnr_patient_002");
        assert_eq!(body["hospital_id"], HOSPITAL_ID);
        assert_eq!(body["vitals"]["pulse"], 120);
        assert_eq!(body["vitals"]["bp"], "80/50");
    }

    #[tokio::test]
    async fn all_routes_ok_passes_everything() {
        let mut server = Server::new_async().await;
        for (method, path) in ROUTES {
            mock_route(&mut server, method, path, 200).await;
        }

        let mut tester = tester_for(&server.url());
        run(&mut tester).await;

        assert_eq!(tester.tally(), Tally { tests_run: 8, tests_passed: 8 });
        assert_eq!(tester.finish("backend").exit_code(false), 0);
    }

    #[tokio::test]
    async fn death_execution_sends_patient_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Regex("^/api/death/execute".into()))
            .match_query(Matcher::UrlEncoded("patient_id".into(), "organ_donor_003".into()))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let mut tester = tester_for(&server.url());
        let case = cases()
            .into_iter()
            .find(|c| c.name == "Death Directive Execution")
            .unwrap();
        let outcome = tester.run_test(&case).await;

        mock.assert_async().await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn failing_emergency_route_only_fails_its_cases() {
        let mut server = Server::new_async().await;
        for (method, path) in ROUTES {
            let status = if path == "/api/emergency/check" { 404 } else { 200 };
            mock_route(&mut server, method, path, status).await;
        }

        let mut tester = tester_for(&server.url());
        run(&mut tester).await;
        let report = tester.finish("backend");

        let failed: Vec<_> = report.requests.failures().map(|e| e.name.as_str()).collect();
        assert_eq!(
            failed,
            vec!["Emergency Check - Unknown Patient", "Emergency Check - DNR Patient"]
        );
        assert_eq!(report.tally, Tally { tests_run: 8, tests_passed: 6 });
        assert_eq!(report.exit_code(false), 1);
    }

    #[tokio::test]
    async fn unreachable_server_fails_every_case() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut tester = tester_for(&format!("http://{addr}"));
        run(&mut tester).await;
        let report = tester.finish("backend");

        assert_eq!(report.tally, Tally { tests_run: 8, tests_passed: 0 });
        assert!(report.requests.entries().iter().all(|e| e.error.is_some()));
        assert_eq!(report.exit_code(false), 1);
    }
}
