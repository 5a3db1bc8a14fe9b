use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use mdb_catalog::api::routes::create_router;
use mdb_catalog::api::MdbState;
use mdb_catalog::seed::load_seed_data;
use mdb_catalog::{MemoryStore, ObjectPrivilegeType, PrivilegeTable, SystemPrivilege};

// Test client wrapper driving the router in-process
struct TestClient {
    app: Router,
}

impl TestClient {
    fn new(gate: PrivilegeTable, default_limit: usize) -> Self {
        let store = MemoryStore::new();
        load_seed_data(&store).unwrap();
        let state = Arc::new(MdbState {
            store,
            gate: Box::new(gate),
            default_limit,
        });
        Self {
            app: create_router().with_state(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(&self, user: Option<&str>, path: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(path);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, user: Option<&str>, path: &str, json: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        self.send(builder.body(Body::from(json.to_string())).unwrap())
            .await
    }
}

fn privileges() -> PrivilegeTable {
    PrivilegeTable::new()
        .grant_system("admin", SystemPrivilege::ReadCatalog)
        .grant_object("ops", ObjectPrivilegeType::ReadParameter, "/YSS/SIMULATOR/Battery*")
        .grant_object("ops", ObjectPrivilegeType::Command, "/YSS/SIMULATOR/SWITCH_VOLTAGE_*")
}

fn names(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let name = item["qualifiedName"].as_str().unwrap_or_default().to_string();
                    match item["path"].as_str() {
                        Some(path) => format!("{}{}", name, path),
                        None => name,
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_and_instances() {
    let client = TestClient::new(privileges(), 100);

    let (status, body) = client.get(None, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = client.get(None, "/api/mdb").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["instances"][0]["name"], "simulator");
    assert_eq!(body["instances"][0]["missionDatabase"], "YSS simulator");

    let (status, body) = client.get(Some("admin"), "/api/mdb/simulator").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parameterCount"], 10);
    assert_eq!(body["spaceSystems"], json!(["/YSS"]));

    let (status, _) = client.get(None, "/api/mdb/simulator").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = client.get(Some("admin"), "/api/mdb/nope/parameters").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("No such instance"));
}

#[tokio::test]
async fn test_shallow_listing_and_deep_search() {
    let client = TestClient::new(privileges(), 100);

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?system=/YSS/SIMULATOR/DHS")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&body),
        vec!["/YSS/SIMULATOR/DHS/OnboardTime", "/YSS/SIMULATOR/DHS/PacketCounter"]
    );
    assert_eq!(body["totalSize"], 2);

    let (_, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?system=/YSS/SIMULATOR")
        .await;
    assert_eq!(body["totalSize"], 8);
    // PAYLOAD holds no parameters
    assert_eq!(body["spaceSystems"], json!(["/YSS/SIMULATOR/DHS"]));

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?system=/YSS/SIMULATOR/DHS/")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSize"], 2);

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?system=/nope&q=battery")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSize"], 0);

    let (_, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?system=/YSS&q=counter")
        .await;
    assert_eq!(names(&body), vec!["/YSS/SIMULATOR/DHS/PacketCounter"]);
    assert_eq!(body["spaceSystems"], json!([]));

    // containers only offer subsystems that have containers
    let (_, body) = client
        .get(Some("admin"), "/api/mdb/simulator/containers?system=/YSS/SIMULATOR")
        .await;
    assert_eq!(body["spaceSystems"], json!(["/YSS/SIMULATOR/DHS"]));
}

#[tokio::test]
async fn test_continuation_tokens_walk_all_results() {
    let client = TestClient::new(privileges(), 3);

    let mut seen = Vec::new();
    let mut path = "/api/mdb/simulator/parameters".to_string();
    loop {
        let (status, body) = client.get(Some("admin"), &path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalSize"], 10);
        assert!(body["items"].as_array().unwrap().len() <= 3);
        seen.extend(names(&body));
        match body["continuationToken"].as_str() {
            Some(token) => path = format!("/api/mdb/simulator/parameters?next={}", token),
            None => break,
        }
    }
    let mut sorted = seen.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(seen.len(), 10);
    assert_eq!(seen, sorted);

    let (status, _) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?next=bogus")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?limit=0")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?pos=8&limit=5")
        .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert!(body.get("continuationToken").is_none());
}

#[tokio::test]
async fn test_parameter_filters_and_member_search() {
    let client = TestClient::new(privileges(), 100);

    let (_, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?types=aggregate,array")
        .await;
    assert_eq!(
        names(&body),
        vec!["/YSS/SIMULATOR/BatteryHistory", "/YSS/SIMULATOR/Position"]
    );

    let (_, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?source=CONSTANT")
        .await;
    assert_eq!(names(&body), vec!["/YSS/SIMULATOR/VoltageLimit"]);

    let (_, body) = client
        .get(
            Some("admin"),
            "/api/mdb/simulator/parameters?q=temperature&searchMembers=true",
        )
        .await;
    assert_eq!(
        names(&body),
        vec![
            "/YSS/SIMULATOR/BatteryHistory[].temperature",
            "/YSS/SIMULATOR/BatteryTemperature1",
        ]
    );
}

#[tokio::test]
async fn test_listing_respects_object_privileges() {
    let client = TestClient::new(privileges(), 100);

    let (status, body) = client.get(Some("ops"), "/api/mdb/simulator/parameters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&body),
        vec![
            "/YSS/SIMULATOR/BatteryHistory",
            "/YSS/SIMULATOR/BatteryTemperature1",
            "/YSS/SIMULATOR/BatteryVoltage1",
            "/YSS/SIMULATOR/BatteryVoltage2",
        ]
    );

    let (_, body) = client.get(Some("ops"), "/api/mdb/simulator/commands").await;
    assert_eq!(
        names(&body),
        vec!["/YSS/SIMULATOR/SWITCH_VOLTAGE_OFF", "/YSS/SIMULATOR/SWITCH_VOLTAGE_ON"]
    );

    let (_, body) = client.get(None, "/api/mdb/simulator/algorithms").await;
    assert_eq!(body["totalSize"], 0);

    let (status, _) = client.get(Some("ops"), "/api/mdb/simulator/space-systems").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // navigation only leads to systems holding readable parameters
    let (_, body) = client
        .get(Some("ops"), "/api/mdb/simulator/parameters?system=/YSS")
        .await;
    assert_eq!(body["spaceSystems"], json!(["/YSS/SIMULATOR"]));

    let (_, body) = client
        .get(Some("ops"), "/api/mdb/simulator/parameters?system=/YSS/SIMULATOR")
        .await;
    assert_eq!(body["totalSize"], 4);
    assert_eq!(body["spaceSystems"], json!([]));

    let (_, body) = client
        .get(None, "/api/mdb/simulator/parameters?system=/YSS")
        .await;
    assert_eq!(body["totalSize"], 0);
    assert_eq!(body["spaceSystems"], json!([]));
}

#[tokio::test]
async fn test_invalid_query_values_are_json_errors() {
    let client = TestClient::new(privileges(), 100);

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters?source=BOGUS")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/algorithms?scope=NOWHERE")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/containers?limit=many")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_direct_gets() {
    let client = TestClient::new(privileges(), 100);

    // canonical and legacy namespaces
    let (status, body) = client
        .get(Some("ops"), "/api/mdb/simulator/parameters/YSS/SIMULATOR/BatteryVoltage1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"]["units"], "V");
    assert_eq!(body["usedBy"]["containers"][0]["name"], "Power");

    let (status, body) = client
        .get(
            Some("ops"),
            "/api/mdb/simulator/parameters/MDB:OPS%20Name/SIMULATOR_BatteryVoltage2",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["qualifiedName"], "/YSS/SIMULATOR/BatteryVoltage2");

    // existing but not readable
    let (status, _) = client
        .get(Some("ops"), "/api/mdb/simulator/parameters/YSS/SIMULATOR/Position")
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters/YSS/SIMULATOR/Position.latitude")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], ".latitude");

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters/YSS/SIMULATOR/Position.speed")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Nonexistent"));

    let (status, _) = client
        .get(Some("admin"), "/api/mdb/simulator/parameters/BatteryVoltage1")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/containers/YSS/SIMULATOR/Power")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usedBy"]["containers"][0]["name"], "Telemetry");

    let (status, body) = client
        .get(Some("ops"), "/api/mdb/simulator/commands/YSS/SIMULATOR/SWITCH_VOLTAGE_ON")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseCommand"]["name"], "SIM_TC");
    assert_eq!(body["argument"][0]["initialValue"], "1");

    let (status, body) = client
        .get(
            Some("admin"),
            "/api/mdb/simulator/algorithms/YSS/SIMULATOR/AverageVoltageAlgorithm",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outputParameter"][0]["name"], "AverageVoltage");

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/parameter-types/YSS/SIMULATOR/position_t")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["engType"], "aggregate");

    let (status, body) = client
        .get(Some("admin"), "/api/mdb/simulator/space-systems/YSS/SIMULATOR")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subSystem"][0]["name"], "DHS");
}

#[tokio::test]
async fn test_batch_get_parameters() {
    let client = TestClient::new(privileges(), 100);

    let (status, body) = client
        .post(
            Some("ops"),
            "/api/mdb/simulator/batch-get-parameters",
            json!({"id": [
                {"namespace": "/YSS/SIMULATOR", "name": "BatteryVoltage1"},
                {"namespace": "MDB:OPS Name", "name": "SIMULATOR_Position"}
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let response = body["response"].as_array().unwrap();
    assert_eq!(response.len(), 1);
    assert_eq!(
        response[0]["parameter"]["qualifiedName"],
        "/YSS/SIMULATOR/BatteryVoltage1"
    );
    // summary projection: no cross references
    assert!(response[0]["parameter"].get("usedBy").is_none());
    assert_eq!(response[0]["parameter"]["type"]["units"], "V");

    let (status, _) = client
        .post(
            Some("ops"),
            "/api/mdb/simulator/batch-get-parameters",
            json!({"id": [{"namespace": "/YSS/SIMULATOR", "name": "Missing"}]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
