use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ActivityResponse {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    name: String,
    value: f64,
    unit: String,
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct GoalResponse {
    id: String,
    current: f64,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    fitness: f64,
    habit: f64,
    task: f64,
}

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    date: String,
    summary: SummaryResponse,
    goals: Vec<GoalResponse>,
    total_activities: usize,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("activity_tracker_http_{}_{}", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/summary")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_activity_tracker"))
        .env("PORT", port.to_string())
        .env("APP_HOST", "127.0.0.1")
        .env("APP_DATA_DIR", unique_data_dir())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn dashboard(client: &Client, server: &TestServer) -> DashboardResponse {
    client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn water_goal(dashboard: &DashboardResponse) -> f64 {
    dashboard
        .goals
        .iter()
        .find(|goal| goal.id == "2")
        .expect("default water goal")
        .current
}

#[tokio::test]
async fn http_add_activity_updates_summary_and_goals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = dashboard(&client, &server).await;

    let response = client
        .post(format!("{}/api/activities", server.base_url))
        .json(&serde_json::json!({ "type": "habit", "name": "Water Glass #1", "value": "2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: ActivityResponse = response.json().await.unwrap();
    assert_eq!(created.kind, "habit");
    assert_eq!(created.name, "Water Glass #1");
    assert_eq!(created.value, 2.0);
    assert_eq!(created.unit, "count");
    assert!(created.timestamp > 0);

    let after = dashboard(&client, &server).await;
    assert_eq!(after.summary.habit, before.summary.habit + 2.0);
    assert_eq!(after.summary.fitness, before.summary.fitness);
    assert_eq!(after.summary.task, before.summary.task);
    assert_eq!(water_goal(&after), water_goal(&before) + 2.0);
    assert_eq!(after.total_activities, before.total_activities + 1);
    assert!(!after.date.is_empty());

    let history: Vec<ActivityResponse> = client
        .get(format!("{}/api/activities?type=habit", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(history.iter().any(|activity| activity.id == created.id));
    assert!(history.iter().all(|activity| activity.kind == "habit"));
}

#[tokio::test]
async fn http_delete_activity_recomputes_goals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let created: ActivityResponse = client
        .post(format!("{}/api/activities", server.base_url))
        .json(&serde_json::json!({ "type": "habit", "name": "water", "value": 3 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let before = dashboard(&client, &server).await;

    let response = client
        .delete(format!("{}/api/activities/{}", server.base_url, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let after = dashboard(&client, &server).await;
    assert_eq!(water_goal(&after), water_goal(&before) - 3.0);
    assert_eq!(after.total_activities, before.total_activities - 1);

    let again = client
        .delete(format!("{}/api/activities/{}", server.base_url, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NO_CONTENT);
    assert_eq!(dashboard(&client, &server).await.total_activities, after.total_activities);
}

#[tokio::test]
async fn http_rejects_invalid_activity() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for body in [
        serde_json::json!({ "type": "habit", "name": "  ", "value": 1 }),
        serde_json::json!({ "type": "habit", "name": "Water", "value": "lots" }),
        serde_json::json!({ "type": "sleep", "name": "Nap", "value": 1 }),
    ] {
        let response = client
            .post(format!("{}/api/activities", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = client
        .get(format!("{}/api/activities?type=sleep", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_index_renders_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client.get(&server.base_url).send().await.unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Activity Tracker"));
    assert!(!body.contains("{{DATE}}"));
}
