use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct CounterResponse {
    id: String,
    title: String,
    kind: String,
    progress: u32,
    target: u32,
    period_key: String,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct StreakResponse {
    kind: String,
    current: u32,
    best: u32,
    preview: u32,
}

#[derive(Debug, Deserialize)]
struct RolloverResponse {
    changed: bool,
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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "habit_tracker_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/counters")).send().await {
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
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
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

async fn create_counter(client: &Client, base_url: &str, title: &str, kind: &str) -> CounterResponse {
    let response = client
        .post(format!("{base_url}/api/counters"))
        .json(&serde_json::json!({ "title": title, "kind": kind }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn post_counter_action(
    client: &Client,
    base_url: &str,
    id: &str,
    action: &str,
) -> CounterResponse {
    let response = client
        .post(format!("{base_url}/api/counters/{id}/{action}"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn post_counter_value(
    client: &Client,
    base_url: &str,
    id: &str,
    field: &str,
    value: i64,
) -> CounterResponse {
    let response = client
        .post(format!("{base_url}/api/counters/{id}/{field}"))
        .json(&serde_json::json!({ "value": value }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn streak_for(client: &Client, base_url: &str, kind: &str) -> StreakResponse {
    let streaks: Vec<StreakResponse> = client
        .get(format!("{base_url}/api/streaks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    streaks.into_iter().find(|s| s.kind == kind).expect("kind missing")
}

#[tokio::test]
async fn http_create_and_list_counter() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let created = create_counter(&client, &server.base_url, "Morning pages", "daily").await;
    assert_eq!(created.title, "Morning pages");
    assert_eq!(created.kind, "daily");
    assert_eq!(created.progress, 0);
    assert_eq!(created.target, 1);
    assert!(!created.done);
    assert!(!created.period_key.is_empty());

    let listed: Vec<CounterResponse> = client
        .get(format!("{}/api/counters", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // Newest first.
    assert_eq!(listed[0].id, created.id);
}

#[tokio::test]
async fn http_increment_and_decrement_clamp() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let counter = create_counter(&client, &server.base_url, "Floss", "daily").await;

    let once = post_counter_action(&client, &server.base_url, &counter.id, "increment").await;
    assert_eq!(once.progress, 1);
    assert!(once.done);

    // Already at the target of 1: a second increment clamps.
    let twice = post_counter_action(&client, &server.base_url, &counter.id, "increment").await;
    assert_eq!(twice.progress, 1);

    let down = post_counter_action(&client, &server.base_url, &counter.id, "decrement").await;
    assert_eq!(down.progress, 0);
    let floor = post_counter_action(&client, &server.base_url, &counter.id, "decrement").await;
    assert_eq!(floor.progress, 0);
    assert!(!floor.done);
}

#[tokio::test]
async fn http_target_and_progress_clamping() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let counter = create_counter(&client, &server.base_url, "Pushups", "daily").await;

    let widened = post_counter_value(&client, &server.base_url, &counter.id, "target", 5).await;
    assert_eq!(widened.target, 5);

    let over = post_counter_value(&client, &server.base_url, &counter.id, "progress", 99).await;
    assert_eq!(over.progress, 5);

    let narrowed = post_counter_value(&client, &server.base_url, &counter.id, "target", 2).await;
    assert_eq!(narrowed.target, 2);
    assert_eq!(narrowed.progress, 2);

    let below = post_counter_value(&client, &server.base_url, &counter.id, "progress", -3).await;
    assert_eq!(below.progress, 0);

    let floored = post_counter_value(&client, &server.base_url, &counter.id, "target", 0).await;
    assert_eq!(floored.target, 1);
}

#[tokio::test]
async fn http_preview_streak_tracks_live_completion() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    // Weekly counters are only touched by this test, so the group is
    // exactly these two.
    let first = create_counter(&client, &server.base_url, "Plan week", "weekly").await;
    let second = create_counter(&client, &server.base_url, "Long run", "weekly").await;

    let baseline = streak_for(&client, &server.base_url, "weekly").await;
    assert_eq!(baseline.preview, baseline.current);

    post_counter_action(&client, &server.base_url, &first.id, "increment").await;
    post_counter_action(&client, &server.base_url, &second.id, "increment").await;

    let complete = streak_for(&client, &server.base_url, "weekly").await;
    assert_eq!(complete.preview, complete.current + 1);

    post_counter_action(&client, &server.base_url, &second.id, "decrement").await;

    let broken = streak_for(&client, &server.base_url, "weekly").await;
    assert_eq!(broken.preview, broken.current);
    assert_eq!(broken.current, complete.current);
    assert_eq!(broken.best, complete.best);
}

#[tokio::test]
async fn http_rename_rekind_and_delete() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let counter = create_counter(&client, &server.base_url, "Temp", "daily").await;
    post_counter_value(&client, &server.base_url, &counter.id, "target", 3).await;
    post_counter_value(&client, &server.base_url, &counter.id, "progress", 2).await;

    let renamed = client
        .post(format!("{}/api/counters/{}/title", server.base_url, counter.id))
        .json(&serde_json::json!({ "value": "Renamed" }))
        .send()
        .await
        .unwrap()
        .json::<CounterResponse>()
        .await
        .unwrap();
    assert_eq!(renamed.title, "Renamed");

    let moved = client
        .post(format!("{}/api/counters/{}/kind", server.base_url, counter.id))
        .json(&serde_json::json!({ "value": "monthly" }))
        .send()
        .await
        .unwrap()
        .json::<CounterResponse>()
        .await
        .unwrap();
    assert_eq!(moved.kind, "monthly");
    assert_ne!(moved.period_key, counter.period_key);
    // Progress survives a cadence change.
    assert_eq!(moved.progress, 2);

    let deleted = client
        .delete(format!("{}/api/counters/{}", server.base_url, counter.id))
        .send()
        .await
        .unwrap();
    assert!(deleted.status().is_success());

    let listed: Vec<CounterResponse> = client
        .get(format!("{}/api/counters", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.iter().all(|c| c.id != counter.id));

    let again = client
        .delete(format!("{}/api/counters/{}", server.base_url, counter.id))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_rollover_check_settles() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let first = client
        .post(format!("{}/api/rollover", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(first.status().is_success());

    // Immediately repeated: the first call (and every earlier request)
    // already settled this period, so nothing changes.
    let second: RolloverResponse = client
        .post(format!("{}/api/rollover", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!second.changed);
}

#[tokio::test]
async fn http_unknown_counter_is_404() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/counters/nope/increment", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
