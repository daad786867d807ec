use std::time::Duration;

use configs::{sqlite_url_for_path, AppConfig};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    stop: Option<oneshot::Sender<()>>,
    server: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl TestApp {
    async fn shutdown(mut self) -> anyhow::Result<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.server.await??;
        Ok(())
    }
}

async fn start_server(token: &str) -> anyhow::Result<TestApp> {
    let dir = std::env::temp_dir().join("task-server-e2e").join(Uuid::new_v4().to_string());
    let mut cfg = AppConfig::default();
    cfg.database.url = sqlite_url_for_path(&dir.join("tasks.db").to_string_lossy());
    cfg.auth.api_token = token.into();

    // reserve a free port, then hand it to the server
    let probe = std::net::TcpListener::bind("127.0.0.1:0")?;
    cfg.server.host = "127.0.0.1".into();
    cfg.server.port = probe.local_addr()?.port();
    drop(probe);
    let base_url = format!("http://127.0.0.1:{}", cfg.server.port);

    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(server::run(cfg, async move {
        let _ = rx.await;
    }));

    // wait for the listener
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if client.get(format!("{base_url}/ping")).send().await.is_ok() {
            return Ok(TestApp { base_url, stop: Some(tx), server });
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("server did not come up at {base_url}")
}

#[tokio::test]
async fn e2e_task_lifecycle() -> anyhow::Result<()> {
    let app = start_server("e2e-token").await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/ping", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "status": "ok" }));

    let res = client
        .post(format!("{}/tasks", app.base_url))
        .json(&json!({ "title": "Write report", "description": "quarterly" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/tasks", app.base_url))
        .bearer_auth("e2e-token")
        .json(&json!({ "title": "Write report", "description": "quarterly" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let task_url = format!("{}/tasks/{}", app.base_url, created["id"]);

    let res = client.patch(&task_url).bearer_auth("e2e-token").json(&json!({ "done": true })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["done"], true);

    let list: Value = client.get(format!("{}/tasks?done=true", app.base_url)).send().await?.json().await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let res = client.delete(&task_url).bearer_auth("e2e-token").send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client.get(&task_url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    app.shutdown().await
}

#[tokio::test]
async fn e2e_unknown_method_is_405_not_401() -> anyhow::Result<()> {
    let app = start_server("e2e-token").await?;
    let res = reqwest::Client::new().put(format!("{}/tasks", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    app.shutdown().await
}
