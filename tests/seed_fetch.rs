use std::{sync::mpsc::RecvTimeoutError, time::Duration};
use tasklist::{
    seed::{self, SeedError},
    TaskStatus,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    runtime::Handle,
};

fn todos(n: u32) -> String {
    serde_json::to_string(
        &(1..=n)
            .map(|id| {
                serde_json::json!({
                    "userId": 1,
                    "id": id,
                    "title": format!("todo {id}"),
                    "completed": id == 1,
                })
            })
            .collect::<Vec<_>>(),
    )
    .unwrap()
}

/// Answers exactly one HTTP request with `status` and `body`.
async fn serve_once(status: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}/todos")
}

async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/todos")
}

#[tokio::test]
async fn fetch_keeps_first_twenty_records() {
    let url = serve_once("200 OK", todos(25)).await;
    let tasks = seed::fetch_seed(&reqwest::Client::new(), &url, seed::SEED_LIMIT)
        .await
        .unwrap();

    assert_eq!(tasks.len(), 20);
    assert_eq!(tasks[0].status, TaskStatus::Done);
    assert_eq!(tasks[1].status, TaskStatus::ToDo);
    assert!(tasks.iter().all(|t| t.description == seed::PLACEHOLDER_DESCRIPTION));
    assert_eq!(tasks.last().unwrap().id, 20);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let url = serve_once("500 Internal Server Error", "[]".to_string()).await;
    let result = seed::fetch_seed(&reqwest::Client::new(), &url, seed::SEED_LIMIT).await;
    assert!(matches!(result, Err(SeedError::Status(code)) if code.as_u16() == 500));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn loader_delivers_tasks_over_the_channel() {
    let url = serve_once("200 OK", todos(3)).await;
    let rx = seed::spawn_seed_loader(&Handle::current(), url, seed::SEED_LIMIT);
    let tasks = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(10)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tasks.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_loader_sends_nothing() {
    let url = closed_port_url().await;
    let rx = seed::spawn_seed_loader(&Handle::current(), url, seed::SEED_LIMIT);
    let outcome = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(10)))
        .await
        .unwrap();
    assert_eq!(outcome.unwrap_err(), RecvTimeoutError::Disconnected);
}
