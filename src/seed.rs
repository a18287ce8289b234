use crate::task::{Task, TaskId, TaskStatus};
use serde::Deserialize;
use std::{sync::mpsc, time::Instant};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{info, warn};

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/todos";
pub const SEED_LIMIT: usize = 20;
pub const PLACEHOLDER_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed seed payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One record of the remote todo feed. Extra fields are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteTodo {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

impl From<RemoteTodo> for Task {
    fn from(todo: RemoteTodo) -> Self {
        Task {
            id: todo.id,
            title: todo.title,
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            status: if todo.completed {
                TaskStatus::Done
            } else {
                TaskStatus::ToDo
            },
        }
    }
}

pub fn parse_seed(body: &str, limit: usize) -> Result<Vec<Task>, SeedError> {
    let todos: Vec<RemoteTodo> = serde_json::from_str(body)?;
    Ok(todos.into_iter().take(limit).map(Task::from).collect())
}

pub async fn fetch_seed(
    client: &reqwest::Client,
    endpoint: &str,
    limit: usize,
) -> Result<Vec<Task>, SeedError> {
    let response = client.get(endpoint).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SeedError::Status(status));
    }
    let body = response.text().await?;
    parse_seed(&body, limit)
}

/// Starts the one-shot seed fetch on `runtime` and hands back the receiving end.
///
/// There is no error channel: on failure the sender is dropped without sending,
/// and the failure only shows up in the log.
pub fn spawn_seed_loader(
    runtime: &Handle,
    endpoint: String,
    limit: usize,
) -> mpsc::Receiver<Vec<Task>> {
    let (tx, rx) = mpsc::channel();
    runtime.spawn(async move {
        let started = Instant::now();
        let client = reqwest::Client::new();
        match fetch_seed(&client, &endpoint, limit).await {
            Ok(tasks) => {
                info!(
                    endpoint = %endpoint,
                    count = tasks.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "seed tasks loaded"
                );
                let _ = tx.send(tasks);
            }
            Err(error) => {
                warn!(endpoint = %endpoint, error = %error, "seed fetch failed, starting empty");
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_completed_to_done_with_placeholder() {
        let tasks = parse_seed(r#"[{"userId":1,"id":7,"title":"X","completed":true}]"#, SEED_LIMIT)
            .unwrap();
        assert_eq!(
            tasks,
            vec![Task {
                id: 7,
                title: "X".to_string(),
                description: "No description provided".to_string(),
                status: TaskStatus::Done,
            }]
        );
    }

    #[test]
    fn open_todo_maps_to_to_do() {
        let tasks = parse_seed(r#"[{"id":1,"title":"a","completed":false}]"#, SEED_LIMIT).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::ToDo);
    }

    #[test]
    fn keeps_only_the_first_records() {
        let body = serde_json::to_string(
            &(1..=25)
                .map(|id| serde_json::json!({ "id": id, "title": format!("t{id}"), "completed": id % 2 == 0 }))
                .collect::<Vec<_>>(),
        )
        .unwrap();
        let tasks = parse_seed(&body, SEED_LIMIT).unwrap();
        assert_eq!(tasks.len(), 20);
        assert_eq!(tasks.first().unwrap().id, 1);
        assert_eq!(tasks.last().unwrap().id, 20);
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(matches!(parse_seed("{\"oops\":1}", SEED_LIMIT), Err(SeedError::Parse(_))));
        assert!(parse_seed(r#"[{"id":1,"title":"a"}]"#, SEED_LIMIT).is_err());
    }
}
