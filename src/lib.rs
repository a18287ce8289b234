pub mod app;
pub mod config;
pub mod filter;
pub mod form;
pub mod grid;
pub mod logging;
pub mod notify;
pub mod seed;
pub mod store;
pub mod task;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use store::TaskStore;
pub use task::{DraftTask, Task, TaskId, TaskStatus};
