//! todo-core: task model, recurrence engine, and in-memory task operations
//! for the console todo app.

pub mod commands;
pub mod input;
pub mod recurrence;
pub mod store;
pub mod task;

pub use commands::{
    NewTask, SortKey, TaskFilter, ToggleOutcome, UpdateTask, add_task, delete_task, filter_tasks,
    search_tasks, sort_tasks, toggle_complete, update_task,
};
pub use input::InputError;
pub use recurrence::{RecurrenceError, handle_completion, next_occurrence};
pub use store::TaskStore;
pub use task::{Priority, RecurrenceRule, Task, TaskStatus};
