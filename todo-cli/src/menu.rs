//! Interactive menu loop over a session-scoped task store.

use std::io::{self, Write};

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use tracing::debug;
use uuid::Uuid;

use todo_core::{
    NewTask, SortKey, TaskFilter, TaskStore, UpdateTask, add_task, delete_task, filter_tasks,
    input, search_tasks, sort_tasks, toggle_complete, update_task,
};

use crate::format::{short_id, task_detail, task_summary};

const MENU: &str = "
=== Todo ===
1.  Add task
2.  List tasks
3.  View task details
4.  Update task
5.  Delete task
6.  Toggle complete/incomplete
7.  Search tasks
8.  Filter tasks
9.  Sort tasks
10. Quit
";

fn prompt(label: &str) -> Result<String> {
    print!("  {label}: ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub struct App {
    store: TaskStore,
    tz: Tz,
    tz_name: String,
}

impl App {
    pub fn new(store: TaskStore, tz_name: String) -> Result<Self> {
        let tz: Tz = tz_name
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {tz_name}"))?;
        Ok(Self { store, tz, tz_name })
    }

    pub fn run(&mut self) -> Result<()> {
        println!("Todo console (timezone: {})", self.tz_name);
        loop {
            println!("{MENU}");
            let choice = prompt("Choose an option")?;
            match choice.as_str() {
                "1" => self.handle_add()?,
                "2" => self.handle_list(),
                "3" => self.handle_detail()?,
                "4" => self.handle_update()?,
                "5" => self.handle_delete()?,
                "6" => self.handle_toggle()?,
                "7" => self.handle_search()?,
                "8" => self.handle_filter()?,
                "9" => self.handle_sort()?,
                "10" | "q" | "quit" | "exit" => {
                    println!("\n  Bye.");
                    return Ok(());
                }
                other => println!("\n  Unknown option: '{other}'"),
            }
        }
    }

    fn handle_add(&mut self) -> Result<()> {
        let title = prompt("Title (required)")?;
        let description = prompt("Description (optional)")?;
        let priority = prompt("Priority (low/medium/high, default: medium)")?;
        let tags = prompt("Tags (comma-separated, optional)")?;
        let due_date = prompt("Due date (YYYY-MM-DD or YYYY-MM-DD HH:MM, optional)")?;
        let reminder_at = prompt("Reminder (YYYY-MM-DD HH:MM, optional)")?;

        let is_recurring = matches!(
            prompt("Recurring? (yes/no, default: no)")?.to_lowercase().as_str(),
            "yes" | "y"
        );
        let recurrence_rule = if is_recurring {
            prompt("Recurrence (daily/weekly/monthly/yearly)")?
        } else {
            String::new()
        };

        let req = NewTask {
            title,
            description,
            priority,
            tags,
            due_date,
            reminder_at,
            is_recurring,
            recurrence_rule,
        };
        match add_task(&mut self.store, &req, &self.tz_name, Utc::now()) {
            Ok(task) => println!("\n  Task added: {} (ID: {})", task.title, short_id(&task)),
            Err(err) => println!("\n  Error: {err}"),
        }
        Ok(())
    }

    fn handle_list(&self) {
        let tasks = self.store.get_all();
        if tasks.is_empty() {
            println!("\n  No tasks yet.");
            return;
        }
        println!("\n  --- All Tasks ({}) ---", tasks.len());
        for task in &tasks {
            println!("{}", task_summary(task, &self.tz));
        }
    }

    fn handle_detail(&self) -> Result<()> {
        let raw = prompt("Task ID")?;
        match self.resolve_id(&raw) {
            Some(id) => {
                // resolve_id only returns ids present in the store
                if let Some(task) = self.store.get(id) {
                    println!("\n{}", task_detail(task, &self.tz));
                }
            }
            None => println!("\n  Task not found: '{raw}'"),
        }
        Ok(())
    }

    fn handle_update(&mut self) -> Result<()> {
        let raw = prompt("Task ID")?;
        let Some(id) = self.resolve_id(&raw) else {
            println!("\n  Task not found: '{raw}'");
            return Ok(());
        };

        println!("  (Enter to keep a field, '-' to clear a date)");
        let req = UpdateTask {
            title: non_empty(prompt("New title")?),
            description: non_empty(prompt("New description")?),
            priority: non_empty(prompt("New priority (low/medium/high)")?),
            tags: non_empty(prompt("New tags (comma-separated)")?),
            due_date: clearable(prompt("New due date")?),
            reminder_at: clearable(prompt("New reminder")?),
            status: non_empty(prompt("New status (pending/in_progress/completed)")?),
        };

        match update_task(&mut self.store, id, &req, &self.tz_name, Utc::now()) {
            Ok(Some(task)) => println!("\n  Task updated: {}", task.title),
            Ok(None) => println!("\n  Task not found: '{raw}'"),
            Err(err) => println!("\n  Error: {err}"),
        }
        Ok(())
    }

    fn handle_delete(&mut self) -> Result<()> {
        let raw = prompt("Task ID")?;
        match self.resolve_id(&raw) {
            Some(id) if delete_task(&mut self.store, id) => println!("\n  Task deleted."),
            _ => println!("\n  Task not found: '{raw}'"),
        }
        Ok(())
    }

    fn handle_toggle(&mut self) -> Result<()> {
        let raw = prompt("Task ID")?;
        let Some(id) = self.resolve_id(&raw) else {
            println!("\n  Task not found: '{raw}'");
            return Ok(());
        };

        match toggle_complete(&mut self.store, id, Utc::now()) {
            Ok(Some(outcome)) => {
                println!("\n  {} is now {}.", outcome.task.title, outcome.task.status);
                if let Some(successor) = outcome.spawned {
                    debug!(id = %successor.id, "spawned next occurrence");
                    println!(
                        "  Next occurrence scheduled (ID: {}):",
                        short_id(&successor)
                    );
                    println!("{}", task_summary(&successor, &self.tz));
                }
            }
            Ok(None) => println!("\n  Task not found: '{raw}'"),
            Err(err) => println!("\n  Error: {err}"),
        }
        Ok(())
    }

    fn handle_search(&self) -> Result<()> {
        let keyword = prompt("Keyword")?;
        let results = search_tasks(&self.store.get_all(), &keyword);
        self.print_results(&results);
        Ok(())
    }

    fn handle_filter(&self) -> Result<()> {
        println!("  (Enter to skip a filter)");
        let status = prompt("Status (pending/in_progress/completed)")?;
        let priority = prompt("Priority (low/medium/high)")?;
        let tag = prompt("Tag")?;
        let due_before = prompt("Due before (YYYY-MM-DD)")?;
        let due_after = prompt("Due after (YYYY-MM-DD)")?;

        let filter = match self.build_filter(&status, &priority, &tag, &due_before, &due_after) {
            Ok(filter) => filter,
            Err(err) => {
                println!("\n  Error: {err}");
                return Ok(());
            }
        };
        let results = filter_tasks(&self.store.get_all(), &filter);
        self.print_results(&results);
        Ok(())
    }

    fn build_filter(
        &self,
        status: &str,
        priority: &str,
        tag: &str,
        due_before: &str,
        due_after: &str,
    ) -> Result<TaskFilter, input::InputError> {
        Ok(TaskFilter {
            status: if status.is_empty() {
                None
            } else {
                Some(input::parse_status(status)?)
            },
            priority: if priority.is_empty() {
                None
            } else {
                Some(input::parse_priority(priority)?)
            },
            tag: non_empty(tag.to_string()),
            due_before: input::parse_local_datetime(due_before, &self.tz_name)?,
            due_after: input::parse_local_datetime(due_after, &self.tz_name)?,
        })
    }

    fn handle_sort(&self) -> Result<()> {
        let key = prompt("Sort by (created_at/title/priority/due_date/status)")?;
        let descending = matches!(
            prompt("Order (asc/desc, default: asc)")?.to_lowercase().as_str(),
            "desc" | "descending"
        );

        match key.parse::<SortKey>() {
            Ok(key) => {
                let results = sort_tasks(self.store.get_all(), key, descending);
                self.print_results(&results);
            }
            Err(err) => println!("\n  Error: {err}"),
        }
        Ok(())
    }

    fn print_results(&self, tasks: &[todo_core::Task]) {
        if tasks.is_empty() {
            println!("\n  No matching tasks.");
            return;
        }
        println!("\n  --- Results ({}) ---", tasks.len());
        for task in tasks {
            println!("{}", task_summary(task, &self.tz));
        }
    }

    /// Accept a full UUID or a unique prefix of the short id shown in lists.
    fn resolve_id(&self, raw: &str) -> Option<Uuid> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(id) = Uuid::parse_str(raw) {
            return self.store.get(id).map(|t| t.id);
        }

        let prefix = raw.to_lowercase();
        let matches: Vec<Uuid> = self
            .store
            .get_all()
            .iter()
            .filter(|t| t.id.simple().to_string().starts_with(&prefix))
            .map(|t| t.id)
            .collect();
        match matches.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Enter keeps the field, '-' clears it (maps to an empty parse, i.e. None).
fn clearable(s: String) -> Option<String> {
    match s.trim() {
        "" => None,
        "-" => Some(String::new()),
        other => Some(other.to_string()),
    }
}
