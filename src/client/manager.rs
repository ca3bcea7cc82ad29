//! Client-side cache of the task collection.
//!
//! The manager is an ordinary value owned by whoever builds the application
//! context; each instance has its own collection. Local state only changes after
//! the backend accepted a mutation. A read that races with an in-flight mutation
//! sees the collection as it was before that mutation's response arrived.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::adapter::{draft_to_external, to_external, to_internal};
use super::sorting::sort_by_created_desc;
use super::{ClientError, Task, TaskDraft};
use crate::models::{BackendTaskData, DeletedTaskResponse};

/// Cached projection of the backend's task table.
pub struct TaskManager {
    http: reqwest::Client,
    base_url: String,
    tasks: RwLock<Vec<Task>>,
}

impl TaskManager {
    /// `base_url` is the task collection endpoint, e.g. `http://127.0.0.1:5001/task`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tasks: RwLock::new(Vec::new()),
        })
    }

    /// Replace the whole local collection.
    pub fn load_tasks(&self, tasks: Vec<Task>) {
        *self.write() = tasks;
    }

    /// Fetch every task from the backend and load it.
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.http.get(&self.base_url).send().await?;
        let rows: Vec<BackendTaskData> = ensure_success(response).await?.json().await?;
        let tasks = rows.iter().map(to_internal).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} tasks", tasks.len());
        self.load_tasks(tasks.clone());
        Ok(tasks)
    }

    /// Create a task on the backend and add it to the collection.
    pub async fn add_task(&self, draft: &TaskDraft) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(&draft_to_external(draft))
            .send()
            .await?;
        let row: BackendTaskData = ensure_success(response).await?.json().await?;
        let task = to_internal(&row)?;

        let mut tasks = self.write();
        tasks.retain(|t| t.id != task.id);
        tasks.push(task.clone());
        sort_by_created_desc(&mut tasks);
        Ok(task)
    }

    /// Send the task's current fields to the backend and store the result.
    pub async fn update_task(&self, task: &Task) -> Result<Task, ClientError> {
        let response = self
            .http
            .put(self.task_url(&task.id))
            .json(&to_external(task))
            .send()
            .await?;
        let row: BackendTaskData = ensure_success(response).await?.json().await?;
        let updated = to_internal(&row)?;

        let mut tasks = self.write();
        for existing in tasks.iter_mut().filter(|t| t.id == updated.id) {
            *existing = updated.clone();
        }
        sort_by_created_desc(&mut tasks);
        Ok(updated)
    }

    /// Flip a cached task's completion state.
    pub async fn toggle_task(&self, id: &str) -> Result<Task, ClientError> {
        let mut task = self
            .get_task(id)
            .ok_or_else(|| ClientError::UnknownTask(id.to_string()))?;
        task.completed = !task.completed;
        self.update_task(&task).await
    }

    /// Delete a task on the backend and evict it locally.
    pub async fn remove_task(&self, id: &str) -> Result<(), ClientError> {
        let response = self.http.delete(self.task_url(id)).send().await?;
        let body: DeletedTaskResponse = ensure_success(response).await?.json().await?;
        tracing::debug!("{}: {}", body.message, id);

        self.write().retain(|t| t.id != id);
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.read().iter().find(|t| t.id == id).cloned()
    }

    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.read().clone()
    }

    /// Case-insensitive substring match on the task text.
    pub fn search_tasks(&self, query: &str) -> Vec<Task> {
        let query = query.to_lowercase();
        self.read()
            .iter()
            .filter(|t| t.text.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Open tasks whose reminder time has passed.
    pub fn due_alerts(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.read()
            .iter()
            .filter(|t| !t.completed && t.has_reminder())
            .filter(|t| t.alert_time.is_some_and(|at| at <= now))
            .cloned()
            .collect()
    }

    /// Open tasks whose due date has passed.
    pub fn overdue_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.read()
            .iter()
            .filter(|t| !t.completed && t.is_overdue(now))
            .cloned()
            .collect()
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Task>> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Task>> {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Task request failed with {}: {}", status, body);
    Err(ClientError::Request {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: &str, text: &str) -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task {
            id: id.to_string(),
            text: text.to_string(),
            completed: false,
            due_date: None,
            created_at: created,
            updated_at: created,
            notes: None,
            alert: false,
            alert_time: None,
            version: 1,
        }
    }

    fn manager() -> TaskManager {
        TaskManager::new("http://127.0.0.1:9/task/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_reads_return_copies() {
        let manager = manager();
        manager.load_tasks(vec![task("1", "Buy Milk"), task("2", "walk dog")]);

        let mut copy = manager.get_all_tasks();
        copy.clear();
        assert_eq!(manager.get_all_tasks().len(), 2);

        let mut one = manager.get_task("1").unwrap();
        one.text = "changed".to_string();
        assert_eq!(manager.get_task("1").unwrap().text, "Buy Milk");
        assert!(manager.get_task("3").is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let manager = manager();
        manager.load_tasks(vec![
            task("1", "Buy Milk"),
            task("2", "walk dog"),
            task("3", "milkshake"),
        ]);

        let found: Vec<_> = manager
            .search_tasks("MILK")
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(found, vec!["1", "3"]);
        assert_eq!(manager.search_tasks("").len(), 3);
    }

    #[test]
    fn test_due_alerts() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut past = task("past", "a");
        past.alert = true;
        past.alert_time = Some(now - chrono::Duration::minutes(5));
        let mut future = task("future", "b");
        future.alert = true;
        future.alert_time = Some(now + chrono::Duration::minutes(5));
        let mut done = past.clone();
        done.id = "done".to_string();
        done.completed = true;
        let mut silent = past.clone();
        silent.id = "silent".to_string();
        silent.alert = false;

        let manager = manager();
        manager.load_tasks(vec![past, future, done, silent]);
        let due: Vec<_> = manager.due_alerts(now).into_iter().map(|t| t.id).collect();
        assert_eq!(due, vec!["past"]);
    }

    #[test]
    fn test_overdue_tasks() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut late = task("late", "a");
        late.due_date = Some(now - chrono::Duration::days(1));
        let mut upcoming = task("upcoming", "b");
        upcoming.due_date = Some(now + chrono::Duration::days(1));
        let mut finished = late.clone();
        finished.id = "finished".to_string();
        finished.completed = true;

        let manager = manager();
        manager.load_tasks(vec![late, upcoming, finished, task("undated", "c")]);
        let overdue: Vec<_> = manager
            .overdue_tasks(now)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(overdue, vec!["late"]);
    }

    #[test]
    fn test_task_url_trims_trailing_slash() {
        assert_eq!(manager().task_url("abc"), "http://127.0.0.1:9/task/abc");
    }

    #[tokio::test]
    async fn test_toggle_unknown_task() {
        let err = manager().toggle_task("nope").await.unwrap_err();
        assert!(matches!(err, ClientError::UnknownTask(_)));
    }

    #[tokio::test]
    async fn test_network_failure_leaves_state_unchanged() {
        let manager = manager();
        manager.load_tasks(vec![task("1", "keep me")]);

        let err = manager.remove_task("1").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_) | ClientError::Timeout));
        assert_eq!(manager.get_all_tasks().len(), 1);
    }
}
