//! Database repository for CRUD operations.
//!
//! Identifiers and timestamps are assigned here, never by callers. Update and
//! delete return `Ok(None)` when the row does not exist so the router can pick
//! the entity's not-found message.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::dates::format_timestamp;
use crate::errors::AppError;
use crate::models::{BackendTaskData, Employee, EmployeeInput, NewTask, TaskChanges};

const TASK_COLUMNS: &str =
    "id, text, completed, due_date, created_at, updated_at, subtask, alert, alert_time, version";

const EMPLOYEE_COLUMNS: &str = "id, first_name, last_name, group_name, role, expected_salary, expected_date_of_defense, created_at, updated_at, version";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ==================== TASK OPERATIONS ====================

    /// List all tasks, newest first.
    pub async fn list_tasks(&self) -> Result<Vec<BackendTaskData>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM task ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(task_from_row).collect())
    }

    /// Get a task by ID.
    pub async fn get_task(&self, id: &str) -> Result<Option<BackendTaskData>, AppError> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM task WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(task_from_row))
    }

    /// Create a new task. New tasks always start out not completed.
    pub async fn create_task(&self, task: &NewTask) -> Result<BackendTaskData, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = format_timestamp(&Utc::now());

        sqlx::query(
            "INSERT INTO task (id, text, completed, due_date, created_at, updated_at, subtask, alert, alert_time, version) VALUES (?, ?, 0, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&task.text)
        .bind(&task.due_date)
        .bind(&now)
        .bind(&now)
        .bind(&task.subtask)
        .bind(task.alert as i32)
        .bind(&task.alert_time)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Created task {}", id);

        Ok(BackendTaskData {
            id,
            text: task.text.clone(),
            completed: false,
            due_date: task.due_date.clone(),
            created_at: now.clone(),
            updated_at: now,
            subtask: task.subtask.clone(),
            alert: task.alert,
            alert_time: task.alert_time.clone(),
            version: 1,
        })
    }

    /// Apply a partial update with optimistic concurrency control.
    pub async fn update_task(
        &self,
        id: &str,
        changes: &TaskChanges,
    ) -> Result<Option<BackendTaskData>, AppError> {
        let Some(existing) = self.get_task(id).await? else {
            return Ok(None);
        };

        check_version(changes.expected_version, existing.version)?;

        let now = format_timestamp(&Utc::now());
        let new_version = existing.version + 1;

        let text = changes.text.clone().unwrap_or(existing.text);
        let completed = changes.completed.unwrap_or(existing.completed);
        let due_date = changes.due_date.clone().unwrap_or(existing.due_date);
        let alert = changes.alert.unwrap_or(existing.alert);
        let alert_time = changes.alert_time.clone().unwrap_or(existing.alert_time);
        let subtask = changes.subtask.clone().unwrap_or(existing.subtask);

        // Conditional UPDATE with version check to prevent lost updates
        let result = sqlx::query(
            "UPDATE task SET text = ?, completed = ?, due_date = ?, subtask = ?, alert = ?, alert_time = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&text)
        .bind(completed as i32)
        .bind(&due_date)
        .bind(&subtask)
        .bind(alert as i32)
        .bind(&alert_time)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_task(id).await?;
            return Err(concurrent_modification(current.map(|t| t.version)));
        }

        Ok(Some(BackendTaskData {
            id: existing.id,
            text,
            completed,
            due_date,
            created_at: existing.created_at,
            updated_at: now,
            subtask,
            alert,
            alert_time,
            version: new_version,
        }))
    }

    /// Delete a task, returning the removed row.
    pub async fn delete_task(&self, id: &str) -> Result<Option<BackendTaskData>, AppError> {
        let row = sqlx::query(&format!("DELETE FROM task WHERE id = ? RETURNING {TASK_COLUMNS}"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(task_from_row))
    }

    // ==================== EMPLOYEE OPERATIONS ====================

    /// List all employees in insertion order.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee ORDER BY created_at, rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(employee_from_row).collect())
    }

    /// Get an employee by ID.
    pub async fn get_employee(&self, id: &str) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employee WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(employee_from_row))
    }

    /// Create a new employee.
    pub async fn create_employee(&self, input: &EmployeeInput) -> Result<Employee, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = format_timestamp(&Utc::now());

        sqlx::query(
            "INSERT INTO employee (id, first_name, last_name, group_name, role, expected_salary, expected_date_of_defense, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.group_name)
        .bind(&input.role)
        .bind(input.expected_salary)
        .bind(&input.expected_date_of_defense)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Created employee {}", id);

        Ok(Employee {
            id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            group_name: input.group_name.clone(),
            role: input.role.clone(),
            expected_salary: input.expected_salary,
            expected_date_of_defense: input.expected_date_of_defense.clone(),
            created_at: now.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Overwrite all business fields of an employee.
    pub async fn replace_employee(
        &self,
        id: &str,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, AppError> {
        let Some(existing) = self.get_employee(id).await? else {
            return Ok(None);
        };

        check_version(input.expected_version, existing.version)?;

        let now = format_timestamp(&Utc::now());
        let new_version = existing.version + 1;

        let result = sqlx::query(
            "UPDATE employee SET first_name = ?, last_name = ?, group_name = ?, role = ?, expected_salary = ?, expected_date_of_defense = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.group_name)
        .bind(&input.role)
        .bind(input.expected_salary)
        .bind(&input.expected_date_of_defense)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_employee(id).await?;
            return Err(concurrent_modification(current.map(|e| e.version)));
        }

        Ok(Some(Employee {
            id: existing.id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            group_name: input.group_name.clone(),
            role: input.role.clone(),
            expected_salary: input.expected_salary,
            expected_date_of_defense: input.expected_date_of_defense.clone(),
            created_at: existing.created_at,
            updated_at: now,
            version: new_version,
        }))
    }

    /// Delete an employee, returning the removed row.
    pub async fn delete_employee(&self, id: &str) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query(&format!(
            "DELETE FROM employee WHERE id = ? RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(employee_from_row))
    }
}

fn check_version(expected: Option<i64>, current: i64) -> Result<(), AppError> {
    match expected {
        Some(expected) if expected != current => Err(AppError::Conflict {
            message: format!(
                "Version mismatch: expected {}, current {}",
                expected, current
            ),
            current_version: current,
        }),
        _ => Ok(()),
    }
}

fn concurrent_modification(current_version: Option<i64>) -> AppError {
    AppError::Conflict {
        message: "Concurrent modification detected".to_string(),
        current_version: current_version.unwrap_or(0),
    }
}

// Helper functions for row conversion

fn task_from_row(row: &sqlx::sqlite::SqliteRow) -> BackendTaskData {
    let completed: i32 = row.get("completed");
    let alert: i32 = row.get("alert");
    BackendTaskData {
        id: row.get("id"),
        text: row.get("text"),
        completed: completed != 0,
        due_date: row.get("due_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        subtask: row.get("subtask"),
        alert: alert != 0,
        alert_time: row.get("alert_time"),
        version: row.get("version"),
    }
}

fn employee_from_row(row: &sqlx::sqlite::SqliteRow) -> Employee {
    Employee {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        group_name: row.get("group_name"),
        role: row.get("role"),
        expected_salary: row.get("expected_salary"),
        expected_date_of_defense: row.get("expected_date_of_defense"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn setup() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("repo.sqlite"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    fn new_task(text: &str) -> NewTask {
        NewTask {
            text: text.to_string(),
            due_date: None,
            alert: false,
            alert_time: None,
            subtask: None,
        }
    }

    fn employee_input() -> EmployeeInput {
        EmployeeInput {
            first_name: "Test".to_string(),
            last_name: "Employee".to_string(),
            group_name: "Unang Grupo".to_string(),
            role: "leader".to_string(),
            expected_salary: 75000.0,
            expected_date_of_defense: "2023-12-31T00:00:00.000Z".to_string(),
            expected_version: None,
        }
    }

    #[tokio::test]
    async fn test_task_create_and_get() {
        let (repo, _dir) = setup().await;

        let created = repo.create_task(&new_task("Write report")).await.unwrap();
        assert_eq!(created.id.len(), 36);
        assert!(!created.completed);
        assert_eq!(created.version, 1);
        assert_eq!(created.created_at, created.updated_at);

        let found = repo.get_task(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_task_list_newest_first() {
        let (repo, _dir) = setup().await;

        let first = repo.create_task(&new_task("first")).await.unwrap();
        let second = repo.create_task(&new_task("second")).await.unwrap();

        let tasks = repo.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, second.id);
        assert_eq!(tasks[1].id, first.id);
    }

    #[tokio::test]
    async fn test_task_partial_update() {
        let (repo, _dir) = setup().await;

        let mut input = new_task("Pay rent");
        input.due_date = Some("2024-06-01".to_string());
        input.subtask = Some("by transfer".to_string());
        let created = repo.create_task(&input).await.unwrap();

        let changes = TaskChanges {
            completed: Some(true),
            due_date: Some(None),
            ..Default::default()
        };
        let updated = repo
            .update_task(&created.id, &changes)
            .await
            .unwrap()
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.due_date, None);
        assert_eq!(updated.subtask.as_deref(), Some("by transfer"));
        assert_eq!(updated.text, "Pay rent");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.version, 2);

        let stored = repo.get_task(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_task_update_version_conflict() {
        let (repo, _dir) = setup().await;
        let created = repo.create_task(&new_task("conflict")).await.unwrap();

        let changes = TaskChanges {
            text: Some("changed".to_string()),
            expected_version: Some(7),
            ..Default::default()
        };
        let err = repo.update_task(&created.id, &changes).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Conflict {
                current_version: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_task_update_missing() {
        let (repo, _dir) = setup().await;
        let result = repo
            .update_task(&uuid::Uuid::new_v4().to_string(), &TaskChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_task_delete_returns_row() {
        let (repo, _dir) = setup().await;
        let created = repo.create_task(&new_task("to delete")).await.unwrap();

        let deleted = repo.delete_task(&created.id).await.unwrap();
        assert_eq!(deleted.map(|t| t.id), Some(created.id.clone()));
        assert!(repo.get_task(&created.id).await.unwrap().is_none());
        assert!(repo.delete_task(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_employee_crud() {
        let (repo, _dir) = setup().await;

        let created = repo.create_employee(&employee_input()).await.unwrap();
        assert_eq!(created.first_name, "Test");

        let mut replacement = employee_input();
        replacement.role = "member".to_string();
        replacement.expected_salary = 80000.0;
        let replaced = repo
            .replace_employee(&created.id, &replacement)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.role, "member");
        assert_eq!(replaced.version, 2);

        let all = repo.list_employees().await.unwrap();
        assert_eq!(all, vec![replaced]);

        assert!(repo.delete_employee(&created.id).await.unwrap().is_some());
        assert!(repo.get_employee(&created.id).await.unwrap().is_none());
        assert!(repo.list_employees().await.unwrap().is_empty());
    }
}
