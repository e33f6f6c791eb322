use super::{ImageToVideoTask, TaskSnapshot, TaskStatus, VideoGenerationService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted in-memory vendor.
///
/// Status queries replay the scripted snapshots in order; once the script is
/// exhausted the last snapshot repeats (or `PENDING` if nothing was scripted).
#[derive(Clone)]
pub struct MockVideoClient {
    task_ids: Arc<Mutex<VecDeque<String>>>,
    statuses: Arc<Mutex<VecDeque<TaskSnapshot>>>,
    last_status: Arc<Mutex<Option<TaskSnapshot>>>,
    submitted: Arc<Mutex<Vec<ImageToVideoTask>>>,
    status_queries: Arc<Mutex<Vec<String>>>,
    uploads: Arc<Mutex<Vec<(Vec<u8>, String)>>>,
    submit_error: Arc<Mutex<Option<String>>>,
    upload_base_url: String,
}

impl MockVideoClient {
    pub fn new() -> Self {
        Self {
            task_ids: Arc::new(Mutex::new(VecDeque::new())),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            last_status: Arc::new(Mutex::new(None)),
            submitted: Arc::new(Mutex::new(Vec::new())),
            status_queries: Arc::new(Mutex::new(Vec::new())),
            uploads: Arc::new(Mutex::new(Vec::new())),
            submit_error: Arc::new(Mutex::new(None)),
            upload_base_url: "https://mock-assets.example.com".to_string(),
        }
    }

    pub fn with_task_id(self, id: String) -> Self {
        self.task_ids.lock().unwrap().push_back(id);
        self
    }

    pub fn with_status(self, status: TaskStatus) -> Self {
        self.with_snapshot(TaskSnapshot::new("", status))
    }

    pub fn with_snapshot(self, snapshot: TaskSnapshot) -> Self {
        self.statuses.lock().unwrap().push_back(snapshot);
        self
    }

    pub fn with_submit_error(self, message: String) -> Self {
        *self.submit_error.lock().unwrap() = Some(message);
        self
    }

    pub fn get_submitted(&self) -> Vec<ImageToVideoTask> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn get_submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn get_status_queries(&self) -> Vec<String> {
        self.status_queries.lock().unwrap().clone()
    }

    pub fn get_upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    /// Total vendor calls of any kind.
    pub fn get_call_count(&self) -> usize {
        self.get_submit_count() + self.status_queries.lock().unwrap().len() + self.get_upload_count()
    }
}

impl Default for MockVideoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoGenerationService for MockVideoClient {
    async fn upload_asset(&self, bytes: &[u8], mime: &str) -> Result<String> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((bytes.to_vec(), mime.to_string()));
        Ok(format!("{}/asset-{}", self.upload_base_url, uploads.len()))
    }

    async fn submit(&self, task: &ImageToVideoTask) -> Result<String> {
        if let Some(message) = self.submit_error.lock().unwrap().clone() {
            return Err(Error::submission(message));
        }

        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(task.clone());

        let id = self
            .task_ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("task-{}", submitted.len()));
        Ok(id)
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskSnapshot> {
        self.status_queries
            .lock()
            .unwrap()
            .push(task_id.to_string());

        let mut last = self.last_status.lock().unwrap();
        let next = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| last.clone())
            .unwrap_or_else(|| TaskSnapshot::new(task_id, TaskStatus::Pending));
        *last = Some(next.clone());

        let mut snapshot = next;
        snapshot.id = task_id.to_string();
        snapshot.raw["id"] = serde_json::Value::String(task_id.to_string());
        Ok(snapshot)
    }
}
