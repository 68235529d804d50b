//! In-memory occurrence and maintenance service for unit tests

use async_trait::async_trait;
use pingdom_api::{
    ApiError, MaintenanceApi, MaintenanceWindow, Occurrence, OccurrenceApi, OccurrenceQuery,
    OccurrenceWindow,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub(crate) struct FakeOccurrenceApi {
    occurrences: Mutex<Vec<Occurrence>>,
    maintenances: Mutex<Vec<MaintenanceWindow>>,
    failures: Mutex<HashMap<i64, String>>,
    delays: Mutex<HashMap<i64, Duration>>,
    list_failure: Mutex<Option<String>>,
    list_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

fn unavailable(message: &str) -> ApiError {
    ApiError::Api {
        status: 503,
        description: "Service Unavailable".to_string(),
        message: message.to_string(),
    }
}

impl FakeOccurrenceApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, occurrence: Occurrence) {
        self.occurrences.lock().unwrap().push(occurrence);
    }

    pub fn insert_maintenance(&self, window: MaintenanceWindow) {
        self.maintenances.lock().unwrap().push(window);
    }

    pub fn remove(&self, id: i64) {
        self.occurrences.lock().unwrap().retain(|o| o.id != id);
    }

    pub fn len(&self) -> usize {
        self.occurrences.lock().unwrap().len()
    }

    /// Make update/delete of `id` fail with `message`
    pub fn fail(&self, id: i64, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(id, message.to_string());
    }

    pub fn fail_list(&self, message: &str) {
        *self.list_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Delay update/delete of `id`
    pub fn delay(&self, id: i64, delay: Duration) {
        self.delays.lock().unwrap().insert(id, delay);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    async fn simulate_call(&self, id: i64) -> pingdom_api::Result<()> {
        let delay = self.delays.lock().unwrap().get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failures.lock().unwrap().get(&id).cloned();
        match failure {
            Some(message) => Err(unavailable(&message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OccurrenceApi for FakeOccurrenceApi {
    async fn list_occurrences(
        &self,
        query: &OccurrenceQuery,
    ) -> pingdom_api::Result<Vec<Occurrence>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.list_failure.lock().unwrap().clone() {
            return Err(unavailable(&message));
        }

        Ok(self
            .occurrences
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.maintenance_id == query.maintenance_id)
            .filter(|o| query.to == 0 || o.from <= query.to)
            .filter(|o| query.from == 0 || o.to >= query.from)
            .cloned()
            .collect())
    }

    async fn update_occurrence(
        &self,
        id: i64,
        window: OccurrenceWindow,
    ) -> pingdom_api::Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_call(id).await?;

        let mut occurrences = self.occurrences.lock().unwrap();
        match occurrences.iter_mut().find(|o| o.id == id) {
            Some(occurrence) => {
                occurrence.from = window.from;
                occurrence.to = window.to;
                Ok(())
            }
            None => Err(ApiError::Api {
                status: 404,
                description: "Not Found".to_string(),
                message: format!("occurrence {id} not found"),
            }),
        }
    }

    async fn delete_occurrence(&self, id: i64) -> pingdom_api::Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_call(id).await?;
        self.remove(id);
        Ok(())
    }
}

#[async_trait]
impl MaintenanceApi for FakeOccurrenceApi {
    async fn get_maintenance(&self, id: i64) -> pingdom_api::Result<MaintenanceWindow> {
        self.maintenances
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Api {
                status: 404,
                description: "Not Found".to_string(),
                message: format!("maintenance {id} not found"),
            })
    }

    async fn list_maintenances(&self) -> pingdom_api::Result<Vec<MaintenanceWindow>> {
        Ok(self.maintenances.lock().unwrap().clone())
    }
}
