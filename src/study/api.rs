use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    Client,
    StatusCode,
};

use super::types::{
    StudyCounters,
    StudyRecord,
};
use crate::{
    core::{
        http::{
            ensure_success,
            http_client,
        },
        DrugSpeakError,
        UserId,
    },
    settings::Settings,
};

/// Remote per-user study progress.
#[async_trait]
pub trait StudyRecordService: Send + Sync {
    /// Fails with `RecordNotFound` when the user has no record yet.
    async fn get_study_record(&self, user_id: &UserId) -> Result<StudyRecord, DrugSpeakError>;

    /// Creates the record or fully replaces its counters.
    async fn create_or_update_record(
        &self,
        user_id: &UserId,
        counters: &StudyCounters,
    ) -> Result<StudyRecord, DrugSpeakError>;
}

#[async_trait]
impl<S: StudyRecordService + ?Sized> StudyRecordService for Arc<S> {
    async fn get_study_record(&self, user_id: &UserId) -> Result<StudyRecord, DrugSpeakError> {
        (**self).get_study_record(user_id).await
    }

    async fn create_or_update_record(
        &self,
        user_id: &UserId,
        counters: &StudyCounters,
    ) -> Result<StudyRecord, DrugSpeakError> {
        (**self).create_or_update_record(user_id, counters).await
    }
}

pub struct HttpStudyRecordService {
    client: Client,
    base_url: String,
}

impl HttpStudyRecordService {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, DrugSpeakError> {
        let client = http_client(settings.request_timeout_secs)?;
        Ok(Self::new(client, &settings.api_base_url))
    }

    fn record_url(&self, user_id: &UserId) -> String {
        format!("{}/study-records/{}", self.base_url, user_id)
    }
}

#[async_trait]
impl StudyRecordService for HttpStudyRecordService {
    async fn get_study_record(&self, user_id: &UserId) -> Result<StudyRecord, DrugSpeakError> {
        let resp = self.client.get(self.record_url(user_id)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(DrugSpeakError::RecordNotFound(user_id.clone()));
        }
        ensure_success(&resp)?;

        let record: StudyRecord = resp.json().await?;
        Ok(record.stamped(user_id))
    }

    async fn create_or_update_record(
        &self,
        user_id: &UserId,
        counters: &StudyCounters,
    ) -> Result<StudyRecord, DrugSpeakError> {
        let resp = self.client.put(self.record_url(user_id)).json(counters).send().await?;
        ensure_success(&resp)?;

        let record: StudyRecord = resp.json().await?;
        Ok(record.stamped(user_id))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::Mutex,
    };

    use axum::{
        extract::{
            Path,
            State,
        },
        http::StatusCode as AxumStatus,
        routing::get,
        Json,
        Router,
    };
    use tokio::net::TcpListener;

    use super::*;

    type Records = Arc<Mutex<HashMap<String, StudyCounters>>>;

    async fn fetch(
        State(records): State<Records>,
        Path(user_id): Path<String>,
    ) -> Result<Json<serde_json::Value>, AxumStatus> {
        if user_id == "broken" {
            return Err(AxumStatus::INTERNAL_SERVER_ERROR);
        }
        let records = records.lock().unwrap();
        let counters = records.get(&user_id).ok_or(AxumStatus::NOT_FOUND)?;
        let mut body = serde_json::to_value(counters).unwrap();
        body["userId"] = serde_json::json!(user_id);
        body["_id"] = serde_json::json!("rec-1");
        Ok(Json(body))
    }

    async fn replace(
        State(records): State<Records>,
        Path(user_id): Path<String>,
        Json(counters): Json<StudyCounters>,
    ) -> Json<StudyCounters> {
        records.lock().unwrap().insert(user_id, counters);
        Json(counters) // No userId in the body; the client stamps it
    }

    async fn serve(records: Records) -> String {
        let app = Router::new()
            .route("/study-records/{user_id}", get(fetch).put(replace))
            .with_state(records);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn service(base_url: &str) -> HttpStudyRecordService {
        HttpStudyRecordService::new(http_client(5).unwrap(), base_url)
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let base = serve(Records::default()).await;
        let err = service(&base).get_study_record(&UserId::from("u1")).await.unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_server_error_is_transport_failure() {
        let base = serve(Records::default()).await;
        let err = service(&base).get_study_record(&UserId::from("broken")).await.unwrap_err();
        assert!(matches!(err, DrugSpeakError::HttpStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_put_replaces_counters() {
        let records = Records::default();
        let base = serve(records.clone()).await;
        let service = service(&base);
        let user = UserId::from("u1");
        let counters = StudyCounters { current_learning: 4, finished_learning: 2, total_score: 150.0 };

        let written = service.create_or_update_record(&user, &counters).await.unwrap();
        assert_eq!(written.user_id, user);
        assert_eq!(written.counters, counters);

        // Same payload twice leaves the same state
        service.create_or_update_record(&user, &counters).await.unwrap();
        assert_eq!(records.lock().unwrap().get("u1"), Some(&counters));

        let fetched = service.get_study_record(&user).await.unwrap();
        assert_eq!(fetched.counters, counters);
        assert_eq!(fetched.extra.get("_id"), Some(&serde_json::json!("rec-1")));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_reqwest_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = service(&format!("http://{}", addr))
            .get_study_record(&UserId::from("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DrugSpeakError::Reqwest(_)));
    }
}
