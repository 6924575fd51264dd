use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::{
    proto::notifications::{
        GetClientStatusRequest, GetClientStatusResponse, SendMessageRequest, SendMessageResponse,
        notification_service_server::NotificationService,
    },
    status::{ClientStatus, StatusStore},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    MissingClientId,
    /// Carries the message exactly as the caller sent it.
    InvalidMessage { message: String },
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingClientId | Self::InvalidMessage { .. } => "invalid_argument",
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingClientId => write!(f, "client_id is required"),
            Self::InvalidMessage { message } => write!(f, "Invalid message: {message}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for tonic::Status {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::MissingClientId | ServiceError::InvalidMessage { .. } => {
                tonic::Status::invalid_argument(value.to_string())
            }
        }
    }
}

/// Outcome of an accepted greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub client_id: String,
    pub status: ClientStatus,
}

impl Transition {
    pub fn info(&self) -> String {
        format!("{} marked {}", self.client_id, self.status)
    }
}

/// Maps a greeting onto the status it moves the client into.
///
/// Matching ignores surrounding whitespace and case.
pub fn status_for_greeting(message: &str) -> Option<ClientStatus> {
    match message.trim().to_lowercase().as_str() {
        "hello" => Some(ClientStatus::Connected),
        "goodbye" => Some(ClientStatus::Disconnected),
        _ => None,
    }
}

#[derive(Debug)]
pub struct StatusService {
    store: StatusStore,
}

impl StatusService {
    pub fn new(store: StatusStore) -> Self {
        Self { store }
    }

    pub async fn send_message(
        &self,
        client_id: &str,
        message: &str,
    ) -> Result<Transition, ServiceError> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            let err = ServiceError::MissingClientId;
            warn!(code = err.code(), "send_message rejected: missing client_id");
            return Err(err);
        }

        let Some(status) = status_for_greeting(message) else {
            let err = ServiceError::InvalidMessage {
                message: message.to_string(),
            };
            warn!(
                code = err.code(),
                client_id,
                raw_message = message,
                "send_message rejected: invalid message"
            );
            return Err(err);
        };

        self.store.set(client_id, status).await;
        let tracked = self.store.len().await;
        info!(client_id, %status, tracked, "client status updated");

        Ok(Transition {
            client_id: client_id.to_string(),
            status,
        })
    }

    /// Status of one client, or of every known client when `client_id` is blank.
    ///
    /// An unknown client yields an empty map rather than an error.
    pub async fn client_statuses(&self, client_id: &str) -> BTreeMap<String, ClientStatus> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            let all = self.store.get_all().await;
            info!(count = all.len(), "client statuses requested for all clients");
            return all;
        }

        let status = self.store.get(client_id).await;
        info!(client_id, status = ?status, "client status requested");
        status
            .map(|status| BTreeMap::from([(client_id.to_string(), status)]))
            .unwrap_or_default()
    }
}

#[tonic::async_trait]
impl NotificationService for StatusService {
    async fn send_message(
        &self,
        request: tonic::Request<SendMessageRequest>,
    ) -> Result<tonic::Response<SendMessageResponse>, tonic::Status> {
        let req = request.into_inner();
        let transition = StatusService::send_message(self, &req.client_id, &req.message).await?;
        Ok(tonic::Response::new(SendMessageResponse {
            ok: true,
            info: transition.info(),
        }))
    }

    async fn get_client_status(
        &self,
        request: tonic::Request<GetClientStatusRequest>,
    ) -> Result<tonic::Response<GetClientStatusResponse>, tonic::Status> {
        let req = request.into_inner();
        let statuses = self
            .client_statuses(&req.client_id)
            .await
            .into_iter()
            .map(|(client_id, status)| (client_id, status.as_str().to_string()))
            .collect();
        Ok(tonic::Response::new(GetClientStatusResponse { statuses }))
    }
}
