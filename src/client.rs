use std::{collections::BTreeMap, net::SocketAddr};

use tonic::transport::{Channel, Endpoint};
use tracing::{error, info};

use crate::{
    proto::notifications::{
        GetClientStatusRequest, SendMessageRequest, SendMessageResponse,
        notification_service_client::NotificationServiceClient,
    },
    status::{ClientStatus, UnknownStatusError},
};

#[derive(Debug)]
pub enum ClientError {
    Transport(tonic::transport::Error),
    Rpc(tonic::Status),
    UnknownStatus {
        client_id: String,
        source: UnknownStatusError,
    },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "notifier transport error: {err}"),
            Self::Rpc(status) => write!(
                f,
                "rpc failed: {:?} - {}",
                status.code(),
                status.message()
            ),
            Self::UnknownStatus { client_id, source } => {
                write!(f, "server reported {source} for client {client_id}")
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Rpc(status) => Some(status),
            Self::UnknownStatus { source, .. } => Some(source),
        }
    }
}

impl From<tonic::transport::Error> for ClientError {
    fn from(value: tonic::transport::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<tonic::Status> for ClientError {
    fn from(value: tonic::Status) -> Self {
        Self::Rpc(value)
    }
}

#[derive(Debug, Clone)]
pub struct NotificationClient {
    inner: NotificationServiceClient<Channel>,
}

pub async fn connect(addr: SocketAddr) -> Result<NotificationClient, ClientError> {
    let endpoint = Endpoint::from_shared(format!("http://{addr}"))?;
    let channel = endpoint.connect().await?;
    Ok(NotificationClient {
        inner: NotificationServiceClient::new(channel),
    })
}

impl NotificationClient {
    pub async fn send_message(
        &mut self,
        client_id: &str,
        message: &str,
    ) -> Result<SendMessageResponse, tonic::Status> {
        let req = SendMessageRequest {
            client_id: client_id.to_string(),
            message: message.to_string(),
        };
        let resp = self.inner.send_message(req).await?;
        Ok(resp.into_inner())
    }

    /// Queries one client, or all clients when `client_id` is empty.
    pub async fn client_statuses(
        &mut self,
        client_id: &str,
    ) -> Result<BTreeMap<String, ClientStatus>, ClientError> {
        let req = GetClientStatusRequest {
            client_id: client_id.to_string(),
        };
        let resp = self.inner.get_client_status(req).await?.into_inner();

        resp.statuses
            .into_iter()
            .map(|(client_id, raw)| match raw.parse::<ClientStatus>() {
                Ok(status) => Ok((client_id, status)),
                Err(source) => Err(ClientError::UnknownStatus { client_id, source }),
            })
            .collect()
    }
}

/// Replays the hello/goodbye sequence for `client_1`, logging every step.
///
/// Stops at the first failed call.
pub async fn run_demo(client: &mut NotificationClient) -> Result<(), ClientError> {
    for message in ["Hello", "Goodbye"] {
        match client.send_message("client_1", message).await {
            Ok(resp) => info!(ok = resp.ok, info = %resp.info, "send_message"),
            Err(status) => {
                error!(code = ?status.code(), details = status.message(), "send_message failed");
                return Err(status.into());
            }
        }

        match client.client_statuses("client_1").await {
            Ok(statuses) => info!(?statuses, "get_client_status"),
            Err(err) => {
                error!(%err, "get_client_status failed");
                return Err(err);
            }
        }
    }
    Ok(())
}
