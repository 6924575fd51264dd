use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::info;

use crate::{
    proto::notifications::notification_service_server::NotificationServiceServer,
    service::StatusService,
};

/// Serves the notification service on an already bound listener until
/// `shutdown` resolves, then lets in-flight calls finish.
pub async fn serve(
    listener: TcpListener,
    service: Arc<StatusService>,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), tonic::transport::Error> {
    let incoming = TcpListenerStream::new(listener);

    tonic::transport::Server::builder()
        .add_service(NotificationServiceServer::from_arc(service))
        .serve_with_incoming_shutdown(incoming, async {
            shutdown.await;
            info!("shutdown requested");
        })
        .await
}
