pub mod notifications {
    tonic::include_proto!("notifications");
}
