use std::sync::Arc;

use predicates::prelude::*;
use tokio::{net::TcpListener, sync::oneshot};

use notifier::{server, service::StatusService, status::StatusStore};

fn status_stdout(addr: &str, extra: &[&str]) -> String {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("notifier");
    cmd.env("RUST_LOG", "off");
    cmd.args(["status", "--server", addr]);
    cmd.args(extra);
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("notifier");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn version_prints_crate_version() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("notifier");
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(notifier::version::VERSION));
}

#[test]
fn status_against_unreachable_server_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("notifier");
    cmd.env("RUST_LOG", "off");
    cmd.args(["status", "--server", &addr]);
    cmd.assert().failure();
}

#[test]
fn invalid_bind_addr_is_a_usage_error() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("notifier");
    cmd.args(["--bind", "nope"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--bind"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn status_prints_sorted_lines_and_json() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let service = Arc::new(StatusService::new(StatusStore::new()));
    service.send_message("b", "goodbye").await.unwrap();
    service.send_message("a", "hello").await.unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(server::serve(listener, service, async {
        let _ = shutdown_rx.await;
    }));

    let outputs = tokio::task::spawn_blocking(move || {
        [
            status_stdout(&addr, &[]),
            status_stdout(&addr, &["--json"]),
            status_stdout(&addr, &["--client-id", "unknown_id"]),
            status_stdout(&addr, &["--client-id", "unknown_id", "--json"]),
        ]
    })
    .await
    .unwrap();

    assert_eq!(outputs[0], "a: connected\nb: disconnected\n");
    assert_eq!(
        outputs[1],
        "{\n  \"a\": \"connected\",\n  \"b\": \"disconnected\"\n}\n"
    );
    assert_eq!(outputs[2], "no clients\n");
    assert_eq!(outputs[3], "{}\n");

    let _ = shutdown_tx.send(());
    server_handle.await.unwrap().unwrap();
}
