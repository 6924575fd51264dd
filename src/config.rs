use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "notifier",
    about = "Client connection status service",
    version = crate::version::VERSION,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: Config,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the gRPC notification server (default).
    Run,

    /// Run the hello/goodbye demo sequence against --server.
    Demo,

    /// Query client statuses from --server.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Only report this client; all clients when omitted.
    #[arg(long, value_name = "ID", default_value = "")]
    pub client_id: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[arg(
        long,
        global = true,
        env = "NOTIFIER_BIND",
        value_name = "ADDR",
        default_value = "127.0.0.1:50051"
    )]
    pub bind: SocketAddr,

    #[arg(
        long,
        global = true,
        env = "NOTIFIER_SERVER",
        value_name = "ADDR",
        default_value = "127.0.0.1:50051"
    )]
    pub server: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_loopback_50051() {
        let cli = Cli::try_parse_from(["notifier"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config.bind, SocketAddr::from(([127, 0, 0, 1], 50051)));
        assert_eq!(cli.config.server, SocketAddr::from(([127, 0, 0, 1], 50051)));
    }

    #[test]
    fn status_accepts_client_id_and_global_server() {
        let cli = Cli::try_parse_from([
            "notifier",
            "status",
            "--client-id",
            "client_1",
            "--json",
            "--server",
            "127.0.0.1:6000",
        ])
        .unwrap();
        let Some(Command::Status(args)) = cli.command else {
            panic!("expected status command");
        };
        assert_eq!(args.client_id, "client_1");
        assert!(args.json);
        assert_eq!(cli.config.server, SocketAddr::from(([127, 0, 0, 1], 6000)));
    }

    #[test]
    fn rejects_malformed_bind_addr() {
        assert!(Cli::try_parse_from(["notifier", "--bind", "not-an-addr"]).is_err());
    }
}
