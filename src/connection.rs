// taskd: Connection Handler — per-client framed command/response loop

use std::sync::Arc;

use tokio::net::TcpStream;

use crate::protocol::{self, MAX_REPLY_LEN, MAX_REQUEST_LEN};
use crate::response;
use crate::server::Server;

/// Drives one client connection until it disconnects or sends a malformed
/// frame. Multiple commands per connection, no pipelining — the reply for
/// one command is sent before the next is read.
pub async fn handle(server: Arc<Server>, mut stream: TcpStream) {
    loop {
        let payload = match protocol::read_frame(&mut stream, MAX_REQUEST_LEN).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!("connection closed");
                return;
            }
            Err(error) => {
                tracing::debug!(%error, "connection read error");
                return;
            }
        };

        let reply = match protocol::parse_command(&payload) {
            Ok(cmd) if cmd.action == 1 => {
                let result = server.admit(&cmd.name).await;
                response::activation_reply(result, &cmd.name)
            }
            Ok(cmd) if cmd.action == 0 => {
                server.deactivate(&cmd.name).await;
                response::deactivated_reply(&cmd.name)
            }
            Ok(_unrecognized_action) => response::invalid_action_reply(),
            Err(reason) => {
                tracing::debug!(%reason, "malformed command");
                response::invalid_command_format_reply()
            }
        };

        debug_assert!(reply.len() <= MAX_REPLY_LEN);
        if let Err(error) = protocol::write_frame(&mut stream, reply.as_bytes()).await {
            tracing::debug!(%error, "connection write error");
            return;
        }
    }
}
