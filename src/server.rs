// taskd: Server aggregate state and the Listener

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::catalog::TaskCatalog;
use crate::connection;
use crate::error::{ServerError, ServerResult};
use crate::table::TaskTable;

/// Owns the read-only catalog and the mutex-guarded task table. One `Server`
/// is constructed in `main` and shared (via `Arc`) with every spawned
/// connection handler and executor, rather than living behind a global or
/// static.
pub struct Server {
    pub(crate) catalog: Arc<TaskCatalog>,
    pub(crate) table: Mutex<TaskTable>,
}

impl Server {
    pub fn new(catalog: TaskCatalog, max_threads: usize) -> Arc<Self> {
        Arc::new(Self {
            catalog: Arc::new(catalog),
            table: Mutex::new(TaskTable::new(max_threads)),
        })
    }

    /// Deactivates every instance named `name`: marks its slot inactive and
    /// joins the matching executor(s). The table lock is held only long
    /// enough to extract the join handles — joining happens outside the lock.
    pub async fn deactivate(&self, name: &str) {
        let handles = {
            let mut table = self.table.lock().await;
            table.take_inactive_by_name(name)
        };
        for handle in handles {
            if let Err(error) = handle.await {
                tracing::warn!(task = name, %error, "executor task panicked while joining");
            }
        }
        tracing::info!(task = name, "task deactivated");
    }

    /// Binds the listener on `port` and accepts connections until the
    /// process is terminated.
    pub async fn run(self: Arc<Self>, port: u16) -> ServerResult<()> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|source| ServerError::BindFailed { port, source })?;
        tracing::info!(port, "listening");
        self.serve(listener).await
    }

    /// Accepts connections on an already-bound listener until the process is
    /// terminated. Each accepted socket is handed to a freshly spawned
    /// connection handler task. Accept errors are logged and the loop
    /// continues; they never tear down the listener. Split out from `run` so
    /// tests can bind an ephemeral port (`:0`) without a bind-then-rebind race.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> ServerResult<()> {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "accepted connection");
                    let server = Arc::clone(&self);
                    tokio::spawn(connection::handle(server, stream));
                }
                Err(error) => {
                    tracing::warn!(%error, "accept failed");
                }
            }
        }
    }
}
