// taskd: CLI / configuration surface

use clap::Parser;

/// Default slot count if `--max-threads` is not given.
pub const DEFAULT_MAX_THREADS: usize = 10;

/// Default catalog capacity if `--max-tasks` is not given.
pub const DEFAULT_MAX_TASKS: usize = 50;

/// Real-time task admission and execution server.
#[derive(Debug, Parser, Clone)]
#[command(name = "taskd", about = "Deadline-Monotonic admission server for periodic tasks")]
pub struct Cli {
    /// TCP port to listen on
    pub port: u16,

    /// Path to the whitespace-delimited task catalog (`<name> <C> <T> <D>` per line)
    #[arg(long, default_value = "tasks.config")]
    pub catalog: String,

    /// Maximum number of concurrently active task instances
    #[arg(long, default_value_t = DEFAULT_MAX_THREADS)]
    pub max_threads: usize,

    /// Maximum number of catalog records accepted at load time
    #[arg(long, default_value_t = DEFAULT_MAX_TASKS)]
    pub max_tasks: usize,
}
