// src/exec/forward.rs

//! Line-by-line forwarding of a child process's output streams.
//!
//! Each subprocess gets one forwarder task per stream. The tasks exist to
//! keep the pipe buffers drained (a child writing into a full, unread pipe
//! blocks forever) and to relay its output with a recognisable prefix.
//!
//! A forwarder runs until the stream is exhausted or closed; a read error
//! ends the loop silently, exactly like end-of-stream. Process termination is
//! detected by the runner, not here.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

/// Spawn a task relaying `reader` to our stdout as `prefix + line`.
pub fn spawn_stdout_forwarder<R>(reader: R, prefix: String) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("{prefix}{line}");
        }
    })
}

/// Spawn a task relaying `reader` to our stderr as `prefix + line`.
pub fn spawn_stderr_forwarder<R>(reader: R, prefix: String) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            eprintln!("{prefix}{line}");
        }
    })
}
