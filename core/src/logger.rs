//! Pluggable sink for verbose request/response logging.
//!
//! The client only writes here when verbose logging is enabled. The sink is
//! injected at construction; [`NoopLogger`] is the default.

/// Receives verbose log lines from the client.
pub trait RequestLogger: Send + Sync {
    fn log(&self, message: &str);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl RequestLogger for NoopLogger {
    fn log(&self, _message: &str) {}
}

/// Writes each line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutLogger;

impl RequestLogger for StdoutLogger {
    fn log(&self, message: &str) {
        println!("{message}");
    }
}

/// Forwards each line to `tracing` at debug level under the `flickr::verbose`
/// target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl RequestLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::debug!(target: "flickr::verbose", "{message}");
    }
}
