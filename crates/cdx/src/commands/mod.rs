pub mod fetch;
pub mod lookup;

/// Resolves once Ctrl-C is pressed; never resolves if the handler cannot be
/// installed.
pub(crate) async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::warn!("interrupted, finishing in-flight work");
}
