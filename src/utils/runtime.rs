use anyhow::Result;

/// The daemon does little work per tick, so one thread is enough. Blocking SQLite calls still go
/// through the blocking pool.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
