#[allow(dead_code)]
pub mod testing {

    /// Enable trace logging for a test run by setting RUST_LOG, e.g. "RUST_LOG=trace".
    /// See: https://docs.rs/env_logger/latest/env_logger/#capturing-logs-in-tests
    ///
    /// Requires "env_logger" feature.
    pub fn logging_init() {
        #[cfg(feature = "env_logger")]
        let _ = env_logger::builder().is_test(true).try_init();
    }
}
