pub mod builders;
pub mod scripted_diff;

use std::sync::Arc;
use std::sync::Once;

use affected::fs::FileSystem;
use affected::fs::mock::MockFileSystem;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// A mock build root at `.` where each listed directory carries a
/// `build.gradle.kts`.
pub fn mock_build_root(project_dirs: &[&str]) -> Arc<dyn FileSystem> {
    let fs = MockFileSystem::new();
    fs.add_file("./build.gradle.kts");
    for dir in project_dirs {
        fs.add_file(format!("./{dir}/build.gradle.kts"));
    }
    Arc::new(fs)
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
