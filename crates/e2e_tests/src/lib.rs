//! E2E test utilities and support modules.
//!
//! The suites under `tests/` drive a live commerce API. They are ignored by
//! default; run them with:
//!
//! ```bash
//! BASE_URL=https://shop.example.com/rest/default/V1 ADMIN_TOKEN=... \
//!     cargo test -p e2e_tests -- --ignored
//! ```

pub mod fixtures;

pub use fixtures::{read_customer, read_error, SuiteContext};

// Re-export test utilities
pub use test_utils::{generate_random_user, get_run_context, unique_tag};

/// Initialize logging for E2E tests.
///
/// Safe to call from every test: only the first call installs the
/// subscriber. The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_test_writer()
        .try_init();
}
