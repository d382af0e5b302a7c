/*! Integration tests for myopie.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - data: Tests for the data store (paths, containers, previous snapshots)
 * - dom: Tests for the host tree (parsing, selectors, events, serialization)
 * - diff: Tests for reconciling template trees onto live trees
 * - render: Tests for the Renderer lifecycle, hooks, handlers and input binding
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("myopie=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod diff;
mod helpers;
