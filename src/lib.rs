// where to place tests:
// 1. embedded (with #[cfg(test)]): good for unit testing, easy access to
//    private objects, never exposed to users
// 2. tests/ dir: for integration testing (one executable per tests/* entry;
//    grouping everything under tests/api keeps linking sequential but single)
//
// almost everything lives under the library crate; only the entrypoint is
// kept in src/main.rs, so that integration tests can drive the exact same
// code paths as the binary

pub mod client;
pub mod configuration;
pub mod domain;
pub mod telemetry;
pub mod workflow;
