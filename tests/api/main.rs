// fn main not required
mod email;
mod helpers;
mod stats;
mod workflow;

// grouping all integration tests under tests/api keeps cargo building a
// single test executable; helpers is not itself a test
