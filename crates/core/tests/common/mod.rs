//! Shared infrastructure for the test suite.


pub use harness::{TestContext, build};
