//! Reconciliation integration tests
//!
//! Each test renders a template into a `#container` that already holds some
//! markup and checks what the live tree looks like afterwards.

mod matching_tests;
