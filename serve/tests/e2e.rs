//! End-to-end tests: a real server on `127.0.0.1:0`, driven over HTTP with reqwest.

#[path = "e2e/common.rs"]
mod common;

#[path = "e2e/graphs.rs"]
mod graphs;

#[path = "e2e/errors.rs"]
mod errors;

#[path = "e2e/code_review.rs"]
mod code_review;
