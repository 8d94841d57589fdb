//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small episode site and drive the
//! coordinator through full crawls, resumes and failure cases.

mod crawl_tests;
mod resume_tests;
mod support;
