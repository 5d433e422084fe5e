//! tests/mod.rs

mod support;

mod campaign_tests;
