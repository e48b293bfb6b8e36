#![allow(dead_code)]

pub use affected_test_utils::{init_tracing, mock_build_root, with_timeout};

use std::collections::BTreeSet;

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
