//! Cross-module scenario tests: the default system built from a synthetic
//! parameter table and driven through time.

mod system_tests;
