mod common;
mod manifest_tests;
mod scenario_tests;
