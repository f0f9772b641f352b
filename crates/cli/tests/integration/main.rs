mod common;
mod export_tests;
mod identity_tests;
