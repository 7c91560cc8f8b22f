#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

mod parser_tests;
