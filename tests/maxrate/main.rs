// tests/maxrate/main.rs

mod transfer_tests;
