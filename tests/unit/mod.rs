pub mod oracle_tests;
