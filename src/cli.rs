/// Interactive menu of the binary and non-interactive task runner
pub mod cli_main;
