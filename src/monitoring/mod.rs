pub mod command_log;
pub mod console_sink;
pub mod operator_console;
pub mod output_sink;
