pub mod commands;
pub mod logging;
pub mod report;
pub mod scenario;
pub mod utils;
