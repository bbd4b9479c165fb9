pub mod config;
pub mod daemon;
pub mod license;
pub mod save_restart;
pub mod serve;
pub mod watch;
