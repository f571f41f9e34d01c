pub mod clip;
pub mod clipboard;
pub mod config;
pub mod docx;
pub mod outline;
pub mod progress;
pub mod session;
pub mod textnorm;
