//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod celebration;
pub mod countdown_ticker;

// Re-export main functions
pub use celebration::celebration_task;
pub use countdown_ticker::countdown_ticker_task;
