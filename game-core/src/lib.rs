pub mod draw_log;
pub mod guess;
pub mod rate_limit;
pub mod roster;
pub mod scheduler;
pub mod session;
pub mod words;

// Re-export main components
pub use draw_log::*;
pub use guess::*;
pub use rate_limit::*;
pub use roster::*;
pub use scheduler::*;
pub use session::*;
pub use words::*;
