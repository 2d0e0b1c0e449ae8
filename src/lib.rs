pub mod camera;
pub mod config;
pub mod detector;
pub mod error;
pub mod kernel;
pub mod services;

pub use kernel::controller::Controller;
pub use kernel::reactor::Reactor;
