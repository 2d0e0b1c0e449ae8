pub mod controller;
pub mod event;
pub mod reactor;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod time;
