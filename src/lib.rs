//! A notification daemon that stacks pop-ups from a screen corner.
//!
//! The core lives in [`daemon`] and [`state`]; [`app`] drives it from a
//! single event loop fed by the D-Bus server in [`subscriptions`].

pub mod app;
pub mod backend;
pub mod config;
mod constants;
pub mod daemon;
pub mod state;
pub mod subscriptions;
