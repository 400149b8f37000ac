//! Runtime core for a word-based LED clock.
//!
//! The clock is built from a handful of cooperating subsystems (display, time
//! keeping, Wi-Fi, web panel), each running its own cooperative loop and
//! talking to the others through a small address-keyed message bus:
//!
//! - [`message`] / [`bus`] — fixed-shape datagrams and single-consumer routing.
//! - [`task`] — the per-subsystem loop: block on notification bits, drain the
//!   inbound queue, dispatch to a [`task::TaskHandler`].
//! - [`timer`] — turns a recurring tick into a queued message so periodic work
//!   flows through the same dispatch path as everything else.
//! - [`wifi`] — station/access-point lifecycle with timeout-driven recovery.
//! - [`clock`] — pushes time-sync results into the wall clock and announces
//!   minute changes.
//! - [`layout`] / [`render`] / [`bit_matrix`] — the time-to-words pipeline
//!   that produces the illumination mask handed to the LED driver.
//! - [`display`] / [`web`] / [`settings`] — the subsystems that consume it.
//!
//! Hardware stays outside: the LED strip driver, the persistent preference
//! store, the NTP client, the Wi-Fi stack and the web widget library are all
//! traits implemented by the integrator's board crate.
//!
//! # Glossary
//!
//! - **Notification bit**: one flag in the small bitset a subsystem loop
//!   blocks on; distinct bits multiplex distinct wake reasons.
//! - **Minute bucket**: `minute / 5`, selecting a row of the minute-word
//!   table; the remainder is shown by the single-minute words.
//! - **Serpentine transform**: reversal of alternating rows so the mask
//!   matches the electrical order of a zig-zag wired LED matrix.
#![no_std]
#![allow(async_fn_in_trait, reason = "single-threaded embedded")]

// Logging macros must be visible before any other module.
#[macro_use]
mod fmt;

pub mod bit_matrix;
pub mod bus;
pub mod clock;
pub mod codec;
pub mod datetime;
pub mod display;
mod error;
pub mod layout;
pub mod message;
pub mod render;
pub mod settings;
pub mod task;
pub mod timer;
pub mod web;
pub mod wifi;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
