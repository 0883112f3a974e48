//! Keytyper - human-paced keyboard typing simulator
//!
//! This crate types arbitrary text into the focused window as synthetic
//! keystrokes, with a countdown, jittered per-character pacing, keyboard
//! layout switching between ASCII and wide (CJK) characters, and an
//! indentation-preserving mode that defeats editor auto-indent.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Typing requests, text preprocessing, cadence, the session state machine, errors
//! - **Application**: Typing engine, session controller, and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (SendInput, enigo, keyboard layouts, config file)
//! - **CLI**: Command-line interface, daemon control protocol, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
