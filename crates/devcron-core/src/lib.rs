//! `devcron-core` — minute-resolution crontab scheduling.
//!
//! # Overview
//!
//! A crontab is parsed into a list of immutable [`Entry`] values, each
//! pairing five time fields with a deferred [`Action`] (in practice: launch
//! a shell command). The [`engine::Cron`] loop advances a virtual clock one
//! minute at a time, fires every entry that matches the current minute, and
//! sleeps until real time catches up.
//!
//! # Modules
//!
//! | Module    | Responsibility                                         |
//! |-----------|--------------------------------------------------------|
//! | `types`   | Time-field model, entries, the action seam             |
//! | `crontab` | Crontab text → entries                                 |
//! | `text`    | Pre-parse folding and deletion directives              |
//! | `engine`  | Drift-free tick loop                                   |
//! | `error`   | Parse error taxonomy                                   |

pub mod crontab;
pub mod engine;
pub mod error;
pub mod text;
pub mod types;

pub use crontab::parse_crontab;
pub use engine::Cron;
pub use error::{CrontabError, Result};
pub use types::{Action, Entry, ShellCommand, TimeField};
