//! # fanjoin: fan-out/fan-in with first-error-wins
//!
//! Three slow operations (foo, bar, baz) run at the same time. Their results
//! are merged into one [`ResultRecord`], and the first failure short-circuits
//! the wait.
//!
//! ## Pieces
//! - [`UnitTask`]: sleeps, then draws a number and succeeds or fails
//! - [`Draw`]: where the numbers come from ([`RandomDraw`], [`ScriptedDraw`])
//! - [`Joiner`]: spawns the tasks, guards the record, races error vs done
//! - [`JoinerConfig`]: delay, failure threshold, seed
//!
//! ## Example
//!
//! ```no_run
//! # async fn demo() {
//! match fanjoin::call_foo_bar_baz().await {
//!     Ok(record) => println!("{record}"),
//!     Err(err) => println!("{err}"),
//! }
//! # }
//! ```

pub mod config;
pub mod draw;
pub mod error;
pub mod joiner;
pub mod record;
pub mod task;

pub use config::JoinerConfig;
pub use draw::{Draw, RandomDraw, ScriptedDraw};
pub use error::{ConfigError, TaskError};
pub use joiner::{call_foo_bar_baz, Joiner};
pub use record::ResultRecord;
pub use task::{TaskName, TaskOutcome, UnitTask, SUCCESS_MARKER};
