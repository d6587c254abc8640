//! Adapter module - hands kernel events to the outside world without blocking
//!
//! The kernel calls its collaborators synchronously from inside a tick. This
//! crate provides implementations that only enqueue and return:
//!
//! - [`channel::ChannelStatsSink`]: pushes final run reports onto a bounded tokio
//!   channel; a full or closed queue drops the report and logs a warning
//! - [`channel::ChannelLevelUpNotifier`]: pushes level-up numbers onto an
//!   unbounded channel
//!
//! On the async side, [`runtime::forward_submissions`] drains the report queue
//! and writes each report as one line of JSON ([`protocol::SubmissionPayload`]).
//!
//! # Environment Variables
//!
//! - `TETRAVERSUS_SUBMIT_CAPACITY`: size of the submission queue (default: 16)
//! - `TETRAVERSUS_SUBMIT_DISABLED`: set to "1" or "true" to drop all submissions
//!
//! # Example Output
//!
//! ```text
//! {"points":37,"level":4,"rows_deleted":7,"i_pieces":5,"o_pieces":4,"t_pieces":6,"s_pieces":3,"z_pieces":5,"j_pieces":4,"l_pieces":6}
//! ```

pub mod channel;
pub mod protocol;
pub mod runtime;

pub use tetraversus_core as core;
pub use tetraversus_types as types;

pub use channel::{level_up_channel, stats_channel, ChannelLevelUpNotifier, ChannelStatsSink};
pub use protocol::SubmissionPayload;
pub use runtime::{forward_submissions, AdapterConfig, SubmissionRuntime};
