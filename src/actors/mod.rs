//! Actor running the periodic view count post
//!
//! ```text
//!   Discord ready ──spawns once──► SchedulerActor
//!                                      │ every interval (or TickNow)
//!                                      ▼
//!   ChannelRegistry ──destination──► tick ──► YouTube ──► compose ──► Discord
//! ```
//!
//! The actor owns an mpsc command channel; callers talk to it through a
//! cloneable [`scheduler::SchedulerHandle`]. Ticks run one after another
//! inside the actor task, so two ticks never overlap.

pub mod messages;
pub mod scheduler;
