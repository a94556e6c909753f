//! Task lifecycle and message-classification core for goal-driven agents.
//!
//! A goal is decomposed into tasks by [`TaskOrchestrator`], each task moves
//! through [`TaskStatus`] as [`AgentSession`] executes it, and
//! [`presentation::present`] maps every [`Message`] to what a renderer shows.

pub mod executor;
pub mod metrics;
pub mod orchestrator;
pub mod parser;
pub mod presentation;
pub mod prompts;
pub mod queue;
pub mod session;
pub mod status;
pub mod types;

pub use executor::{ExecutorError, ModelTaskExecutor, TaskExecutor};
pub use metrics::{Metrics, MetricsSnapshot};
pub use orchestrator::{OrchestratorError, RoundContext, TaskOrchestrator};
pub use parser::parse_completion;
pub use presentation::{present, visible_log, Content, DisplayDirective, Icon};
pub use queue::TaskQueue;
pub use session::{AgentSession, RoundOutcome, SessionError, SessionState};
pub use status::{can_transition, classify, is_action};
pub use types::*;
