//! Sequential goal loop: plan, execute the head task, re-plan.
//!
//! Every round stages its messages locally and only touches the queue and the
//! log after the last await has returned. A round that fails, or whose future
//! is dropped mid-flight, leaves the session exactly as it was, so the same
//! round can simply be run again.

use crate::executor::{ExecutorError, TaskExecutor};
use crate::orchestrator::{OrchestratorError, RoundContext, TaskOrchestrator};
use crate::queue::TaskQueue;
use crate::types::{InvariantViolation, Message, TaskStatus};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_MAX_LOOPS: usize = 25;

const ALL_TASKS_DONE: &str = "All tasks completed. Shutting down.";
const MAX_LOOPS_REACHED: &str = "This agent has maxed out on loops. Shutting down.";
const STOPPED_BY_USER: &str = "Agent stopped by the user. Shutting down.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Goal must not be empty")]
    EmptyGoal,
    #[error("Session has already finished")]
    Finished,
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error("Invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// First round: the goal was decomposed into `created` tasks.
    Planned { created: usize },
    /// The head task was executed and `created` follow-up tasks were queued.
    Executed { task: String, created: usize },
}

pub struct AgentSession {
    goal: String,
    api_key: Option<String>,
    max_loops: usize,
    orchestrator: TaskOrchestrator,
    executor: Arc<dyn TaskExecutor>,
    queue: TaskQueue,
    log: Vec<Message>,
    state: SessionState,
    loops: usize,
}

impl AgentSession {
    pub fn new(
        goal: impl Into<String>,
        orchestrator: TaskOrchestrator,
        executor: Arc<dyn TaskExecutor>,
    ) -> Result<Self, SessionError> {
        let goal = goal.into().trim().to_string();
        if goal.is_empty() {
            return Err(SessionError::EmptyGoal);
        }

        Ok(Self {
            goal,
            api_key: None,
            max_loops: DEFAULT_MAX_LOOPS,
            orchestrator,
            executor,
            queue: TaskQueue::new(),
            log: Vec::new(),
            state: SessionState::Idle,
            loops: 0,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_max_loops(mut self, max_loops: usize) -> Self {
        self.max_loops = max_loops.max(1);
        self
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Completed | SessionState::Stopped)
    }

    /// Number of tasks executed so far.
    pub fn loops(&self) -> usize {
        self.loops
    }

    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    pub fn pending_tasks(&self) -> Vec<String> {
        self.queue.snapshot()
    }

    /// Run one round. Nothing is committed unless the whole round succeeds.
    pub async fn run_round(&mut self) -> Result<RoundOutcome, SessionError> {
        match self.state {
            SessionState::Completed | SessionState::Stopped => Err(SessionError::Finished),
            SessionState::Idle => self.plan_round().await,
            SessionState::Running => self.execute_round().await,
        }
    }

    /// Drive rounds until the session finishes or a round fails.
    pub async fn run_to_completion(&mut self) -> Result<(), SessionError> {
        while !self.is_finished() {
            self.run_round().await?;
        }
        Ok(())
    }

    /// Stop an unfinished session. No-op once finished.
    pub fn stop(&mut self) {
        if !self.is_finished() {
            self.finish(SessionState::Stopped, STOPPED_BY_USER);
        }
    }

    async fn plan_round(&mut self) -> Result<RoundOutcome, SessionError> {
        let tasks = self
            .orchestrator
            .start_goal(&self.goal, self.api_key.as_deref())
            .await?;

        self.log.push(Message::goal(self.goal.clone()));
        self.log.push(Message::thinking(""));
        let created = self.enqueue(tasks);
        self.state = SessionState::Running;
        info!(goal = %self.goal, created, "goal planned");

        if self.queue.is_empty() {
            self.finish(SessionState::Completed, ALL_TASKS_DONE);
        }
        Ok(RoundOutcome::Planned { created })
    }

    async fn execute_round(&mut self) -> Result<RoundOutcome, SessionError> {
        let Some(current) = self.queue.front().cloned() else {
            self.finish(SessionState::Completed, ALL_TASKS_DONE);
            return Err(SessionError::Finished);
        };

        let executing = current.advance(TaskStatus::Executing)?;
        debug!(task = %current.value(), "executing task");
        let result = self
            .executor
            .execute(&self.goal, current.value(), self.api_key.as_deref())
            .await?;

        let completed = executing
            .advance(TaskStatus::Completed)?
            .with_info(result.clone());

        let remaining = self.queue.remaining_after_front();
        let tasks = self
            .orchestrator
            .create_tasks(&RoundContext {
                goal: &self.goal,
                existing_tasks: &remaining,
                last_task: current.value(),
                last_result: &result,
                api_key: self.api_key.as_deref(),
            })
            .await?;

        // No follow-ups closes this line of work.
        let closing = if tasks.is_empty() {
            Some(completed.advance(TaskStatus::Final)?)
        } else {
            None
        };
        let mut staged = vec![executing, completed];
        staged.extend(closing);

        // Commit point: no awaits past here.
        self.queue.pop_front();
        self.log.extend(staged);
        let created = self.enqueue(tasks);
        self.loops += 1;
        let metrics = self.orchestrator.metrics();
        metrics.inc_tasks_completed();
        metrics.inc_rounds();

        if self.queue.is_empty() {
            self.finish(SessionState::Completed, ALL_TASKS_DONE);
        } else if self.loops >= self.max_loops {
            self.finish(SessionState::Stopped, MAX_LOOPS_REACHED);
        }

        Ok(RoundOutcome::Executed {
            task: current.value().to_string(),
            created,
        })
    }

    fn enqueue(&mut self, tasks: Vec<String>) -> usize {
        let created = tasks.len();
        for task in tasks {
            let started = self.queue.push_task(task);
            self.log.push(started);
        }
        created
    }

    fn finish(&mut self, state: SessionState, notice: &str) {
        info!(goal = %self.goal, loops = self.loops, ?state, "session finished");
        self.state = state;
        self.log.push(Message::system(notice));
    }
}
