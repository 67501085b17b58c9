//! A section: ordered steps plus progression state.
//!
//! State per section is the current step index and two flags:
//!
//! - `done`: raised when [`Section::next_step`] reaches the last step, cleared
//!   by [`Section::previous_step`] and [`Section::reset`]
//! - `has_ever_been_done`: raised together with `done`, cleared only by
//!   [`Section::reset`]
//!
//! For sections with more than one step `done` always equals
//! `current_step == last`. A single-step section starts not done and is
//! completed by its first `next_step`, which is how a successful run of its
//! only code file completes it.

use tracing::debug;

use crate::errors::CurriculumError;
use crate::step::Step;

/// An ordered group of steps with its own progression state.
#[derive(Clone, Debug)]
pub struct Section {
    title: String,
    description: String,
    steps: Vec<Step>,
    current_step: usize,
    done: bool,
    has_ever_been_done: bool,
}

impl Section {
    /// Build a section. `steps` must not be empty.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<Self, CurriculumError> {
        let title = title.into();
        if steps.is_empty() {
            return Err(CurriculumError::EmptySection { index: 0, title });
        }
        Ok(Self {
            title,
            description: description.into(),
            steps,
            current_step: 0,
            done: false,
            has_ever_been_done: false,
        })
    }

    /// Section title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Section description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// All steps, in pedagogical order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps (always at least one).
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// 0-based index of the current step.
    pub fn current_step_index(&self) -> usize {
        self.current_step
    }

    /// The current step.
    pub fn current_step(&self) -> &Step {
        &self.steps[self.current_step]
    }

    /// Whether the current step is the first one.
    pub fn is_at_first_step(&self) -> bool {
        self.current_step == 0
    }

    /// Whether the last step has been reached.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether the section was ever completed since the last reset.
    pub fn has_ever_been_done(&self) -> bool {
        self.has_ever_been_done
    }

    /// Reading reference of the current step.
    pub fn doc(&self) -> &str {
        self.current_step().doc_ref()
    }

    /// Code reference of the current step.
    pub fn code(&self) -> Option<&str> {
        self.current_step().code_ref()
    }

    /// Supplement reference of the current step.
    pub fn supplement(&self) -> Option<&str> {
        self.current_step().supplement_ref()
    }

    /// Advance one step. Returns whether the step index moved.
    ///
    /// At the last step the index stays put and `done` stays raised.
    pub fn next_step(&mut self) -> bool {
        let moved = self.current_step + 1 < self.steps.len();
        if moved {
            self.current_step += 1;
        }
        if self.current_step == self.steps.len() - 1 {
            self.done = true;
            self.has_ever_been_done = true;
        }
        debug!(
            section = %self.title,
            step = self.current_step,
            done = self.done,
            "next step"
        );
        moved
    }

    /// Go back one step. Returns whether the step index moved.
    ///
    /// A no-op at the first step. Moving back always clears `done`.
    pub fn previous_step(&mut self) -> bool {
        if self.current_step == 0 {
            return false;
        }
        self.current_step -= 1;
        self.done = false;
        debug!(section = %self.title, step = self.current_step, "previous step");
        true
    }

    /// Back to the first step with both flags cleared.
    pub fn reset(&mut self) {
        self.current_step = 0;
        self.done = false;
        self.has_ever_been_done = false;
        debug!(section = %self.title, "section reset");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
