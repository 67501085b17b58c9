//! The tutorial model: ordered sections with cross-section navigation.
//!
//! The model tracks the current section and a monotonic high-water mark of
//! the furthest section ever selected. It does not forbid selecting a
//! section beyond the mark; callers use [`TutorialModel::is_unlocked`] to
//! gate forward navigation.
//!
//! Crossing back into a previous section keeps that section's own state, so
//! the learner lands on the step they left it at (its last step, when it was
//! left through [`TutorialModel::go_next`]).

use tracing::{debug, info};

use crate::errors::{CurriculumError, NavigationError};
use crate::section::Section;

/// Where the learner is: a section index and that section's step index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// 0-based section index.
    pub section: usize,
    /// 0-based step index within the section.
    pub step: usize,
}

/// What a navigation call changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Moved within the current section.
    Step {
        /// New step index.
        step: usize,
    },
    /// Moved to another section.
    Section {
        /// Previous section index.
        from: usize,
        /// New section index.
        to: usize,
    },
    /// Nothing moved (flags may still have changed).
    Unchanged,
}

impl Navigation {
    /// Whether the current section changed.
    pub fn crossed_section(self) -> bool {
        matches!(self, Self::Section { .. })
    }
}

/// An ordered, non-empty sequence of sections.
#[derive(Clone, Debug)]
pub struct TutorialModel {
    sections: Vec<Section>,
    current_section: usize,
    latest_reached: usize,
}

impl TutorialModel {
    /// Build a model positioned at section 0. `sections` must not be empty.
    pub fn new(sections: Vec<Section>) -> Result<Self, CurriculumError> {
        if sections.is_empty() {
            return Err(CurriculumError::Empty);
        }
        Ok(Self {
            sections,
            current_section: 0,
            latest_reached: 0,
        })
    }

    /// All sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections (always at least one).
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Index of the current section.
    pub fn current_section_index(&self) -> usize {
        self.current_section
    }

    /// Furthest section index ever selected.
    pub fn latest_reached_section_index(&self) -> usize {
        self.latest_reached
    }

    /// The current section.
    pub fn current_section(&self) -> &Section {
        &self.sections[self.current_section]
    }

    /// The current section, mutably.
    pub fn current_section_mut(&mut self) -> &mut Section {
        &mut self.sections[self.current_section]
    }

    /// Current section and step.
    pub fn position(&self) -> Position {
        Position {
            section: self.current_section,
            step: self.current_section().current_step_index(),
        }
    }

    /// Whether the current section is the high-water mark.
    pub fn is_furthest_section(&self) -> bool {
        self.current_section == self.latest_reached
    }

    /// Whether the current section is the last one.
    pub fn is_last_section(&self) -> bool {
        self.current_section + 1 == self.sections.len()
    }

    /// Whether section `index` was already reached and may be revisited freely.
    pub fn is_unlocked(&self, index: usize) -> bool {
        index <= self.latest_reached
    }

    /// Make section `index` current, raising the high-water mark if needed.
    ///
    /// Fails with [`NavigationError::InvalidIndex`] and leaves the model
    /// untouched when `index` is out of bounds.
    pub fn select_section(&mut self, index: usize) -> Result<(), NavigationError> {
        if index >= self.sections.len() {
            return Err(NavigationError::InvalidIndex {
                index,
                len: self.sections.len(),
            });
        }
        self.current_section = index;
        if index > self.latest_reached {
            self.latest_reached = index;
            info!(section = index, "new section reached");
        }
        debug!(section = index, latest = self.latest_reached, "section selected");
        Ok(())
    }

    /// Step back, crossing into the previous section from a first step.
    ///
    /// At section 0, step 0 nothing moves.
    pub fn go_back(&mut self) -> Navigation {
        let from = self.current_section;
        if self.current_section().is_at_first_step() {
            if from == 0 {
                return Navigation::Unchanged;
            }
            self.current_section = from - 1;
            debug!(from, to = from - 1, "back into previous section");
            return Navigation::Section { from, to: from - 1 };
        }
        let _ = self.current_section_mut().previous_step();
        Navigation::Step {
            step: self.current_section().current_step_index(),
        }
    }

    /// Step forward, crossing into the next section once the current one
    /// is done. At the end of the last section nothing moves.
    pub fn go_next(&mut self) -> Navigation {
        let from = self.current_section;
        if self.current_section().is_done() {
            if self.is_last_section() {
                return Navigation::Unchanged;
            }
            // in bounds: checked by is_last_section above
            let _ = self.select_section(from + 1);
            return Navigation::Section { from, to: from + 1 };
        }
        self.next_step()
    }

    /// Advance the current section by one step.
    pub fn next_step(&mut self) -> Navigation {
        if self.current_section_mut().next_step() {
            Navigation::Step {
                step: self.current_section().current_step_index(),
            }
        } else {
            Navigation::Unchanged
        }
    }

    /// Reset the current section to its first step.
    pub fn reset_current_section(&mut self) {
        self.current_section_mut().reset();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Step;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn model(steps_per_section: &[usize]) -> TutorialModel {
        let sections = steps_per_section
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let steps = (0..n).map(|j| Step::new(format!("docs/{i}-{j}.md"))).collect();
                Section::new(format!("Section {i}"), "", steps).unwrap()
            })
            .collect();
        TutorialModel::new(sections).unwrap()
    }

    #[test]
    fn empty_model_rejected() {
        assert_matches!(TutorialModel::new(Vec::new()), Err(CurriculumError::Empty));
    }

    #[test]
    fn initial_state() {
        let m = model(&[2, 3]);
        assert_eq!(m.current_section_index(), 0);
        assert_eq!(m.latest_reached_section_index(), 0);
        assert!(m.sections().iter().all(|s| s.current_step_index() == 0));
        assert!(m.is_furthest_section());
    }

    #[test]
    fn select_raises_high_water_mark() {
        let mut m = model(&[1, 1, 1]);
        m.select_section(2).unwrap();
        assert_eq!(m.latest_reached_section_index(), 2);
        m.select_section(0).unwrap();
        assert_eq!(m.current_section_index(), 0);
        assert_eq!(m.latest_reached_section_index(), 2);
        assert!(!m.is_furthest_section());
        assert!(m.is_unlocked(2));
    }

    #[test]
    fn select_out_of_bounds_leaves_state() {
        let mut m = model(&[1, 1]);
        m.select_section(1).unwrap();
        let err = m.select_section(2).unwrap_err();
        assert_eq!(err, NavigationError::InvalidIndex { index: 2, len: 2 });
        assert_eq!(m.current_section_index(), 1);
        assert_eq!(m.latest_reached_section_index(), 1);
    }

    #[test]
    fn back_from_first_step_crosses_section() {
        let mut m = model(&[1, 1]);
        m.select_section(1).unwrap();
        let nav = m.go_back();
        assert_eq!(nav, Navigation::Section { from: 1, to: 0 });
        assert_eq!(m.position(), Position { section: 0, step: 0 });
    }

    #[test]
    fn back_lands_on_step_section_was_left_at() {
        let mut m = model(&[3, 2]);
        let _ = m.go_next();
        let _ = m.go_next();
        assert_eq!(m.go_next(), Navigation::Section { from: 0, to: 1 });
        assert_eq!(m.go_back(), Navigation::Section { from: 1, to: 0 });
        assert_eq!(m.position(), Position { section: 0, step: 2 });
    }

    #[test]
    fn back_within_section_steps_back() {
        let mut m = model(&[3]);
        let _ = m.next_step();
        assert_eq!(m.go_back(), Navigation::Step { step: 0 });
    }

    #[test]
    fn back_at_very_beginning_is_noop() {
        let mut m = model(&[2, 2]);
        assert_eq!(m.go_back(), Navigation::Unchanged);
        assert_eq!(m.position(), Position { section: 0, step: 0 });
    }

    #[test]
    fn next_advances_step_until_done_then_section() {
        let mut m = model(&[2, 1]);
        assert_eq!(m.go_next(), Navigation::Step { step: 1 });
        assert!(m.current_section().is_done());
        assert_eq!(m.go_next(), Navigation::Section { from: 0, to: 1 });
        assert_eq!(m.latest_reached_section_index(), 1);
    }

    #[test]
    fn next_completes_single_step_section_before_crossing() {
        let mut m = model(&[1, 1]);
        assert_eq!(m.go_next(), Navigation::Unchanged);
        assert!(m.current_section().is_done());
        assert_eq!(m.go_next(), Navigation::Section { from: 0, to: 1 });
    }

    #[test]
    fn next_at_end_of_last_section_is_noop() {
        let mut m = model(&[1]);
        let _ = m.go_next();
        assert_eq!(m.go_next(), Navigation::Unchanged);
        assert_eq!(m.current_section_index(), 0);
    }

    #[test]
    fn reset_current_section_only() {
        let mut m = model(&[2, 2]);
        let _ = m.go_next();
        let _ = m.go_next();
        let _ = m.go_next();
        m.reset_current_section();
        assert_eq!(m.sections()[0].current_step_index(), 1);
        assert_eq!(m.sections()[1].current_step_index(), 0);
    }

    proptest! {
        #[test]
        fn high_water_mark_is_monotonic(
            picks in proptest::collection::vec(0usize..8, 0..50),
        ) {
            let mut m = model(&[1, 2, 1, 3, 1]);
            let mut prev = m.latest_reached_section_index();
            for i in picks {
                let before = (m.current_section_index(), m.latest_reached_section_index());
                match m.select_section(i) {
                    Ok(()) => prop_assert_eq!(m.current_section_index(), i),
                    Err(NavigationError::InvalidIndex { .. }) => {
                        prop_assert!(i >= 5);
                        prop_assert_eq!(
                            (m.current_section_index(), m.latest_reached_section_index()),
                            before
                        );
                    }
                }
                prop_assert!(m.latest_reached_section_index() >= prev);
                prop_assert!(m.latest_reached_section_index() >= m.current_section_index());
                prev = m.latest_reached_section_index();
            }
        }
    }
}
