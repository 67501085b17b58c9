//! What the doc viewer is asked to show.

use std::path::{Path, PathBuf};

use tutor_curriculum::TutorialModel;

/// How the "next" affordance is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextButton {
    /// Not offered.
    Hidden,
    /// Offered prominently: the learner is at the frontier.
    Primary,
    /// Offered quietly: the learner is revisiting an earlier section.
    Secondary,
}

impl NextButton {
    /// Presentation for the given flags.
    ///
    /// Hidden at the end of the tutorial or before the section was ever
    /// completed, unless `always_show` is set.
    pub fn resolve(
        is_end: bool,
        has_ever_been_done: bool,
        is_furthest: bool,
        always_show: bool,
    ) -> Self {
        if (is_end || !has_ever_been_done) && !always_show {
            Self::Hidden
        } else if is_furthest {
            Self::Primary
        } else {
            Self::Secondary
        }
    }
}

/// Snapshot of everything the viewer displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderState {
    /// Section title.
    pub title: String,
    /// Section description.
    pub description: String,
    /// 1-based section number.
    pub section_number: usize,
    /// Number of sections.
    pub section_count: usize,
    /// 0-based step index.
    pub step_index: usize,
    /// Steps in the section.
    pub step_count: usize,
    /// Reading material.
    pub doc: PathBuf,
    /// Working code file, if the step has one.
    pub code: Option<PathBuf>,
    /// Supplementary content, if any.
    pub supplement: Option<PathBuf>,
    /// The section is on its last step.
    pub is_done: bool,
    /// The section was completed at least once.
    pub has_ever_been_done: bool,
    /// The current section is the furthest reached.
    pub is_furthest_section: bool,
    /// The active code file differs from its backup.
    pub is_drifted: bool,
    /// First step of the first section.
    pub is_beginning: bool,
    /// Last section, done.
    pub is_end: bool,
    /// "Next" presentation.
    pub next: NextButton,
}

impl RenderState {
    /// Snapshot `model`, resolving refs against `root`.
    pub fn capture(
        model: &TutorialModel,
        root: &Path,
        is_drifted: bool,
        always_show_next: bool,
    ) -> Self {
        let section = model.current_section();
        let position = model.position();
        let is_done = section.is_done();
        let is_end = model.is_last_section() && is_done;
        let is_furthest_section = model.is_furthest_section();

        Self {
            title: section.title().to_owned(),
            description: section.description().to_owned(),
            section_number: position.section + 1,
            section_count: model.section_count(),
            step_index: position.step,
            step_count: section.step_count(),
            doc: root.join(section.doc()),
            code: section.code().map(|c| root.join(c)),
            supplement: section.supplement().map(|s| root.join(s)),
            is_done,
            has_ever_been_done: section.has_ever_been_done(),
            is_furthest_section,
            is_drifted,
            is_beginning: position.section == 0 && position.step == 0,
            is_end,
            next: NextButton::resolve(
                is_end,
                section.has_ever_been_done(),
                is_furthest_section,
                always_show_next,
            ),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
