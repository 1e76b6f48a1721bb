//! Audience configuration: include/exclude rules resolving to a student
//! population.

use serde::{Deserialize, Serialize};

use crate::api::{LevelId, SectionId, StudentId};

/// Whether a rule adds to or carves out of the audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMode {
    Include,
    Exclude,
}

/// What an audience rule matches. Tagged union with the discriminant in
/// `type`, validated at the deserialization boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AudienceTarget {
    AllStudents,
    Level { level_ids: Vec<LevelId> },
    Section { section_ids: Vec<SectionId> },
    Student { student_ids: Vec<StudentId> },
}

impl AudienceTarget {
    /// Does this target match the given student's memberships?
    pub fn matches(&self, ctx: &StudentContext) -> bool {
        match self {
            AudienceTarget::AllStudents => true,
            AudienceTarget::Level { level_ids } => level_ids.contains(&ctx.level_id),
            AudienceTarget::Section { section_ids } => section_ids.contains(&ctx.section_id),
            AudienceTarget::Student { student_ids } => student_ids.contains(&ctx.student_id),
        }
    }

    /// True when the target carries an id list and that list is empty.
    pub fn is_empty_selection(&self) -> bool {
        match self {
            AudienceTarget::AllStudents => false,
            AudienceTarget::Level { level_ids } => level_ids.is_empty(),
            AudienceTarget::Section { section_ids } => section_ids.is_empty(),
            AudienceTarget::Student { student_ids } => student_ids.is_empty(),
        }
    }
}

/// One audience rule: a mode plus a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceRule {
    pub mode: RuleMode,
    #[serde(flatten)]
    pub target: AudienceTarget,
}

impl AudienceRule {
    pub fn include(target: AudienceTarget) -> Self {
        Self {
            mode: RuleMode::Include,
            target,
        }
    }

    pub fn exclude(target: AudienceTarget) -> Self {
        Self {
            mode: RuleMode::Exclude,
            target,
        }
    }
}

/// Versioned, ordered audience rule list.
///
/// Rules are immutable once attached to a committed event revision; an
/// update replaces the whole config. A valid config carries at least one
/// include rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub rules: Vec<AudienceRule>,
}

impl AudienceConfig {
    /// Config targeting every active student.
    pub fn all_students() -> Self {
        Self {
            version: default_version(),
            rules: vec![AudienceRule::include(AudienceTarget::AllStudents)],
        }
    }

    pub fn includes(&self) -> impl Iterator<Item = &AudienceTarget> {
        self.rules
            .iter()
            .filter(|r| r.mode == RuleMode::Include)
            .map(|r| &r.target)
    }

    pub fn excludes(&self) -> impl Iterator<Item = &AudienceTarget> {
        self.rules
            .iter()
            .filter(|r| r.mode == RuleMode::Exclude)
            .map(|r| &r.target)
    }
}

impl Default for AudienceConfig {
    fn default() -> Self {
        Self::all_students()
    }
}

fn default_version() -> u32 {
    1
}

/// A student's group memberships, as resolved by the repository for a
/// user account (the student's own, or each child of a guardian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentContext {
    pub student_id: StudentId,
    pub section_id: SectionId,
    pub level_id: LevelId,
}
