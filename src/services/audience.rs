//! Audience rule evaluation.
//!
//! Resolves an audience configuration into an expected-attendee count, a
//! membership test for a single student, or a human-readable summary.

use crate::api::{LevelId, SectionId};
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{AudienceConfig, AudienceTarget, RuleMode, StudentContext};
use crate::services::error::FieldError;

/// Expected-attendee resolution for an audience configuration.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExpectedAttendees {
    pub count: i64,
    pub summary: String,
}

/// Resolve both the count and the display summary.
pub async fn expected_attendees(
    repo: &dyn FullRepository,
    config: &AudienceConfig,
) -> RepositoryResult<ExpectedAttendees> {
    Ok(ExpectedAttendees {
        count: expected_count(repo, config).await?,
        summary: audience_summary(repo, config).await?,
    })
}

/// Expected attendee count for a config.
///
/// Two long-standing behaviors are kept deliberately (see DESIGN.md):
/// exclude rules never reduce the count (only the summary string mentions
/// them), and rule kinds are totalled independently, so a student
/// reachable through both a level rule and an explicit student rule is
/// counted twice.
pub async fn expected_count(
    repo: &dyn FullRepository,
    config: &AudienceConfig,
) -> RepositoryResult<i64> {
    if config
        .includes()
        .any(|t| matches!(t, AudienceTarget::AllStudents))
    {
        return repo.count_active_students().await;
    }

    let mut level_ids: Vec<LevelId> = Vec::new();
    let mut section_ids: Vec<SectionId> = Vec::new();
    let mut explicit_students: i64 = 0;

    for target in config.includes() {
        match target {
            AudienceTarget::AllStudents => {}
            AudienceTarget::Level { level_ids: ids } => {
                for id in ids {
                    if !level_ids.contains(id) {
                        level_ids.push(*id);
                    }
                }
            }
            AudienceTarget::Section { section_ids: ids } => {
                for id in ids {
                    if !section_ids.contains(id) {
                        section_ids.push(*id);
                    }
                }
            }
            AudienceTarget::Student { student_ids } => {
                explicit_students += student_ids.len() as i64;
            }
        }
    }

    let mut total = explicit_students;
    if !level_ids.is_empty() {
        total += repo.count_students_by_levels(&level_ids).await?;
    }
    if !section_ids.is_empty() {
        total += repo.count_students_by_sections(&section_ids).await?;
    }
    Ok(total)
}

/// Decide whether a specific student should see an event.
///
/// Eligible iff any include rule matches and no exclude rule matches;
/// exclude always wins over include.
pub fn is_student_eligible(config: &AudienceConfig, ctx: &StudentContext) -> bool {
    let included = config.includes().any(|t| t.matches(ctx));
    let excluded = config.excludes().any(|t| t.matches(ctx));
    included && !excluded
}

/// Human-readable audience summary, e.g.
/// `"Grade 7, Grade 8, 2 section(s) (excluding 1 student(s))"`.
pub async fn audience_summary(
    repo: &dyn FullRepository,
    config: &AudienceConfig,
) -> RepositoryResult<String> {
    let mut parts: Vec<String> = Vec::new();

    let mut all_students = false;
    let mut level_ids: Vec<LevelId> = Vec::new();
    let mut section_count = 0usize;
    let mut student_count = 0usize;

    for target in config.includes() {
        match target {
            AudienceTarget::AllStudents => all_students = true,
            AudienceTarget::Level { level_ids: ids } => {
                for id in ids {
                    if !level_ids.contains(id) {
                        level_ids.push(*id);
                    }
                }
            }
            AudienceTarget::Section { section_ids } => section_count += section_ids.len(),
            AudienceTarget::Student { student_ids } => student_count += student_ids.len(),
        }
    }

    if all_students {
        parts.push("All students".to_string());
    }
    if !level_ids.is_empty() {
        let names = repo.get_level_names(&level_ids).await?;
        for id in &level_ids {
            match names.get(id) {
                Some(name) => parts.push(name.clone()),
                None => parts.push(format!("Level {}", id)),
            }
        }
    }
    if section_count > 0 {
        parts.push(format!("{} section(s)", section_count));
    }
    if student_count > 0 {
        parts.push(format!("{} student(s)", student_count));
    }
    if parts.is_empty() {
        parts.push("No audience selected".to_string());
    }

    let mut summary = parts.join(", ");

    let mut excluded: Vec<String> = Vec::new();
    let (mut ex_levels, mut ex_sections, mut ex_students) = (0usize, 0usize, 0usize);
    for target in config.excludes() {
        match target {
            AudienceTarget::AllStudents => {}
            AudienceTarget::Level { level_ids } => ex_levels += level_ids.len(),
            AudienceTarget::Section { section_ids } => ex_sections += section_ids.len(),
            AudienceTarget::Student { student_ids } => ex_students += student_ids.len(),
        }
    }
    if ex_levels > 0 {
        excluded.push(format!("{} level(s)", ex_levels));
    }
    if ex_sections > 0 {
        excluded.push(format!("{} section(s)", ex_sections));
    }
    if ex_students > 0 {
        excluded.push(format!("{} student(s)", ex_students));
    }
    if !excluded.is_empty() {
        summary.push_str(&format!(" (excluding {})", excluded.join(", ")));
    }

    Ok(summary)
}

/// Structural validation of an audience configuration.
pub fn validate_config(config: &AudienceConfig) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if config.includes().next().is_none() {
        errors.push(FieldError::new(
            "audience.rules",
            "At least one include rule is required",
            "missing_include",
        ));
    }

    for (index, rule) in config.rules.iter().enumerate() {
        if rule.target.is_empty_selection() {
            errors.push(FieldError::new(
                format!("audience.rules[{}]", index),
                match rule.mode {
                    RuleMode::Include => "Include rule selects no one",
                    RuleMode::Exclude => "Exclude rule selects no one",
                },
                "empty_rule",
            ));
        }
    }

    errors
}
