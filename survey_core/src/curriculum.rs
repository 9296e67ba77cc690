use std::collections::HashMap;

use log::{debug, info};

use crate::model::*;
use crate::normalize::normalize;

/// Where a course lives in the curriculum.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CourseRef {
    pub canonical_name: String,
    pub period_id: String,
    pub period_name: String,
}

/// The outcome of matching a course name written in a survey.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CourseResolution<'a> {
    Resolved(&'a CourseRef),
    /// Not found in the curriculum. The raw name is kept so that no answer is dropped.
    Unclassified(String),
}

/// Flat lookup table from the normalized name of every concrete course to its
/// canonical name and period.
///
/// Elective slots contribute the names of their options, never their own name.
/// When two courses normalize to the same key, the first one in curriculum order
/// is kept.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CurriculumIndex {
    entries: HashMap<String, CourseRef>,
}

impl CurriculumIndex {
    pub fn build(curriculum: &Curriculum) -> CurriculumIndex {
        let mut entries: HashMap<String, CourseRef> = HashMap::new();
        for period in curriculum.periods.iter() {
            for course in period.concrete_courses() {
                let key = normalize(&course.name);
                if key.is_empty() {
                    debug!("CurriculumIndex::build: skipping unnamed course {:?}", course);
                    continue;
                }
                if let Some(existing) = entries.get(&key) {
                    debug!(
                        "CurriculumIndex::build: {:?} ({}) collides with {:?} ({}), keeping the first one",
                        course.name, period.name, existing.canonical_name, existing.period_name
                    );
                    continue;
                }
                entries.insert(
                    key,
                    CourseRef {
                        canonical_name: course.name.clone(),
                        period_id: period.id.clone(),
                        period_name: period.name.clone(),
                    },
                );
            }
        }
        info!(
            "CurriculumIndex::build: {} periods, {} indexed courses",
            curriculum.periods.len(),
            entries.len()
        );
        CurriculumIndex { entries }
    }

    /// An index that resolves nothing, used when no curriculum was provided.
    pub fn empty() -> CurriculumIndex {
        CurriculumIndex::default()
    }

    pub fn from_curriculum(curriculum: Option<&Curriculum>) -> CurriculumIndex {
        curriculum
            .map(CurriculumIndex::build)
            .unwrap_or_else(CurriculumIndex::empty)
    }

    pub fn lookup(&self, raw_course_name: &str) -> Option<&CourseRef> {
        self.entries.get(&normalize(raw_course_name))
    }

    /// The canonical curriculum name for a survey course name.
    pub fn resolve(&self, raw_course_name: &str) -> Option<&str> {
        self.lookup(raw_course_name)
            .map(|c| c.canonical_name.as_str())
    }

    /// The display name of the period of a survey course name.
    pub fn period_of(&self, raw_course_name: &str) -> Option<&str> {
        self.lookup(raw_course_name).map(|c| c.period_name.as_str())
    }

    pub fn classify(&self, raw_course_name: &str) -> CourseResolution<'_> {
        match self.lookup(raw_course_name) {
            Some(c) => CourseResolution::Resolved(c),
            None => {
                debug!(
                    "CurriculumIndex::classify: no curriculum entry for {:?}",
                    raw_course_name
                );
                CourseResolution::Unclassified(raw_course_name.to_string())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
