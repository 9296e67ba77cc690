use std::collections::HashMap;

use log::{debug, info};

use crate::curriculum::{CourseResolution, CurriculumIndex};
use crate::model::*;
use crate::normalize::{collate, is_no_data_marker, software_key};

/// Name of the bucket grouping the courses that are not in the curriculum.
pub const UNCLASSIFIED_PERIOD: &str = "Sin clasificar";

/// Course name used when a survey answer does not name its course.
pub const UNDEFINED_COURSE: &str = "Sin definir";

/// Counts software mentions per platform.
///
/// Mentions are grouped by `software_key`, so "MATLAB" and "Matlab " end up in
/// the same entry. The entry keeps the spelling of the first mention, and entries
/// are kept in the order in which they were first seen.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SoftwareLedger {
    entries: Vec<SoftwareEntry>,
    positions: HashMap<String, usize>,
}

impl SoftwareLedger {
    pub fn new() -> SoftwareLedger {
        SoftwareLedger::default()
    }

    pub fn from_entries(entries: &[SoftwareEntry]) -> SoftwareLedger {
        let mut ledger = SoftwareLedger::new();
        for e in entries {
            ledger.absorb(e);
        }
        ledger
    }

    /// Records one mention of a single software name.
    pub fn record(&mut self, platform: Platform, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let entry = self.entry_mut(name);
        *entry.count_mut(platform) += 1;
    }

    /// Records all the software listed in a survey field.
    pub fn record_field(&mut self, platform: Platform, field: &str) {
        for name in split_software_field(field) {
            self.record(platform, name);
        }
    }

    pub fn record_row(&mut self, row: &SurveyRow, platforms: &[Platform]) {
        for platform in platforms {
            self.record_field(*platform, row.software_field(*platform));
        }
    }

    /// Adds the counts of an entry, creating it if needed.
    pub fn absorb(&mut self, other: &SoftwareEntry) {
        self.entry_mut(&other.name).absorb(other);
    }

    pub fn get(&self, name: &str) -> Option<&SoftwareEntry> {
        self.positions
            .get(&software_key(name))
            .map(|idx| &self.entries[*idx])
    }

    pub fn entries(&self) -> &[SoftwareEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<SoftwareEntry> {
        self.entries
    }

    /// The lookup keys, in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|e| software_key(&e.name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, name: &str) -> &mut SoftwareEntry {
        let key = software_key(name);
        let idx = match self.positions.get(&key) {
            Some(idx) => *idx,
            None => {
                self.entries.push(SoftwareEntry::new(name));
                let idx = self.entries.len() - 1;
                self.positions.insert(key, idx);
                idx
            }
        };
        &mut self.entries[idx]
    }
}

/// The software names of a survey field. No-data markers give nothing.
pub fn split_software_field(field: &str) -> Vec<&str> {
    if is_no_data_marker(field) {
        return vec![];
    }
    field
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Counts the software mentioned in the given platform fields of all the rows.
pub fn accumulate(rows: &[SurveyRow], platforms: &[Platform]) -> Vec<SoftwareEntry> {
    let mut ledger = SoftwareLedger::new();
    for row in rows {
        ledger.record_row(row, platforms);
    }
    debug!(
        "accumulate: {} rows, {} distinct software",
        rows.len(),
        ledger.len()
    );
    ledger.into_entries()
}

/// Combines two partial ledgers. Entries with the same key have their counts
/// added; the spelling and position of the first ledger win.
pub fn merge(a: &[SoftwareEntry], b: &[SoftwareEntry]) -> Vec<SoftwareEntry> {
    let mut ledger = SoftwareLedger::from_entries(a);
    for e in b {
        ledger.absorb(e);
    }
    ledger.into_entries()
}

/// Sorts by total number of mentions. The sort is stable: entries with the same
/// total keep their relative order.
pub fn sort_by_total_mentions(entries: &mut [SoftwareEntry], direction: SortDirection) {
    match direction {
        SortDirection::Descending => entries.sort_by(|a, b| b.total().cmp(&a.total())),
        SortDirection::Ascending => entries.sort_by(|a, b| a.total().cmp(&b.total())),
    }
}

struct CourseAcc {
    course: String,
    unclassified: bool,
    survey_count: usize,
    software: Vec<SoftwareEntry>,
}

struct PeriodAcc {
    period_id: Option<String>,
    period: String,
    courses: Vec<CourseAcc>,
    course_positions: HashMap<String, usize>,
}

/// Software mentions organised by curriculum period, then by course.
///
/// Courses that cannot be resolved against the curriculum (or all of them when
/// there is no curriculum) are grouped in the `UNCLASSIFIED_PERIOD` bucket under
/// their raw name. Periods follow the curriculum order with the unclassified
/// bucket last; only periods with at least one answer are present. Courses are
/// sorted alphabetically within a period.
pub fn software_by_period(
    rows: &[SurveyRow],
    curriculum: Option<&Curriculum>,
) -> Vec<PeriodSoftware> {
    let index = CurriculumIndex::from_curriculum(curriculum);
    info!(
        "software_by_period: {} rows, {} indexed courses",
        rows.len(),
        index.len()
    );

    let mut periods: Vec<PeriodAcc> = Vec::new();
    let mut period_positions: HashMap<Option<String>, usize> = HashMap::new();

    for row in rows {
        let raw_course = match row.course.trim() {
            "" => UNDEFINED_COURSE,
            s => s,
        };
        let (period_id, period_name, course_name, course_key, unclassified) =
            match index.classify(raw_course) {
                CourseResolution::Resolved(c) => (
                    Some(c.period_id.clone()),
                    c.period_name.clone(),
                    c.canonical_name.clone(),
                    c.canonical_name.clone(),
                    false,
                ),
                CourseResolution::Unclassified(raw) => {
                    // Case and accents only: "C" and "C#" are different courses.
                    let key = software_key(&raw);
                    (None, UNCLASSIFIED_PERIOD.to_string(), raw, key, true)
                }
            };

        let p_idx = *period_positions
            .entry(period_id.clone())
            .or_insert_with(|| {
                periods.push(PeriodAcc {
                    period_id,
                    period: period_name,
                    courses: Vec::new(),
                    course_positions: HashMap::new(),
                });
                periods.len() - 1
            });
        let period = &mut periods[p_idx];
        let c_idx = match period.course_positions.get(&course_key) {
            Some(idx) => *idx,
            None => {
                period.courses.push(CourseAcc {
                    course: course_name,
                    unclassified,
                    survey_count: 0,
                    software: Vec::new(),
                });
                period
                    .course_positions
                    .insert(course_key, period.courses.len() - 1);
                period.courses.len() - 1
            }
        };

        let mut row_ledger = SoftwareLedger::new();
        row_ledger.record_row(row, &Platform::ALL);
        let course = &mut period.courses[c_idx];
        course.survey_count += 1;
        course.software = merge(&course.software, row_ledger.entries());
    }

    let period_rank = |period_id: &Option<String>| -> usize {
        curriculum
            .zip(period_id.as_ref())
            .and_then(|(c, id)| c.periods.iter().position(|p| p.id == *id))
            .unwrap_or(usize::MAX)
    };
    periods.sort_by_key(|p| period_rank(&p.period_id));

    periods
        .into_iter()
        .map(|p| {
            let mut courses: Vec<CourseSoftware> = p
                .courses
                .into_iter()
                .map(|c| CourseSoftware {
                    course: c.course,
                    unclassified: c.unclassified,
                    survey_count: c.survey_count,
                    software: c.software,
                })
                .collect();
            courses.sort_by(|a, b| collate(&a.course, &b.course));
            PeriodSoftware {
                period_id: p.period_id,
                period: p.period,
                courses,
            }
        })
        .collect()
}
