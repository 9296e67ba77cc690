use std::collections::HashSet;

use log::{debug, info};

use crate::curriculum::CurriculumIndex;
use crate::ledger::software_by_period;
use crate::model::*;
use crate::normalize::software_key;

/// Computes which curriculum courses have at least one survey answer.
///
/// A course is covered when the course field of some row resolves, through the
/// curriculum index, to exactly that course. Electives are expanded: every option
/// is a course of its own and the slot is not counted.
pub fn analyze(curriculum: &Curriculum, rows: &[SurveyRow]) -> CoverageReport {
    let index = CurriculumIndex::build(curriculum);
    let covered_names: HashSet<&str> = rows
        .iter()
        .filter_map(|r| index.resolve(&r.course))
        .collect();
    debug!("analyze: covered courses: {:?}", covered_names);

    let by_period = software_by_period(rows, Some(curriculum));

    let mut per_period: Vec<CoverageStat> = Vec::new();
    let mut global = GlobalCoverage::default();
    for period in curriculum.periods.iter() {
        let mut total_courses = 0;
        let mut covered_courses = 0;
        let mut uncovered: Vec<String> = Vec::new();
        for course in period.concrete_courses() {
            total_courses += 1;
            if covered_names.contains(course.name.as_str()) {
                covered_courses += 1;
            } else {
                uncovered.push(course.name.clone());
            }
        }

        let distinct_software: HashSet<String> = by_period
            .iter()
            .filter(|p| p.period_id.as_deref() == Some(period.id.as_str()))
            .flat_map(|p| p.courses.iter())
            .flat_map(|c| c.software.iter())
            .map(|e| software_key(&e.name))
            .collect();

        global.total_courses += total_courses;
        global.total_covered += covered_courses;
        per_period.push(CoverageStat {
            period_id: period.id.clone(),
            period: period.name.clone(),
            total_courses,
            covered_courses,
            uncovered,
            distinct_software: distinct_software.len(),
        });
    }

    info!(
        "analyze: {} of {} courses covered across {} periods",
        global.total_covered,
        global.total_courses,
        per_period.len()
    );
    CoverageReport { per_period, global }
}
