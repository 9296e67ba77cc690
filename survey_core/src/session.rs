use log::info;

use crate::coverage;
use crate::ledger;
use crate::model::*;
use crate::query::{self, Facets, Remarks, RowFilter};
use crate::roster;

/// The inputs loaded for one analysis.
///
/// A session is never modified in place: loading another file or selecting a
/// filter produces a new session, and every view is recomputed from it.
///
/// ```
/// use survey_core::{Session, SortDirection, SurveyRow};
///
/// let rows = vec![SurveyRow {
///     teacher: "Ana López".to_string(),
///     course: "Redes".to_string(),
///     software_windows: "Wireshark, Packet Tracer".to_string(),
///     ..SurveyRow::default()
/// }];
/// let summary = Session::new(&rows).summarize(SortDirection::Descending)?;
/// assert_eq!(summary.software.len(), 2);
/// assert!(summary.coverage.is_none());
///
/// # Ok::<(), survey_core::SummaryErrors>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Session {
    rows: Vec<SurveyRow>,
    curriculum: Option<Curriculum>,
    roster: Option<Roster>,
}

/// Every derived view of a session.
#[derive(PartialEq, Debug, Clone)]
pub struct Summary {
    pub survey_count: usize,
    /// All the software mentioned, sorted by number of mentions.
    pub software: Vec<SoftwareEntry>,
    pub by_period: Vec<PeriodSoftware>,
    /// Only with a curriculum.
    pub coverage: Option<CoverageReport>,
    /// Only with a roster.
    pub teachers: Option<Vec<TeacherStatus>>,
    pub remarks: Remarks,
    pub facets: Facets,
}

impl Session {
    pub fn new(rows: &[SurveyRow]) -> Session {
        Session {
            rows: rows.to_vec(),
            curriculum: None,
            roster: None,
        }
    }

    pub fn with_curriculum(self, curriculum: Option<Curriculum>) -> Session {
        Session { curriculum, ..self }
    }

    pub fn with_roster(self, roster: Option<Roster>) -> Session {
        Session { roster, ..self }
    }

    /// A session restricted to the rows accepted by the filter.
    pub fn restrict(&self, filter: &RowFilter) -> Session {
        Session {
            rows: query::filter_rows(&self.rows, filter),
            curriculum: self.curriculum.clone(),
            roster: self.roster.clone(),
        }
    }

    pub fn rows(&self) -> &[SurveyRow] {
        &self.rows
    }

    pub fn curriculum(&self) -> Option<&Curriculum> {
        self.curriculum.as_ref()
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Computes all the views. Fails only when there is no survey answer at all.
    pub fn summarize(&self, direction: SortDirection) -> Result<Summary, SummaryErrors> {
        if self.rows.is_empty() {
            return Err(SummaryErrors::EmptyDataset);
        }
        info!(
            "summarize: {} rows, curriculum: {}, roster: {}",
            self.rows.len(),
            self.curriculum.is_some(),
            self.roster.as_ref().map(|r| r.len()).unwrap_or(0)
        );

        let mut software = ledger::accumulate(&self.rows, &Platform::ALL);
        ledger::sort_by_total_mentions(&mut software, direction);

        let mut by_period = ledger::software_by_period(&self.rows, self.curriculum());
        for p in by_period.iter_mut() {
            for c in p.courses.iter_mut() {
                ledger::sort_by_total_mentions(&mut c.software, direction);
            }
        }

        Ok(Summary {
            survey_count: self.rows.len(),
            software,
            by_period,
            coverage: self
                .curriculum()
                .map(|c| coverage::analyze(c, &self.rows)),
            teachers: self.roster().map(|r| roster::reconcile(r, &self.rows)),
            remarks: query::remarks(&self.rows),
            facets: query::facets(&self.rows, None, None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::tests::{curriculum, direct, period};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn row(teacher: &str, course: &str, windows: &str) -> SurveyRow {
        SurveyRow {
            teacher: teacher.to_string(),
            course: course.to_string(),
            semester: "SEMESTRE I".to_string(),
            software_windows: windows.to_string(),
            ..SurveyRow::default()
        }
    }

    #[test]
    fn empty_dataset_is_blocked() {
        init();
        let s = Session::new(&[]);
        assert!(s.is_empty());
        assert_eq!(
            s.summarize(SortDirection::Descending),
            Err(SummaryErrors::EmptyDataset)
        );
    }

    #[test]
    fn two_rows_without_curriculum_or_roster() {
        init();
        let rows = vec![row("X", "Algebra", "Excel, R"), row("Y", "Algebra", "R")];
        let summary = Session::new(&rows)
            .summarize(SortDirection::Descending)
            .unwrap();
        assert_eq!(summary.survey_count, 2);
        let global: Vec<(&str, u64)> = summary
            .software
            .iter()
            .map(|e| (e.name.as_str(), e.windows_count))
            .collect();
        assert_eq!(global, vec![("R", 2), ("Excel", 1)]);
        assert!(summary.coverage.is_none());
        assert!(summary.teachers.is_none());
        assert_eq!(summary.by_period.len(), 1);
        assert_eq!(summary.by_period[0].courses[0].software[0].name, "R");
    }

    #[test]
    fn full_session() {
        init();
        let c = curriculum(vec![period(
            "1",
            "P1",
            vec![direct("Álgebra"), direct("Redes")],
        )]);
        let rows = vec![
            row("Ana", "algebra", "Octave"),
            row("Luis", "Seminario", "Word"),
        ];
        let s = Session::new(&rows)
            .with_curriculum(Some(c))
            .with_roster(Some(Roster::new(&["ANA".to_string(), "Marta".to_string()])));
        let summary = s.summarize(SortDirection::Ascending).unwrap();

        let coverage = summary.coverage.unwrap();
        assert_eq!(coverage.global.total_courses, 2);
        assert_eq!(coverage.global.total_covered, 1);
        assert_eq!(coverage.per_period[0].uncovered, vec!["Redes".to_string()]);

        let teachers = summary.teachers.unwrap();
        let names: Vec<(&str, bool)> = teachers
            .iter()
            .map(|t| (t.name.as_str(), t.surveyed))
            .collect();
        assert_eq!(names, vec![("ANA", true), ("Luis", true), ("Marta", false)]);

        let periods: Vec<&str> = summary.by_period.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["P1", crate::ledger::UNCLASSIFIED_PERIOD]);
    }

    #[test]
    fn restricted_session_keeps_other_inputs() {
        let rows = vec![row("Ana", "Redes", "Nmap"), row("Luis", "Bases", "MySQL")];
        let s = Session::new(&rows).with_roster(Some(Roster::new(&["Ana".to_string()])));
        let filter = RowFilter {
            teacher: Some("Luis".to_string()),
            ..RowFilter::default()
        };
        let r = s.restrict(&filter);
        assert_eq!(r.rows().len(), 1);
        assert_eq!(r.roster(), s.roster());
        assert_eq!(s.rows().len(), 2);
    }
}
