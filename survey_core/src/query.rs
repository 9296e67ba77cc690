// Queries over the raw survey table: filters, filter options and free-text remarks.

use std::collections::HashSet;

use crate::model::*;
use crate::normalize::is_no_data_marker;

/// Known semester labels, in display order. Other labels come after them.
pub const SEMESTER_ORDER: [&str; 8] = [
    "SEMESTRE I",
    "SEMESTRE II",
    "SEMESTRE III",
    "SEMESTRE IV",
    "SEMESTRE V",
    "SEMESTRE VI",
    "COMPONENTE PROPEDEUTICO",
    "OTRO",
];

/// Exact-match filters on the survey table. Unset fields do not filter.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RowFilter {
    pub semester: Option<String>,
    pub course: Option<String>,
    pub teacher: Option<String>,
}

impl RowFilter {
    pub fn matches(&self, row: &SurveyRow) -> bool {
        fn check(expected: &Option<String>, value: &str) -> bool {
            match expected.as_deref() {
                None | Some("") => true,
                Some(e) => e == value,
            }
        }
        check(&self.semester, &row.semester)
            && check(&self.course, &row.course)
            && check(&self.teacher, &row.teacher)
    }

    pub fn is_empty(&self) -> bool {
        [&self.semester, &self.course, &self.teacher]
            .iter()
            .all(|f| f.as_deref().unwrap_or("").is_empty())
    }
}

pub fn filter_rows(rows: &[SurveyRow], filter: &RowFilter) -> Vec<SurveyRow> {
    rows.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// The values offered by the survey table filters.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Facets {
    pub semesters: Vec<String>,
    pub courses: Vec<String>,
    pub teachers: Vec<String>,
}

/// Distinct filter values.
///
/// Semesters are always taken from the whole table. Courses are narrowed by the
/// selected semester, and teachers by the selected semester and course.
pub fn facets(rows: &[SurveyRow], semester: Option<&str>, course: Option<&str>) -> Facets {
    let semester = semester.filter(|s| !s.is_empty());
    let course = course.filter(|s| !s.is_empty());
    let in_semester = |r: &&SurveyRow| semester.map_or(true, |s| r.semester == s);
    let in_course = |r: &&SurveyRow| course.map_or(true, |c| r.course == c);

    let semesters = order_semesters(&distinct(rows.iter().map(|r| r.semester.as_str())));
    let courses = distinct(rows.iter().filter(in_semester).map(|r| r.course.as_str()));
    let teachers = distinct(
        rows.iter()
            .filter(in_semester)
            .filter(in_course)
            .map(|r| r.teacher.as_str()),
    );
    Facets {
        semesters,
        courses,
        teachers,
    }
}

/// Puts the known semester labels first, in their natural order. Unknown labels
/// follow in their original order.
pub fn order_semesters(semesters: &[String]) -> Vec<String> {
    let mut res: Vec<String> = SEMESTER_ORDER
        .iter()
        .filter(|s| semesters.iter().any(|x| x.as_str() == **s))
        .map(|s| s.to_string())
        .collect();
    res.extend(
        semesters
            .iter()
            .filter(|s| !SEMESTER_ORDER.iter().any(|k| *k == s.as_str()))
            .cloned(),
    );
    res
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(|v| v.to_string())
        .collect()
}

/// A free-text remark left in the survey.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Remark {
    pub teacher: String,
    pub course: String,
    pub text: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Remarks {
    pub recommendations: Vec<Remark>,
    pub devices: Vec<Remark>,
}

/// Collects the recommendations and the requests for additional devices, skipping
/// the blank and "none" answers.
pub fn remarks(rows: &[SurveyRow]) -> Remarks {
    let collect = |field: fn(&SurveyRow) -> &str| -> Vec<Remark> {
        rows.iter()
            .filter(|r| !is_no_data_marker(field(r)))
            .map(|r| Remark {
                teacher: r.teacher.clone(),
                course: r.course.clone(),
                text: field(r).trim().to_string(),
            })
            .collect()
    };
    Remarks {
        recommendations: collect(|r| r.recommendations.as_str()),
        devices: collect(|r| r.devices.as_str()),
    }
}
