// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One answer of the laboratory survey: one teacher, one course.
///
/// All the fields are kept as the raw text found in the survey export. They are
/// only interpreted by the aggregation functions.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SurveyRow {
    pub started_at: String,
    pub finished_at: String,
    pub teacher: String,
    pub course: String,
    /// Free text, not reconciled with the curriculum.
    pub semester: String,
    /// Comma-separated list, or a no-data marker ("Ninguno", "Ninguna").
    pub software_windows: String,
    pub software_linux: String,
    pub software_recommended: String,
    pub devices: String,
    pub recommendations: String,
}

impl SurveyRow {
    /// The software field corresponding to a platform.
    pub fn software_field(&self, platform: Platform) -> &str {
        match platform {
            Platform::Windows => &self.software_windows,
            Platform::Linux => &self.software_linux,
            Platform::Recommended => &self.software_recommended,
        }
    }
}

/// The platforms for which the survey asks about software.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Platform {
    Windows,
    Linux,
    /// Software the teacher recommends adding to the laboratories.
    Recommended,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Linux, Platform::Recommended];
}

/// Credit and hour attributes of a course. Not used by the aggregation.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct CourseHours {
    pub direct: u32,
    pub cooperative: u32,
    pub autonomous: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub hours: CourseHours,
    pub classification: String,
}

impl Course {
    pub fn named(name: &str) -> Course {
        Course {
            name: name.to_string(),
            ..Course::default()
        }
    }
}

/// A position in the curriculum.
///
/// An elective slot is satisfied by any one of its options. Only the options are
/// concrete courses: the slot itself is never matched against survey answers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CourseSlot {
    Direct(Course),
    Elective {
        slot: Course,
        group: Option<String>,
        options: Vec<Course>,
    },
}

impl CourseSlot {
    /// The courses a survey answer can name for this slot.
    pub fn concrete_courses(&self) -> &[Course] {
        match self {
            CourseSlot::Direct(course) => std::slice::from_ref(course),
            CourseSlot::Elective { options, .. } => options.as_slice(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Period {
    pub id: String,
    pub name: String,
    pub slots: Vec<CourseSlot>,
    pub total_credits: u32,
}

impl Period {
    /// All the concrete courses of the period, electives expanded, in curriculum order.
    pub fn concrete_courses(&self) -> impl Iterator<Item = &Course> {
        self.slots.iter().flat_map(|s| s.concrete_courses().iter())
    }
}

/// The three labels describing the program cycles. Informative only.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ProgramStructure {
    pub technology: String,
    pub propaedeutic: String,
    pub engineering: String,
}

/// A study plan. Periods are kept in the order of the source document.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Curriculum {
    pub program: String,
    pub plan_id: String,
    pub structure: ProgramStructure,
    pub periods: Vec<Period>,
}

/// The list of teachers expected to answer the survey.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Roster {
    pub names: Vec<String>,
}

impl Roster {
    pub fn new(names: &[String]) -> Roster {
        Roster {
            names: names.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ******** Output data structures *********

/// Mentions of one piece of software, by platform.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SoftwareEntry {
    /// Display name, as first seen in the survey.
    pub name: String,
    pub windows_count: u64,
    pub linux_count: u64,
    pub recommended_count: u64,
}

impl SoftwareEntry {
    pub fn new(name: &str) -> SoftwareEntry {
        SoftwareEntry {
            name: name.to_string(),
            windows_count: 0,
            linux_count: 0,
            recommended_count: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.windows_count + self.linux_count + self.recommended_count
    }

    pub fn count(&self, platform: Platform) -> u64 {
        match platform {
            Platform::Windows => self.windows_count,
            Platform::Linux => self.linux_count,
            Platform::Recommended => self.recommended_count,
        }
    }

    pub(crate) fn count_mut(&mut self, platform: Platform) -> &mut u64 {
        match platform {
            Platform::Windows => &mut self.windows_count,
            Platform::Linux => &mut self.linux_count,
            Platform::Recommended => &mut self.recommended_count,
        }
    }

    pub(crate) fn absorb(&mut self, other: &SoftwareEntry) {
        self.windows_count += other.windows_count;
        self.linux_count += other.linux_count;
        self.recommended_count += other.recommended_count;
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Software mentioned for one course, merged across all the answers for that course.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CourseSoftware {
    /// Canonical curriculum name, or the raw survey text when it could not be resolved.
    pub course: String,
    pub unclassified: bool,
    pub survey_count: usize,
    pub software: Vec<SoftwareEntry>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PeriodSoftware {
    /// None for the synthetic bucket of unclassified courses.
    pub period_id: Option<String>,
    pub period: String,
    pub courses: Vec<CourseSoftware>,
}

/// Coverage of one curriculum period.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CoverageStat {
    pub period_id: String,
    pub period: String,
    pub total_courses: usize,
    pub covered_courses: usize,
    pub uncovered: Vec<String>,
    /// Number of distinct software items mentioned for the courses of the period.
    pub distinct_software: usize,
}

impl CoverageStat {
    /// Covered fraction in [0, 1]. A period without courses has no coverage.
    pub fn ratio(&self) -> f64 {
        ratio(self.covered_courses, self.total_courses)
    }

    pub fn percent(&self) -> f64 {
        percent(self.covered_courses, self.total_courses)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct GlobalCoverage {
    pub total_courses: usize,
    pub total_covered: usize,
}

impl GlobalCoverage {
    pub fn ratio(&self) -> f64 {
        ratio(self.total_covered, self.total_courses)
    }

    pub fn percent(&self) -> f64 {
        percent(self.total_covered, self.total_courses)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CoverageReport {
    pub per_period: Vec<CoverageStat>,
    pub global: GlobalCoverage,
}

/// Follow-up status of one teacher.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TeacherStatus {
    pub name: String,
    pub surveyed: bool,
    /// Courses declared in the survey, without duplicates.
    pub courses: Vec<String>,
    /// False for teachers who answered the survey but are missing from the roster.
    pub in_roster: bool,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum StatusFilter {
    All,
    Surveyed,
    Pending,
}

/// Errors that prevent a summary from being produced.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SummaryErrors {
    /// No survey answer could be read. Summaries and exports are blocked.
    EmptyDataset,
}

impl Error for SummaryErrors {}

impl Display for SummaryErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryErrors::EmptyDataset => write!(f, "the survey does not contain any answer"),
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn percent(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        (num as f64 * 100.0) / den as f64
    }
}
