use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::model::*;
use crate::normalize::{collate, normalize};

struct Surveyed {
    // First spelling found in the survey.
    name: String,
    courses: Vec<String>,
}

/// Matches the roster against the teachers who answered the survey.
///
/// Every roster entry is reported, surveyed or pending. Teachers who answered but
/// are missing from the roster are appended as surveyed, under the first spelling
/// found in the survey. Names are compared in normalized form. The result is
/// sorted alphabetically.
pub fn reconcile(roster: &Roster, rows: &[SurveyRow]) -> Vec<TeacherStatus> {
    let mut surveyed: HashMap<String, Surveyed> = HashMap::new();
    // Keeps the appended teachers in a deterministic order before the final sort.
    let mut first_seen: Vec<String> = Vec::new();
    for row in rows {
        let key = normalize(&row.teacher);
        if key.is_empty() {
            continue;
        }
        let entry = surveyed.entry(key.clone()).or_insert_with(|| {
            first_seen.push(key);
            Surveyed {
                name: row.teacher.trim().to_string(),
                courses: Vec::new(),
            }
        });
        let course = row.course.trim();
        if !course.is_empty() && !entry.courses.iter().any(|c| c == course) {
            entry.courses.push(course.to_string());
        }
    }
    debug!("reconcile: {} distinct teachers in the survey", surveyed.len());

    let mut res: Vec<TeacherStatus> = Vec::new();
    let mut roster_keys: HashSet<String> = HashSet::new();
    for name in roster.names.iter() {
        let key = normalize(name);
        let found = surveyed.get(&key);
        res.push(TeacherStatus {
            name: name.clone(),
            surveyed: found.is_some(),
            courses: found.map(|s| s.courses.clone()).unwrap_or_default(),
            in_roster: true,
        });
        roster_keys.insert(key);
    }

    for key in first_seen.iter() {
        if roster_keys.contains(key) {
            continue;
        }
        if let Some(s) = surveyed.get(key) {
            debug!("reconcile: {:?} answered but is not in the roster", s.name);
            res.push(TeacherStatus {
                name: s.name.clone(),
                surveyed: true,
                courses: s.courses.clone(),
                in_roster: false,
            });
        }
    }

    res.sort_by(|a, b| collate(&a.name, &b.name));
    info!(
        "reconcile: {} teachers, {} surveyed, {} pending",
        res.len(),
        res.iter().filter(|t| t.surveyed).count(),
        res.iter().filter(|t| !t.surveyed).count()
    );
    res
}

/// Selects teachers by status and by a search term. The term matches any part of
/// the name, ignoring case and accents. A blank term matches everything.
pub fn filter(list: &[TeacherStatus], status: StatusFilter, search: &str) -> Vec<TeacherStatus> {
    let term = normalize(search);
    list.iter()
        .filter(|t| match status {
            StatusFilter::All => true,
            StatusFilter::Surveyed => t.surveyed,
            StatusFilter::Pending => !t.surveyed,
        })
        .filter(|t| term.is_empty() || normalize(&t.name).contains(&term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(teacher: &str, course: &str) -> SurveyRow {
        SurveyRow {
            teacher: teacher.to_string(),
            course: course.to_string(),
            ..SurveyRow::default()
        }
    }

    fn roster(names: &[&str]) -> Roster {
        Roster {
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn marks_surveyed_pending_and_extra_teachers() {
        let r = roster(&["ANA LOPEZ", "LUIS PEREZ"]);
        let rows = vec![row("ana lopez", "Redes"), row("CARLOS RUIZ", "Algebra")];
        let res = reconcile(&r, &rows);
        assert_eq!(res.len(), 3);
        assert_eq!(
            res[0],
            TeacherStatus {
                name: "ANA LOPEZ".to_string(),
                surveyed: true,
                courses: vec!["Redes".to_string()],
                in_roster: true,
            }
        );
        assert_eq!(res[1].name, "CARLOS RUIZ");
        assert!(res[1].surveyed);
        assert!(!res[1].in_roster);
        assert_eq!(res[1].courses, vec!["Algebra".to_string()]);
        assert_eq!(res[2].name, "LUIS PEREZ");
        assert!(!res[2].surveyed);
        assert!(res[2].courses.is_empty());
    }

    #[test]
    fn accents_and_duplicates() {
        let r = roster(&["José Núñez"]);
        let rows = vec![
            row("JOSE NUNEZ", "Redes"),
            row("jose nuñez", "redes"),
            row("José Núñez", "Redes"),
            row("José  Núñez", "Bases de Datos"),
            row("", "Tesis"),
        ];
        let res = reconcile(&r, &rows);
        assert_eq!(res.len(), 1);
        assert!(res[0].surveyed);
        assert_eq!(
            res[0].courses,
            vec!["Redes".to_string(), "redes".to_string(), "Bases de Datos".to_string()]
        );
    }

    #[test]
    fn extra_teacher_keeps_first_spelling() {
        let rows = vec![row("maria gomez", "Redes"), row("MARÍA GÓMEZ", "Redes")];
        let res = reconcile(&Roster::default(), &rows);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].name, "maria gomez");
        assert_eq!(res[0].courses, vec!["Redes".to_string()]);
    }

    #[test]
    fn filter_by_status_and_search() {
        let r = roster(&["Ana López", "Luis Pérez", "Analía Ruiz"]);
        let rows = vec![row("ANA LOPEZ", "Redes"), row("Analia Ruiz", "Bases")];
        let res = reconcile(&r, &rows);

        let pending = filter(&res, StatusFilter::Pending, "");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Luis Pérez");

        let ana = filter(&res, StatusFilter::All, "  ANA ");
        let names: Vec<&str> = ana.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Ana López", "Analía Ruiz"]);

        assert_eq!(filter(&res, StatusFilter::Surveyed, "perez").len(), 0);
        assert_eq!(filter(&res, StatusFilter::All, "pérez").len(), 1);
        assert_eq!(filter(&res, StatusFilter::Surveyed, "").len(), 2);
    }
}
