// The JSON documents produced by labsurvey.
//
// Keys follow the names used by the dashboard and by the PDF layout, which
// consume these documents as they are.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use log::{debug, warn};
use serde_json::{json, Map as JSMap, Value as JSValue};
use snafu::prelude::*;

use crate::survey::*;

const NO_PROGRAM: &str = "No especificada";
const UNSPECIFIED: &str = "Sin especificar";
const NONE_M: &str = "Ninguno";
const NONE_F: &str = "Ninguna";
/// Appended to the courses that could not be found in the curriculum.
const UNRESOLVED_SUFFIX: &str = " (*)";

/// The sections of the full report.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ReportSections {
    pub summary: bool,
    pub software: bool,
    pub teachers: bool,
    pub coverage: bool,
    pub remarks: bool,
}

impl Default for ReportSections {
    fn default() -> Self {
        ReportSections {
            summary: true,
            software: true,
            teachers: true,
            coverage: true,
            remarks: true,
        }
    }
}

impl ReportSections {
    pub fn excluding(names: &[String]) -> SurveyResult<ReportSections> {
        let mut res = ReportSections::default();
        for name in names.iter() {
            match name.as_str() {
                "summary" => res.summary = false,
                "software" => res.software = false,
                "teachers" => res.teachers = false,
                "coverage" => res.coverage = false,
                "remarks" => res.remarks = false,
                x => whatever!(
                    "Unknown report section {:?} (summary, software, teachers, coverage or remarks)",
                    x
                ),
            }
        }
        Ok(res)
    }
}

pub struct ReportInput<'a> {
    pub session: &'a Session,
    pub summary: &'a Summary,
    pub sections: ReportSections,
    /// SHA-256 of the survey file.
    pub fingerprint: String,
    pub generated_at: NaiveDateTime,
}

pub fn build_report(input: &ReportInput) -> JSValue {
    let session = input.session;
    let summary = input.summary;
    let curriculum = session.curriculum();
    let coverage_percent = summary
        .coverage
        .as_ref()
        .map(|c| c.global.percent().round())
        .unwrap_or(0.0);

    let mut res = JSMap::new();
    res.insert(
        "metadatos".to_string(),
        json!({
            "fechaGeneracion": input.generated_at.format("%d/%m/%Y").to_string(),
            "horaGeneracion": input.generated_at.format("%H:%M:%S").to_string(),
            "tieneEncuestas": !session.is_empty(),
            "tieneListaDocentes": session.roster().map_or(false, |r| !r.is_empty()),
            "tienePlanEstudios": curriculum.is_some(),
            "totalEncuestas": summary.survey_count,
            "totalDocentes": session.roster().map_or(0, |r| r.len()),
            "totalPeriodos": curriculum.map_or(0, |c| c.periods.len()),
            "softwareUnico": summary.software.len(),
            "cobertura": coverage_percent,
            "huella": input.fingerprint,
        }),
    );

    if input.sections.summary {
        res.insert(
            "resumenGeneral".to_string(),
            json!({
                "totalEncuestas": summary.survey_count,
                "softwareUnico": summary.software.len(),
                "cobertura": coverage_percent,
                "carrera": curriculum
                    .map(|c| c.program.as_str())
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or(NO_PROGRAM),
            }),
        );
    }

    if input.sections.software && curriculum.is_some() {
        res.insert(
            "softwarePorPeriodos".to_string(),
            software_by_period_to_json(&summary.by_period),
        );
    }

    if input.sections.teachers {
        res.insert(
            "detalleDocentes".to_string(),
            teacher_details_to_json(session.rows()),
        );
    }

    if input.sections.coverage {
        if let Some(coverage) = summary.coverage.as_ref() {
            res.insert(
                "estadisticasCobertura".to_string(),
                coverage_statistics_to_json(coverage, session),
            );
        }
    }

    if input.sections.teachers {
        if let Some(teachers) = summary.teachers.as_ref() {
            res.insert(
                "seguimientoDocentes".to_string(),
                teachers_to_json(teachers),
            );
        }
    }

    if input.sections.remarks {
        res.insert(
            "recomendaciones".to_string(),
            remarks_to_json(&summary.remarks),
        );
    }

    debug!(
        "build_report: sections: {:?}",
        res.keys().collect::<Vec<_>>()
    );
    JSValue::Object(res)
}

/// period name -> course name -> software names, in alphabetical order.
fn software_by_period_to_json(by_period: &[PeriodSoftware]) -> JSValue {
    let mut periods = JSMap::new();
    for p in by_period.iter() {
        let mut courses = JSMap::new();
        for c in p.courses.iter() {
            let display = if c.unclassified {
                format!("{}{}", c.course, UNRESOLVED_SUFFIX)
            } else {
                c.course.clone()
            };
            let mut names: Vec<&str> = c.software.iter().map(|e| e.name.as_str()).collect();
            names.sort_by(|a, b| collate(a, b));
            courses.insert(display, json!(names));
        }
        let key = period_key(&periods, &p.period, p.period_id.as_deref());
        periods.insert(key, JSValue::Object(courses));
    }
    JSValue::Object(periods)
}

/// The key of a period in an object keyed by period name. Periods sharing a name
/// get their id appended.
fn period_key(existing: &JSMap<String, JSValue>, name: &str, period_id: Option<&str>) -> String {
    if !existing.contains_key(name) {
        return name.to_string();
    }
    let key = format!("{} [{}]", name, period_id.unwrap_or("-"));
    warn!(
        "Several periods are named {:?}: the period {:?} is reported as {:?}",
        name, period_id, key
    );
    key
}

fn or_default<'a>(field: &'a str, default: &'a str) -> &'a str {
    if field.trim().is_empty() {
        default
    } else {
        field
    }
}

fn teacher_details_to_json(rows: &[SurveyRow]) -> JSValue {
    let details: Vec<JSValue> = rows
        .iter()
        .map(|r| {
            json!({
                "nombre": or_default(&r.teacher, UNSPECIFIED),
                "asignatura": or_default(&r.course, UNSPECIFIED),
                "semestre": or_default(&r.semester, UNSPECIFIED),
                "softwareWindows": or_default(&r.software_windows, NONE_M),
                "softwareUbuntu": or_default(&r.software_linux, NONE_M),
                "softwareRecomendado": or_default(&r.software_recommended, NONE_M),
                "dispositivosAdicionales": or_default(&r.devices, NONE_M),
                "recomendaciones": or_default(&r.recommendations, NONE_F),
            })
        })
        .collect();
    JSValue::Array(details)
}

fn coverage_statistics_to_json(coverage: &CoverageReport, session: &Session) -> JSValue {
    let mut res = JSMap::new();
    for stat in coverage.per_period.iter() {
        let key = period_key(&res, &stat.period, Some(stat.period_id.as_str()));
        res.insert(
            key,
            json!({
                "totalAsignaturas": stat.total_courses,
                "asignaturasConEncuesta": stat.covered_courses,
                "cobertura": stat.percent(),
                "asignaturasSinEncuesta": stat.uncovered,
                "softwareDistinto": stat.distinct_software,
            }),
        );
    }

    let rows = session.rows();
    let surveyed: HashSet<String> = rows
        .iter()
        .map(|r| normalize(&r.teacher))
        .filter(|n| !n.is_empty())
        .collect();
    let roster_size = session.roster().map_or(0, |r| r.len());
    // Answers per expected teacher: above 100 when teachers answer for several courses.
    let teacher_coverage = if roster_size == 0 {
        0.0
    } else {
        rows.len() as f64 * 100.0 / roster_size as f64
    };
    res.insert(
        "resumenGeneral".to_string(),
        json!({
            "totalDocentes": roster_size,
            "docentesEncuestados": surveyed.len(),
            "coberturaDocentes": teacher_coverage,
        }),
    );
    JSValue::Object(res)
}

fn remarks_to_json(remarks: &Remarks) -> JSValue {
    let recommendations: Vec<JSValue> = remarks
        .recommendations
        .iter()
        .map(|r| json!({"docente": r.teacher, "asignatura": r.course, "recomendacion": r.text}))
        .collect();
    let devices: Vec<JSValue> = remarks
        .devices
        .iter()
        .map(|r| json!({"docente": r.teacher, "asignatura": r.course, "dispositivos": r.text}))
        .collect();
    json!({
        "recomendacionesGenerales": recommendations,
        "dispositivosAdicionales": devices,
    })
}

// ******** Single views *********

fn software_entry_to_json(e: &SoftwareEntry) -> JSValue {
    json!({
        "nombre": e.name,
        "windowsCount": e.windows_count,
        "ubuntuCount": e.linux_count,
        "recomendadoCount": e.recommended_count,
        "total": e.total(),
    })
}

pub fn software_to_json(entries: &[SoftwareEntry]) -> JSValue {
    JSValue::Array(entries.iter().map(software_entry_to_json).collect())
}

pub fn periods_to_json(by_period: &[PeriodSoftware]) -> JSValue {
    let periods: Vec<JSValue> = by_period
        .iter()
        .map(|p| {
            let courses: Vec<JSValue> = p
                .courses
                .iter()
                .map(|c| {
                    json!({
                        "asignatura": c.course,
                        "sinClasificar": c.unclassified,
                        "encuestas": c.survey_count,
                        "software": software_to_json(&c.software),
                    })
                })
                .collect();
            json!({
                "periodoId": p.period_id,
                "periodo": p.period,
                "asignaturas": courses,
            })
        })
        .collect();
    JSValue::Array(periods)
}

pub fn coverage_to_json(coverage: &CoverageReport) -> JSValue {
    let periods: Vec<JSValue> = coverage
        .per_period
        .iter()
        .map(|s| {
            json!({
                "periodoId": s.period_id,
                "periodo": s.period,
                "totalAsignaturas": s.total_courses,
                "asignaturasConEncuesta": s.covered_courses,
                "porcentaje": s.percent(),
                "asignaturasSinEncuesta": s.uncovered,
                "softwareDistinto": s.distinct_software,
            })
        })
        .collect();
    json!({
        "periodos": periods,
        "global": {
            "totalAsignaturas": coverage.global.total_courses,
            "asignaturasConEncuesta": coverage.global.total_covered,
            "porcentaje": coverage.global.percent(),
        },
    })
}

pub fn teachers_to_json(teachers: &[TeacherStatus]) -> JSValue {
    let res: Vec<JSValue> = teachers
        .iter()
        .map(|t| {
            json!({
                "nombre": t.name,
                "encuestado": t.surveyed,
                "asignaturas": t.courses,
                "enLista": t.in_roster,
            })
        })
        .collect();
    JSValue::Array(res)
}

pub fn rows_to_json(rows: &[SurveyRow]) -> JSValue {
    let res: Vec<JSValue> = rows
        .iter()
        .map(|r| {
            json!({
                "hora_inicio": r.started_at,
                "hora_fin": r.finished_at,
                "nombre_docente": r.teacher,
                "asignatura": r.course,
                "semestre": r.semester,
                "software_windows": r.software_windows,
                "software_ubuntu": r.software_linux,
                "software_recomendado": r.software_recommended,
                "dispositivos_adicionales": r.devices,
                "recomendaciones": r.recommendations,
            })
        })
        .collect();
    JSValue::Array(res)
}

pub fn facets_to_json(facets: &Facets) -> JSValue {
    json!({
        "semestres": facets.semesters,
        "asignaturas": facets.courses,
        "docentes": facets.teachers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(teacher: &str, course: &str, windows: &str, linux: &str) -> SurveyRow {
        SurveyRow {
            teacher: teacher.to_string(),
            course: course.to_string(),
            semester: "SEMESTRE I".to_string(),
            software_windows: windows.to_string(),
            software_linux: linux.to_string(),
            ..SurveyRow::default()
        }
    }

    fn curriculum() -> Curriculum {
        let period = |id: &str, name: &str, courses: &[&str]| Period {
            id: id.to_string(),
            name: name.to_string(),
            slots: courses
                .iter()
                .map(|c| CourseSlot::Direct(Course::named(c)))
                .collect(),
            total_credits: 0,
        };
        Curriculum {
            program: "Ingeniería de Sistemas".to_string(),
            plan_id: "PE-2023".to_string(),
            structure: ProgramStructure::default(),
            periods: vec![
                period("1", "PERIODO DE FORMACIÓN 1", &["Álgebra", "Redes"]),
                period("2", "PERIODO DE FORMACIÓN 2", &["Bases de Datos"]),
            ],
        }
    }

    fn build(session: &Session, sections: ReportSections) -> JSValue {
        let summary = session.summarize(SortDirection::Descending).unwrap();
        build_report(&ReportInput {
            session,
            summary: &summary,
            sections,
            fingerprint: "abc".to_string(),
            generated_at: NaiveDate::from_ymd_opt(2026, 3, 8)
                .unwrap()
                .and_hms_opt(9, 5, 7)
                .unwrap(),
        })
    }

    #[test]
    fn sections_to_exclude() {
        let s = ReportSections::excluding(&["software".to_string(), "remarks".to_string()])
            .unwrap();
        assert!(s.summary && s.teachers && s.coverage);
        assert!(!s.software && !s.remarks);
        assert!(ReportSections::excluding(&["charts".to_string()]).is_err());
    }

    #[test]
    fn report_without_curriculum_or_roster() {
        let rows = vec![
            row("Ana", "Redes", "Wireshark, Packet Tracer", ""),
            row("", "", "Ninguno", ""),
        ];
        let session = Session::new(&rows);
        let js = build(&session, ReportSections::default());

        assert_eq!(js["metadatos"]["fechaGeneracion"], json!("08/03/2026"));
        assert_eq!(js["metadatos"]["horaGeneracion"], json!("09:05:07"));
        assert_eq!(js["metadatos"]["huella"], json!("abc"));
        assert_eq!(js["resumenGeneral"]["carrera"], json!(NO_PROGRAM));
        assert_eq!(js["resumenGeneral"]["softwareUnico"], json!(2));
        assert_eq!(js["resumenGeneral"]["cobertura"], json!(0.0));
        assert!(js.get("softwarePorPeriodos").is_none());
        assert!(js.get("estadisticasCobertura").is_none());
        assert!(js.get("seguimientoDocentes").is_none());

        let details = js["detalleDocentes"].as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[1]["nombre"], json!(UNSPECIFIED));
        assert_eq!(details[1]["softwareUbuntu"], json!(NONE_M));
        assert_eq!(details[1]["recomendaciones"], json!(NONE_F));
    }

    #[test]
    fn full_report() {
        let mut with_remark = row("ANA LOPEZ", "algebra", "Octave, excel", "");
        with_remark.recommendations = "Más RAM".to_string();
        let rows = vec![
            with_remark,
            row("Ana López", "Redes", "Wireshark", "nmap"),
            row("Luis", "Seminario", "Word", ""),
        ];
        let session = Session::new(&rows)
            .with_curriculum(Some(curriculum()))
            .with_roster(Some(Roster::new(&[
                "Ana López".to_string(),
                "Marta".to_string(),
            ])));
        let js = build(&session, ReportSections::default());

        assert_eq!(js["resumenGeneral"]["carrera"], json!("Ingeniería de Sistemas"));
        // 2 of the 3 courses.
        assert_eq!(js["resumenGeneral"]["cobertura"], json!(67.0));

        let by_period = js["softwarePorPeriodos"].as_object().unwrap();
        let periods: Vec<&str> = by_period.keys().map(|k| k.as_str()).collect();
        assert_eq!(periods, vec!["PERIODO DE FORMACIÓN 1", UNCLASSIFIED_PERIOD]);
        assert_eq!(
            by_period["PERIODO DE FORMACIÓN 1"]["Álgebra"],
            json!(["excel", "Octave"])
        );
        assert_eq!(
            by_period[UNCLASSIFIED_PERIOD]["Seminario (*)"],
            json!(["Word"])
        );

        let stats = &js["estadisticasCobertura"];
        assert_eq!(stats["PERIODO DE FORMACIÓN 1"]["cobertura"], json!(100.0));
        assert_eq!(stats["PERIODO DE FORMACIÓN 2"]["asignaturasConEncuesta"], json!(0));
        assert_eq!(stats["resumenGeneral"]["totalDocentes"], json!(2));
        assert_eq!(stats["resumenGeneral"]["docentesEncuestados"], json!(2));
        // 3 answers for 2 expected teachers.
        assert_eq!(stats["resumenGeneral"]["coberturaDocentes"], json!(150.0));

        let follow_up = js["seguimientoDocentes"].as_array().unwrap();
        let names: Vec<&str> = follow_up
            .iter()
            .map(|t| t["nombre"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ana López", "Luis", "Marta"]);
        assert_eq!(follow_up[1]["enLista"], json!(false));
        assert_eq!(follow_up[2]["encuestado"], json!(false));

        let remarks = &js["recomendaciones"];
        assert_eq!(
            remarks["recomendacionesGenerales"],
            json!([{"docente": "ANA LOPEZ", "asignatura": "algebra", "recomendacion": "Más RAM"}])
        );
        assert_eq!(remarks["dispositivosAdicionales"], json!([]));
    }

    #[test]
    fn excluded_sections_are_left_out() {
        let rows = vec![row("Ana", "Redes", "Wireshark", "")];
        let session = Session::new(&rows).with_curriculum(Some(curriculum()));
        let sections = ReportSections {
            summary: false,
            software: false,
            teachers: false,
            coverage: true,
            remarks: false,
        };
        let js = build(&session, sections);
        let keys: Vec<&str> = js.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["metadatos", "estadisticasCobertura"]);
        assert_eq!(
            js["estadisticasCobertura"]["resumenGeneral"]["coberturaDocentes"],
            json!(0.0)
        );
    }

    #[test]
    fn periods_sharing_a_name() {
        let mut c = curriculum();
        c.periods[1].name = c.periods[0].name.clone();
        let rows = vec![
            row("Ana", "Redes", "Wireshark", ""),
            row("Luis", "Bases de Datos", "MySQL", ""),
        ];
        let session = Session::new(&rows).with_curriculum(Some(c));
        let js = build(&session, ReportSections::default());

        let by_period = js["softwarePorPeriodos"].as_object().unwrap();
        let keys: Vec<&str> = by_period.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["PERIODO DE FORMACIÓN 1", "PERIODO DE FORMACIÓN 1 [2]"]
        );
        assert_eq!(
            by_period["PERIODO DE FORMACIÓN 1 [2]"]["Bases de Datos"],
            json!(["MySQL"])
        );

        let stats = &js["estadisticasCobertura"];
        assert_eq!(stats["PERIODO DE FORMACIÓN 1"]["totalAsignaturas"], json!(2));
        assert_eq!(stats["PERIODO DE FORMACIÓN 1 [2]"]["totalAsignaturas"], json!(1));
    }

    #[test]
    fn single_views() {
        let mut e = SoftwareEntry::new("Octave");
        e.windows_count = 2;
        e.linux_count = 1;
        assert_eq!(
            software_to_json(&[e]),
            json!([{"nombre": "Octave", "windowsCount": 2, "ubuntuCount": 1, "recomendadoCount": 0, "total": 3}])
        );

        let facets = Facets {
            semesters: vec!["SEMESTRE I".to_string()],
            courses: vec!["Redes".to_string()],
            teachers: vec![],
        };
        assert_eq!(
            facets_to_json(&facets),
            json!({"semestres": ["SEMESTRE I"], "asignaturas": ["Redes"], "docentes": []})
        );
    }
}
