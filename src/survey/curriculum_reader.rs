use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JSMap, Value as JSValue};
use snafu::prelude::*;

use crate::survey::*;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumJson {
    #[serde(rename = "carrera")]
    pub program: Option<String>,
    #[serde(rename = "plan_estudios")]
    pub plan_id: Option<String>,
    #[serde(rename = "estructura")]
    pub structure: Option<StructureJson>,
    // Kept as raw values: serde_json preserves the order of the keys, which is
    // the order of the periods.
    #[serde(rename = "periodos")]
    pub periods: JSMap<String, JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StructureJson {
    #[serde(rename = "tecnologia")]
    pub technology: Option<String>,
    #[serde(rename = "componente_propedeutico")]
    pub propaedeutic: Option<String>,
    #[serde(rename = "ingenieria")]
    pub engineering: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PeriodJson {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "asignaturas", default)]
    pub courses: Vec<CourseJson>,
    #[serde(rename = "total_creditos")]
    pub total_credits: Option<JSValue>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CourseJson {
    #[serde(rename = "codigo")]
    pub code: Option<String>,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "creditos")]
    pub credits: Option<JSValue>,
    pub htd: Option<JSValue>,
    pub htc: Option<JSValue>,
    pub hta: Option<JSValue>,
    #[serde(rename = "clasificacion")]
    pub classification: Option<String>,
    #[serde(rename = "es_electiva")]
    pub is_elective: Option<bool>,
    #[serde(rename = "grupo_electiva")]
    pub elective_group: Option<String>,
    #[serde(rename = "opciones")]
    pub options: Option<Vec<CourseJson>>,
}

impl CourseJson {
    fn to_course(&self) -> Course {
        Course {
            code: self.code.clone().unwrap_or_default(),
            name: self.name.clone(),
            credits: read_js_int(&self.credits),
            hours: CourseHours {
                direct: read_js_int(&self.htd),
                cooperative: read_js_int(&self.htc),
                autonomous: read_js_int(&self.hta),
            },
            classification: self.classification.clone().unwrap_or_default(),
        }
    }

    fn to_slot(&self) -> CourseSlot {
        match (self.is_elective, &self.options) {
            (Some(true), Some(options)) => CourseSlot::Elective {
                slot: self.to_course(),
                group: self.elective_group.clone(),
                options: options.iter().map(|o| o.to_course()).collect(),
            },
            _ => CourseSlot::Direct(self.to_course()),
        }
    }
}

pub fn parse_curriculum(content: &str) -> SurveyResult<Curriculum> {
    let cj: CurriculumJson = serde_json::from_str(content).context(ParsingJsonSnafu {})?;
    debug!("parse_curriculum: {} periods", cj.periods.len());

    let mut periods: Vec<Period> = Vec::new();
    for (id, pjs) in cj.periods.iter() {
        let pj: PeriodJson = serde_json::from_value(pjs.clone()).context(ParsingJsonSnafu {})?;
        periods.push(Period {
            id: id.clone(),
            name: pj.name.clone().unwrap_or_else(|| id.clone()),
            slots: pj.courses.iter().map(|c| c.to_slot()).collect(),
            total_credits: read_js_int(&pj.total_credits),
        });
    }

    let structure = cj
        .structure
        .map(|s| ProgramStructure {
            technology: s.technology.unwrap_or_default(),
            propaedeutic: s.propaedeutic.unwrap_or_default(),
            engineering: s.engineering.unwrap_or_default(),
        })
        .unwrap_or_default();

    Ok(Curriculum {
        program: cj.program.unwrap_or_default(),
        plan_id: cj.plan_id.unwrap_or_default(),
        structure,
        periods,
    })
}

pub fn read_curriculum(path: &str) -> SurveyResult<Curriculum> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let curriculum = parse_curriculum(&contents)?;
    info!(
        "Read curriculum {:?} ({}) with {} periods from {:?}",
        curriculum.program,
        curriculum.plan_id,
        curriculum.periods.len(),
        path
    );
    Ok(curriculum)
}

// Credits and hours are written as numbers or as strings, depending on the
// tool that produced the file. Anything else counts as 0.
fn read_js_int(x: &Option<JSValue>) -> u32 {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|x| u32::try_from(x).ok())
            .unwrap_or(0),
        Some(JSValue::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static CURRICULUM: &str = r#"{
        "carrera": "Ingeniería de Sistemas",
        "plan_estudios": "PE-2023",
        "estructura": {
            "tecnologia": "Semestres I a VI",
            "componente_propedeutico": "Semestre VII",
            "ingenieria": "Semestres VIII a X"
        },
        "periodos": {
            "2": {
                "nombre": "Segundo semestre",
                "asignaturas": [
                    {"codigo": "S201", "nombre": "Redes", "creditos": "3", "htd": 2, "htc": 1, "hta": 6,
                     "clasificacion": "Disciplinar", "es_electiva": false}
                ],
                "total_creditos": 3
            },
            "1": {
                "nombre": "Primer semestre",
                "asignaturas": [
                    {"codigo": "S101", "nombre": "Álgebra", "creditos": 3, "clasificacion": "Básica"},
                    {"codigo": "E1", "nombre": "Electiva I", "creditos": 2, "es_electiva": true,
                     "grupo_electiva": "Humanidades",
                     "opciones": [
                        {"codigo": "H1", "nombre": "Ética", "creditos": 2},
                        {"codigo": "H2", "nombre": "Música", "creditos": "dos"}
                     ]},
                    {"codigo": "E2", "nombre": "Electiva II", "es_electiva": true}
                ],
                "total_creditos": "5"
            }
        }
    }"#;

    #[test]
    fn reads_curriculum_in_source_order() {
        let c = parse_curriculum(CURRICULUM).unwrap();
        assert_eq!(c.program, "Ingeniería de Sistemas");
        assert_eq!(c.plan_id, "PE-2023");
        assert_eq!(c.structure.propaedeutic, "Semestre VII");
        let ids: Vec<&str> = c.periods.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);

        let redes = &c.periods[0].slots[0];
        match redes {
            CourseSlot::Direct(course) => {
                assert_eq!(course.credits, 3);
                assert_eq!(course.hours.autonomous, 6);
            }
            other => panic!("unexpected slot {:?}", other),
        }
        assert_eq!(c.periods[1].total_credits, 5);
    }

    #[test]
    fn electives_need_options() {
        let c = parse_curriculum(CURRICULUM).unwrap();
        let first = &c.periods[1];
        match &first.slots[1] {
            CourseSlot::Elective {
                slot,
                group,
                options,
            } => {
                assert_eq!(slot.name, "Electiva I");
                assert_eq!(group.as_deref(), Some("Humanidades"));
                assert_eq!(options.len(), 2);
                assert_eq!(options[1].credits, 0);
            }
            other => panic!("unexpected slot {:?}", other),
        }
        // Flagged as elective but without options: a plain course.
        assert!(matches!(&first.slots[2], CourseSlot::Direct(c) if c.name == "Electiva II"));
        let names: Vec<&str> = first.concrete_courses().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Álgebra", "Ética", "Música", "Electiva II"]);
    }

    #[test]
    fn lenient_numbers() {
        let n = |js: JSValue| read_js_int(&Some(js));
        assert_eq!(n(json!(4)), 4);
        assert_eq!(n(json!(3.0)), 3);
        assert_eq!(n(json!(" 12 ")), 12);
        assert_eq!(n(json!(-2)), 0);
        assert_eq!(n(json!(5_000_000_000u64)), 0);
        assert_eq!(n(json!(1e20)), 0);
        assert_eq!(n(json!("5000000000")), 0);
        assert_eq!(n(json!(null)), 0);
        assert_eq!(read_js_int(&None), 0);
    }

    #[test]
    fn malformed_curriculum() {
        assert!(parse_curriculum("{\"carrera\": \"x\"").is_err());
        assert!(parse_curriculum("{\"carrera\": \"x\"}").is_err());
        assert!(parse_curriculum(r#"{"periodos": {"1": {"asignaturas": 3}}}"#).is_err());
        let c = parse_curriculum(r#"{"periodos": {}}"#).unwrap();
        assert!(c.periods.is_empty());
        assert_eq!(c.program, "");
    }
}
