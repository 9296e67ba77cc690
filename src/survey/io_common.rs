// Column mapping shared by the CSV and Excel readers.

use log::{debug, warn};
use survey_core::SurveyRow;

pub const HEADER_STARTED_AT: &str = "Hora de inicio";
pub const HEADER_FINISHED_AT: &str = "Hora de finalización";
pub const HEADER_TEACHER: &str = "Nombre del docente";
pub const HEADER_COURSE: &str = "Asignatura(s) que imparte";
pub const HEADER_SEMESTER: &str = "Semestre";
pub const HEADER_WINDOWS: &str = "¿Qué software utiliza en windows para su asignatura?";
pub const HEADER_LINUX: &str = "¿Qué software utiliza en ubuntu para su asignatura?";
pub const HEADER_RECOMMENDED: &str =
    "¿Qué software adicional recomendaría incorporar para la asignatura(s)?";
pub const HEADER_DEVICES: &str =
    "¿Requiere algún dispositivos y/o elementos además de los computadores (IoT, redes...)";
pub const HEADER_RECOMMENDATIONS: &str = "¿Tiene alguna recomendación o sugerencia adicional respecto a los equipos de cómputo con los que cuentan actualmente los laboratorios?";

const ALL_HEADERS: [&str; 10] = [
    HEADER_STARTED_AT,
    HEADER_FINISHED_AT,
    HEADER_TEACHER,
    HEADER_COURSE,
    HEADER_SEMESTER,
    HEADER_WINDOWS,
    HEADER_LINUX,
    HEADER_RECOMMENDED,
    HEADER_DEVICES,
    HEADER_RECOMMENDATIONS,
];

/// Position of each known field in a header row. Unknown columns are ignored.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ColumnMap {
    // Same order as ALL_HEADERS.
    positions: [Option<usize>; 10],
}

impl ColumnMap {
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> ColumnMap {
        let cells: Vec<&str> = header
            .iter()
            .map(|c| c.as_ref().trim_start_matches('\u{feff}').trim())
            .collect();
        let mut positions = [None; 10];
        for (pos, name) in positions.iter_mut().zip(ALL_HEADERS.iter()) {
            *pos = cells.iter().position(|c| c == name);
        }
        let res = ColumnMap { positions };
        debug!("ColumnMap::from_header: {:?}", res);
        for name in res.missing() {
            warn!("The survey has no column {:?}: the field is left empty", name);
        }
        res
    }

    /// The known headers absent from the file.
    pub fn missing(&self) -> Vec<&'static str> {
        self.positions
            .iter()
            .zip(ALL_HEADERS.iter())
            .filter(|(p, _)| p.is_none())
            .map(|(_, name)| *name)
            .collect()
    }

    /// Builds a survey row from the cells of a line. Missing cells are empty.
    /// Returns None for a line without any value in the known columns.
    pub fn build_row<S: AsRef<str>>(&self, cells: &[S]) -> Option<SurveyRow> {
        let get = |i: usize| -> String {
            self.positions[i]
                .and_then(|p| cells.get(p))
                .map(|c| c.as_ref().to_string())
                .unwrap_or_default()
        };
        let row = SurveyRow {
            started_at: get(0),
            finished_at: get(1),
            teacher: get(2),
            course: get(3),
            semester: get(4),
            software_windows: get(5),
            software_linux: get(6),
            software_recommended: get(7),
            devices: get(8),
            recommendations: get(9),
        };
        let fields = [
            &row.started_at,
            &row.finished_at,
            &row.teacher,
            &row.course,
            &row.semester,
            &row.software_windows,
            &row.software_linux,
            &row.software_recommended,
            &row.devices,
            &row.recommendations,
        ];
        if fields.iter().all(|f| f.trim().is_empty()) {
            None
        } else {
            Some(row)
        }
    }
}
