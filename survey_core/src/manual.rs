/*!

This is the long-form manual for `survey_core` and `labsurvey`.

## Input files

Three files can be loaded. Only the survey is required.

### Survey (`csv` or `xlsx`)

One answer per row, with a header row. CSV files use `;` as delimiter. The
columns are found by their exact header:

| Header | Field |
|---|---|
| `Hora de inicio` | `started_at` |
| `Hora de finalización` | `finished_at` |
| `Nombre del docente` | `teacher` |
| `Asignatura(s) que imparte` | `course` |
| `Semestre` | `semester` |
| `¿Qué software utiliza en windows para su asignatura?` | `software_windows` |
| `¿Qué software utiliza en ubuntu para su asignatura?` | `software_linux` |
| `¿Qué software adicional recomendaría incorporar para la asignatura(s)?` | `software_recommended` |
| `¿Requiere algún dispositivos y/o elementos además de los computadores (IoT, redes...)` | `devices` |
| `¿Tiene alguna recomendación o sugerencia adicional respecto a los equipos de cómputo con los que cuentan actualmente los laboratorios?` | `recommendations` |

Missing columns are read as empty text. The software columns contain a
comma-separated list of names, or `Ninguno` / `Ninguna` when nothing is used.

### Curriculum (`json`)

```json
{
  "carrera": "Tecnología en Desarrollo de Software",
  "plan_estudios": "2023-1",
  "estructura": {
    "tecnologia": "Periodos 1 a 6",
    "componente_propedeutico": "Periodo 7",
    "ingenieria": "Periodos 8 a 10"
  },
  "periodos": {
    "1": {
      "nombre": "PERIODO DE FORMACIÓN 1",
      "total_creditos": 16,
      "asignaturas": [
        { "codigo": "DS101", "nombre": "Cálculo Diferencial", "creditos": 3,
          "htd": 3, "htc": 1, "hta": 5, "clasificacion": "Básica", "es_electiva": false },
        { "codigo": "DS1E1", "nombre": "Electiva I", "creditos": 2,
          "htd": 2, "htc": 0, "hta": 4, "clasificacion": "Electiva", "es_electiva": true,
          "grupo_electiva": "A",
          "opciones": [
            { "codigo": "DS1E1A", "nombre": "Robótica", "creditos": 2, "htd": 2,
              "htc": 0, "hta": 4, "clasificacion": "Electiva", "es_electiva": false }
          ] }
      ]
    }
  }
}
```

Periods keep the order of the file. The options of an elective are courses of
their own; the name of the elective itself is never matched.

### Roster (`txt`)

Teacher names separated by commas. Surrounding spaces are removed and the
spelling of each name is kept for display.

## Matching rules

Course and teacher names are compared after `normalize`: lowercase, no accents,
no punctuation, single spaces. Software names are compared after
`software_key`, which keeps punctuation so that `C` and `C++` stay apart.

A course that cannot be found in the curriculum is not an error. It is reported
under its raw name in the `Sin clasificar` period.

## Output views

* `software`: every software with its mentions on Windows, Linux and as a
  recommendation, sorted by total mentions.
* `periods`: the same counts, per curriculum period and per course.
* `coverage`: for each period, how many courses have at least one answer and
  which ones are missing.
* `teachers`: the roster with the status of each teacher, plus the teachers who
  answered without being in the roster.
* `rows`: the survey table, with the filter options.
* `report`: all of the above in one JSON document, as consumed by the PDF export.
*/
