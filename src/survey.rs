use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_core::*;

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

mod curriculum_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
mod report;
mod roster_reader;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file has no worksheet named {name:?}"))]
    MissingWorksheet { name: String },
    #[snafu(display("The Excel file is empty"))]
    EmptyExcel {},
    #[snafu(display("Could not read the header of the CSV file"))]
    CsvHeader { source: csv::Error },
    #[snafu(display("Could not read line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The roster {path} is not a UTF-8 text file"))]
    RosterEncoding {
        source: std::string::FromUtf8Error,
        path: String,
    },
    #[snafu(display("The roster {path} does not contain any name"))]
    EmptyRoster { path: String },
    #[snafu(display("Cannot summarize the survey"))]
    Summarizing { source: SummaryErrors },
    #[snafu(display("Error writing the output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// The survey file formats.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum InputType {
    Csv,
    Xlsx,
}

fn input_type(path: &str, declared: Option<&str>) -> SurveyResult<InputType> {
    match declared {
        Some("csv") => Ok(InputType::Csv),
        Some("xlsx") => Ok(InputType::Xlsx),
        Some(x) => whatever!("Input type not implemented {:?}", x),
        None => {
            let is_excel = Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("xlsx"))
                .unwrap_or(false);
            Ok(if is_excel {
                InputType::Xlsx
            } else {
                InputType::Csv
            })
        }
    }
}

/// The survey rows, and the fingerprint of the file they were read from.
fn read_survey(args: &Args) -> SurveyResult<(Vec<SurveyRow>, String)> {
    let path = args.input.as_str();
    let bytes = fs::read(path).context(OpeningFileSnafu { path })?;
    let fingerprint = sha256::digest(bytes.as_slice());
    info!("Attempting to read survey file {:?} ({})", path, fingerprint);
    let rows = match input_type(path, args.input_type.as_deref())? {
        InputType::Csv => io_csv::parse_survey_csv(&survey_text(path, &bytes))?,
        InputType::Xlsx => io_xlsx::read_xlsx_survey(path, args.excel_worksheet_name.as_deref())?,
    };
    info!("Read {} survey answers from {:?}", rows.len(), path);
    Ok((rows, fingerprint))
}

/// The text of a CSV export. Bytes that are not UTF-8 (for example an export in
/// Windows-1252) are replaced, and the headers or names that contain them will not
/// match.
fn survey_text<'a>(path: &str, bytes: &'a [u8]) -> Cow<'a, str> {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        warn!(
            "The survey {:?} is not valid UTF-8: accented headers and names may not be recognized",
            path
        );
        eprintln!(
            "Warning: the survey {:?} is not encoded in UTF-8, some fields may be read as empty",
            path
        );
    }
    text
}

/// A curriculum or roster that cannot be read is ignored: the analysis continues
/// without it.
fn optional_input<T>(kind: &str, path: Option<&str>, read: fn(&str) -> SurveyResult<T>) -> Option<T> {
    let path = path?;
    match read(path) {
        Ok(x) => Some(x),
        Err(e) => {
            warn!("Ignoring the {} {:?}: {}", kind, path, e);
            eprintln!("Warning: the {} {:?} could not be read and is ignored: {}", kind, path, e);
            None
        }
    }
}

fn sort_direction(x: Option<&str>) -> SurveyResult<SortDirection> {
    match x {
        None | Some("desc") => Ok(SortDirection::Descending),
        Some("asc") => Ok(SortDirection::Ascending),
        Some(x) => whatever!("Unknown sort direction {:?} (asc or desc)", x),
    }
}

fn status_filter(x: Option<&str>) -> SurveyResult<StatusFilter> {
    match x {
        None | Some("all") => Ok(StatusFilter::All),
        Some("surveyed") => Ok(StatusFilter::Surveyed),
        Some("pending") => Ok(StatusFilter::Pending),
        Some(x) => whatever!("Unknown teacher status {:?} (all, surveyed or pending)", x),
    }
}

pub fn run(args: &Args) -> SurveyResult<()> {
    let (rows, fingerprint) = read_survey(args)?;
    if rows.is_empty() {
        warn!("The survey {:?} does not contain any answer", args.input);
    }

    let curriculum = optional_input(
        "curriculum",
        args.curriculum.as_deref(),
        curriculum_reader::read_curriculum,
    );
    let roster = optional_input("roster", args.roster.as_deref(), roster_reader::read_roster);

    let filter = RowFilter {
        semester: args.semester.clone(),
        course: args.course.clone(),
        teacher: args.teacher.clone(),
    };
    let full = Session::new(&rows)
        .with_curriculum(curriculum)
        .with_roster(roster);
    let session = full.restrict(&filter);
    if !filter.is_empty() {
        info!(
            "Filters {:?} keep {} of {} answers",
            filter,
            session.rows().len(),
            full.rows().len()
        );
    }

    let direction = sort_direction(args.sort.as_deref())?;
    let view = args.view.clone().unwrap_or_else(|| "report".to_string());
    debug!("run: view {:?}, sort {:?}", view, direction);

    let result_js: JSValue = match view.as_str() {
        "rows" => {
            let facets = query::facets(
                full.rows(),
                args.semester.as_deref(),
                args.course.as_deref(),
            );
            json!({
                "encuestas": report::rows_to_json(session.rows()),
                "filtros": report::facets_to_json(&facets),
            })
        }
        "software" => {
            let summary = session.summarize(direction).context(SummarizingSnafu {})?;
            report::software_to_json(&summary.software)
        }
        "periods" => {
            let summary = session.summarize(direction).context(SummarizingSnafu {})?;
            report::periods_to_json(&summary.by_period)
        }
        "coverage" => {
            let summary = session.summarize(direction).context(SummarizingSnafu {})?;
            match summary.coverage {
                Some(c) => report::coverage_to_json(&c),
                None => whatever!("The coverage view requires a curriculum (--curriculum)"),
            }
        }
        "teachers" => {
            let summary = session.summarize(direction).context(SummarizingSnafu {})?;
            let status = status_filter(args.status.as_deref())?;
            match summary.teachers {
                Some(t) => {
                    let selected =
                        roster::filter(&t, status, args.search.as_deref().unwrap_or(""));
                    report::teachers_to_json(&selected)
                }
                None => whatever!("The teachers view requires a roster (--roster)"),
            }
        }
        "report" => {
            let summary = session.summarize(direction).context(SummarizingSnafu {})?;
            let sections = report::ReportSections::excluding(
                args.exclude.as_deref().unwrap_or(&[]),
            )?;
            report::build_report(&report::ReportInput {
                session: &session,
                summary: &summary,
                sections,
                fingerprint,
                generated_at: chrono::Local::now().naive_local(),
            })
        }
        x => whatever!("View not implemented {:?}", x),
    };

    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_output(args.out.as_deref(), &pretty_js)?;

    // The reference, if provided for comparison
    if let Some(reference_p) = args.reference.as_deref() {
        check_reference(reference_p, &result_js)?;
    }
    Ok(())
}

fn write_output(out: Option<&str>, contents: &str) -> SurveyResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", contents);
            Ok(())
        }
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, contents).context(WritingOutputSnafu { path })
        }
    }
}

/// Removes the parts of an output that change from one run to the next.
fn stable_view(js: &JSValue) -> JSValue {
    let mut res = js.clone();
    if let Some(meta) = res.get_mut("metadatos").and_then(|m| m.as_object_mut()) {
        meta.remove("fechaGeneracion");
        meta.remove("horaGeneracion");
    }
    res
}

fn check_reference(reference_path: &str, result_js: &JSValue) -> SurveyResult<()> {
    let contents =
        fs::read_to_string(reference_path).context(OpeningFileSnafu { path: reference_path })?;
    let reference_js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    let pretty_reference =
        serde_json::to_string_pretty(&stable_view(&reference_js)).context(ParsingJsonSnafu {})?;
    let pretty_result =
        serde_json::to_string_pretty(&stable_view(result_js)).context(ParsingJsonSnafu {})?;
    if pretty_reference != pretty_result {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(pretty_reference.as_str(), pretty_result.as_str(), "\n");
        whatever!("Difference detected between the computed output and the reference")
    }
    info!("The output matches the reference {:?}", reference_path);
    Ok(())
}
