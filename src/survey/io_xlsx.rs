// Reading the Excel export of the survey.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;
use survey_core::SurveyRow;

use crate::survey::io_common::ColumnMap;
use crate::survey::*;

pub fn read_xlsx_survey(path: &str, worksheet_name: Option<&str>) -> SurveyResult<Vec<SurveyRow>> {
    let wrange = get_range(path, worksheet_name)?;
    parse_range(&wrange)
}

fn parse_range(wrange: &Range<DataType>) -> SurveyResult<Vec<SurveyRow>> {
    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu {})?
        .iter()
        .map(cell_text)
        .collect();
    debug!("read_xlsx_survey: header: {:?}", header);
    let columns = ColumnMap::from_header(&header);

    let mut res: Vec<SurveyRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        match columns.build_row(&cells) {
            Some(r) => res.push(r),
            None => debug!("read_xlsx_survey: skipping empty row {:?}", idx + 2),
        }
    }
    Ok(res)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> SurveyResult<Range<DataType>> {
    debug!(
        "read_xlsx_survey: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?
            .context(OpeningExcelSnafu { path })?;
        return Ok(wrange);
    }
    let all_worksheets = workbook.worksheets();
    match all_worksheets.as_slice() {
        [] => EmptyExcelSnafu {}.fail(),
        [(name, wrange)] => {
            debug!("read_xlsx_survey: using the only worksheet {:?}", name);
            Ok(wrange.clone())
        }
        _ => {
            let names: Vec<&str> = all_worksheets.iter().map(|(n, _)| n.as_str()).collect();
            whatever!(
                "The Excel file has several worksheets ({:?}): use --excel-worksheet-name",
                names
            )
        }
    }
}

/// The text of a cell, as it would appear in the CSV export.
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        // Excel serial date, kept as a number.
        DataType::DateTime(f) => f.to_string(),
        DataType::Empty => String::new(),
        DataType::Error(e) => format!("{:?}", e),
    }
}
