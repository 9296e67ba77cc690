// Reading the CSV export of the survey.

use log::debug;
use snafu::prelude::*;
use survey_core::SurveyRow;

use crate::survey::io_common::ColumnMap;
use crate::survey::*;

/// Parses the content of a survey export: semicolon-delimited, with a header row.
pub fn parse_survey_csv(content: &str) -> SurveyResult<Vec<SurveyRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header: Vec<String> = rdr
        .headers()
        .context(CsvHeaderSnafu {})?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("parse_survey_csv: header: {:?}", header);
    let columns = ColumnMap::from_header(&header);

    let mut res: Vec<SurveyRow> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<&str> = line.iter().collect();
        match columns.build_row(&cells) {
            Some(row) => res.push(row),
            None => debug!("parse_survey_csv: skipping empty line {:?}", lineno),
        }
    }
    Ok(res)
}
