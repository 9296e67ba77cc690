use clap::Parser;

/// Summaries of the laboratory software survey: software usage, curriculum coverage
/// and teacher follow-up.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The survey answers, as exported by the forms tool.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (csv or xlsx, default csv) The type of the input. Files ending in .xlsx are read
    /// as Excel files if this option is not given.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. It is only
    /// required if the file has more than one worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path, optional) The curriculum in JSON format. Enables the coverage statistics
    /// and the classification of courses by period.
    #[clap(short, long, value_parser)]
    pub curriculum: Option<String>,

    /// (file path, optional) The list of teachers expected to answer, separated by commas.
    #[clap(short = 't', long, value_parser)]
    pub roster: Option<String>,

    /// (report, software, periods, coverage, teachers or rows, default report) The view to
    /// produce.
    #[clap(long, value_parser)]
    pub view: Option<String>,

    /// (asc or desc, default desc) The order of the software lists, by number of mentions.
    #[clap(long, value_parser)]
    pub sort: Option<String>,

    /// Only keep the answers for this semester (exact label).
    #[clap(long, value_parser)]
    pub semester: Option<String>,

    /// Only keep the answers for this course (exact name as written in the survey).
    #[clap(long, value_parser)]
    pub course: Option<String>,

    /// Only keep the answers of this teacher (exact name as written in the survey).
    #[clap(long, value_parser)]
    pub teacher: Option<String>,

    /// (all, surveyed or pending, default all) For the teachers view, the status to show.
    #[clap(long, value_parser)]
    pub status: Option<String>,

    /// For the teachers view, only show the names containing this text. Case and accents
    /// are ignored.
    #[clap(long, value_parser)]
    pub search: Option<String>,

    /// (summary, software, teachers, coverage or remarks) Sections to leave out of the
    /// report. May be repeated.
    #[clap(long, value_parser)]
    pub exclude: Option<Vec<String>>,

    /// (file path, 'stdout' or empty) Where to write the JSON output. Defaults to the
    /// standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected output in JSON format. If
    /// provided, labsurvey will check that the output matches the reference. The
    /// generation date and time are not compared.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, turns on debug logging on the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
