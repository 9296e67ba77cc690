use log::info;
use snafu::prelude::*;

use crate::survey::*;

/// Names separated by commas. Blank entries are dropped.
pub fn parse_roster(content: &str) -> Roster {
    let names: Vec<String> = content
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();
    Roster::new(&names)
}

pub fn read_roster(path: &str) -> SurveyResult<Roster> {
    let bytes = fs::read(path).context(OpeningFileSnafu { path })?;
    let contents = String::from_utf8(bytes).context(RosterEncodingSnafu { path })?;
    let roster = parse_roster(contents.trim_start_matches('\u{feff}'));
    ensure!(!roster.is_empty(), EmptyRosterSnafu { path });
    info!("Read {} teacher names from {:?}", roster.len(), path);
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_kept_verbatim() {
        let r = parse_roster(" Ana López ,LUIS PEREZ,\n, Carlos Ruiz\n");
        assert_eq!(r.names, vec!["Ana López", "LUIS PEREZ", "Carlos Ruiz"]);
    }

    #[test]
    fn empty_roster() {
        assert!(parse_roster(" , ,\n").is_empty());
        assert!(parse_roster("").is_empty());
    }

    fn write_roster(dir: &tempfile::TempDir, bytes: &[u8]) -> String {
        let path = dir.path().join("docentes.txt");
        fs::write(&path, bytes).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn read_roster_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_roster(&dir, "\u{feff}Ana López, Marta\n".as_bytes());
        let r = read_roster(&path).unwrap();
        assert_eq!(r.names, vec!["Ana López", "Marta"]);
    }

    #[test]
    fn roster_not_utf8() {
        let dir = tempfile::TempDir::new().unwrap();
        // "Ana L\xf3pez" in Windows-1252.
        let path = write_roster(&dir, b"Ana L\xf3pez, Marta");
        let res = read_roster(&path);
        assert!(matches!(res, Err(SurveyError::RosterEncoding { .. })));
    }

    #[test]
    fn roster_without_names() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_roster(&dir, b",,");
        let res = read_roster(&path);
        assert!(matches!(res, Err(SurveyError::EmptyRoster { .. })));
        let res = read_roster(&dir.path().join("missing.txt").to_string_lossy());
        assert!(matches!(res, Err(SurveyError::OpeningFile { .. })));
    }
}
