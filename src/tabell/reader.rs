use super::schema::{
    self, COL_COMPANY, COL_DAYS_END, COL_DAYS_START, COL_EMPLOYEE_ID, COL_JOB_TITLE, COL_MONTH,
    COL_NAME, COL_PROJECT, DATA_START_ROW, EMPLOYEE_ID_PREFIX,
};
use crate::error::{ReconError, Result};
use crate::hours::parse_hours;
use crate::model::{Month, TabellEntry};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Seam for fetching raw tabell rows.
///
/// The production transport is an anonymous HTTPS GET against a Google
/// Sheets "publish to web" CSV export URL, with a 30-second timeout and
/// BOM-aware UTF-8 decoding — that URL construction and network fetch are
/// out of scope for this crate (see spec §1/§6). Implementations of this
/// trait supply already-decoded rows; [`read_tabell_rows`] never performs
/// I/O itself.
pub trait TabellSource: Send + Sync {
    fn fetch_rows(&self) -> Result<Vec<Vec<String>>>;
}

/// Reads tabell rows from a local CSV file. Stands in for the Google
/// Sheets network fetch in the CLI and in tests.
pub struct LocalFileTabellSource {
    path: PathBuf,
}

impl LocalFileTabellSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TabellSource for LocalFileTabellSource {
    fn fetch_rows(&self) -> Result<Vec<Vec<String>>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                ReconError::Transport(format!("reading tabell csv {}: {e}", self.path.display()))
            })?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for rec in rdr.records() {
            let rec = rec.map_err(|e| ReconError::Transport(e.to_string()))?;
            rows.push(rec.iter().map(|s| s.to_string()).collect());
        }
        if let Some(first_cell) = rows.first_mut().and_then(|row| row.first_mut()) {
            if let Some(stripped) = first_cell.strip_prefix('\u{feff}') {
                *first_cell = stripped.to_string();
            }
        }
        Ok(rows)
    }
}

/// Fetches and decodes tabell entries for the months covered by the date
/// range, using `source` to supply the raw rows.
pub fn fetch_tabell(
    source: &dyn TabellSource,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<Vec<TabellEntry>> {
    let rows = source.fetch_rows()?;
    Ok(read_tabell_rows(&rows, date_from, date_to))
}

/// Returns the sorted, deduplicated project names (column AK) across all
/// rows supplied by `source`.
pub fn fetch_projects(source: &dyn TabellSource) -> Result<Vec<String>> {
    let rows = source.fetch_rows()?;
    Ok(distinct_projects(&rows))
}

/// Decodes already-fetched tabell rows into [`TabellEntry`] values,
/// filtered to the months covered by `[date_from, date_to]`.
pub fn read_tabell_rows(
    rows: &[Vec<String>],
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Vec<TabellEntry> {
    if rows.len() < DATA_START_ROW + 1 {
        return Vec::new();
    }

    let months_needed = needed_months(date_from, date_to);
    let mut entries = Vec::new();

    for row in &rows[DATA_START_ROW..] {
        if row.len() <= COL_MONTH {
            continue;
        }

        let raw_id = row[COL_EMPLOYEE_ID].trim();
        if raw_id.is_empty() {
            continue;
        }
        let employee_id = strip_employee_id_prefix(raw_id);
        if employee_id.is_empty() {
            continue;
        }

        let month_str = row[COL_MONTH].trim();
        let Some(month) = Month::from_name(month_str) else {
            continue;
        };
        if !months_needed.contains(&month.number()) {
            continue;
        }

        let name = row.get(COL_NAME).map(|s| s.trim().to_string()).unwrap_or_default();
        let job_title = row
            .get(COL_JOB_TITLE)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let company = row
            .get(COL_COMPANY)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let project = row
            .get(COL_PROJECT)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let mut daily_hours = BTreeMap::new();
        let days_end = (COL_DAYS_END + 1).min(row.len());
        for col_idx in COL_DAYS_START..days_end {
            let day_num = schema::day_number(col_idx);
            daily_hours.insert(day_num, parse_hours(row[col_idx].trim()));
        }

        entries.push(TabellEntry {
            employee_id,
            name,
            job_title,
            company,
            project,
            month,
            daily_hours,
        });
    }

    entries
}

/// Distinct non-empty project names (column AK) across all data rows.
pub fn distinct_projects(rows: &[Vec<String>]) -> Vec<String> {
    if rows.len() < DATA_START_ROW + 1 {
        return Vec::new();
    }
    let mut projects: BTreeSet<String> = BTreeSet::new();
    for row in &rows[DATA_START_ROW..] {
        if let Some(val) = row.get(COL_PROJECT) {
            let val = val.trim();
            if !val.is_empty() {
                projects.insert(val.to_string());
            }
        }
    }
    projects.into_iter().collect()
}

/// Strips a case-insensitive `EMPLOYEE_ID_PREFIX` from the start of `raw`
/// only, and trims the remainder.
fn strip_employee_id_prefix(raw: &str) -> String {
    let prefix_lower: Vec<char> = EMPLOYEE_ID_PREFIX
        .chars()
        .flat_map(|c| c.to_lowercase())
        .collect();
    let raw_chars: Vec<char> = raw.chars().collect();

    if raw_chars.len() >= prefix_lower.len() {
        let candidate_lower: Vec<char> = raw_chars[..prefix_lower.len()]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect();
        if candidate_lower == prefix_lower {
            let rest: String = raw_chars[prefix_lower.len()..].iter().collect();
            return rest.trim().to_string();
        }
    }
    raw.trim().to_string()
}

/// Month numbers covered by `[date_from, date_to]`, matching the
/// reference implementation's month-stepping walk (year is not part of
/// the key — a tabell row only carries a month name, not a year).
fn needed_months(date_from: NaiveDate, date_to: NaiveDate) -> BTreeSet<u32> {
    let mut months = BTreeSet::new();
    let mut current = date_from;
    loop {
        if current > date_to {
            break;
        }
        months.insert(current.month());
        if current.month() == 12 {
            break;
        }
        let Some(next_month_first) = NaiveDate::from_ymd_opt(current.year(), current.month() + 1, 1)
        else {
            break;
        };
        if next_month_first > date_to {
            break;
        }
        current = next_month_first;
    }
    months.insert(date_from.month());
    months.insert(date_to.month());
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_row() -> Vec<String> {
        vec!["header".to_string(); 37]
    }

    fn data_row(
        id: &str,
        name: &str,
        month: &str,
        hours: &[(usize, &str)],
        project: &str,
    ) -> Vec<String> {
        let mut row = vec![String::new(); 37];
        row[COL_EMPLOYEE_ID] = id.to_string();
        row[COL_NAME] = name.to_string();
        row[COL_JOB_TITLE] = "Operator".to_string();
        row[COL_COMPANY] = "Acme".to_string();
        row[COL_MONTH] = month.to_string();
        row[COL_PROJECT] = project.to_string();
        for (day, val) in hours {
            row[COL_DAYS_START + day - 1] = val.to_string();
        }
        row
    }

    #[test]
    fn strips_cyrillic_prefix_case_insensitively() {
        assert_eq!(strip_employee_id_prefix("ТН21045"), "21045");
        assert_eq!(strip_employee_id_prefix("тн21045"), "21045");
        assert_eq!(strip_employee_id_prefix("21045"), "21045");
    }

    #[test]
    fn filters_by_month_and_skips_empty_id() {
        let rows = vec![
            header_row(),
            data_row("ТН1", "Alice", "March", &[(10, "8")], "Proj"),
            data_row("", "Ghost", "March", &[], ""),
            data_row("ТН2", "Bob", "April", &[(1, "7")], ""),
        ];
        let from = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let entries = read_tabell_rows(&rows, from, to);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].employee_id, "1");
        assert_eq!(entries[0].hours_on(10), 8.0);
        assert_eq!(entries[0].project, "Proj");
    }

    #[test]
    fn distinct_projects_sorted_unique() {
        let rows = vec![
            header_row(),
            data_row("1", "Alice", "March", &[], "Zeta"),
            data_row("2", "Bob", "March", &[], "Alpha"),
            data_row("3", "Carol", "March", &[], "Alpha"),
            data_row("4", "Dave", "March", &[], ""),
        ];
        assert_eq!(distinct_projects(&rows), vec!["Alpha", "Zeta"]);
    }
}
