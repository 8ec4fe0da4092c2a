use std::io::Read;

/// Response sheets in column order (columns 2 through 9 of the Questions sheet).
pub(crate) const SHEET_NAMES: [&str; 8] = [
    "START HERE",
    "Organization",
    "Product",
    "Infrastructure",
    "IT Accessibility",
    "Case-Specific",
    "AI",
    "Privacy",
];

const SHEET_COLUMN_OFFSET: usize = 2;
/// Row 1 carries the sheet title, row 2 the headers.
const LEADING_ROWS: usize = 2;

mod column {
    pub(super) const ID: usize = 0;
    pub(super) const QUESTION: usize = 1;
    pub(super) const SCORE_MAPPING: usize = 10;
    pub(super) const SCORE_LOCATION: usize = 11;
    pub(super) const HAS_ADDITIONAL_INFO: usize = 12;
    pub(super) const IF_THEN: usize = 13;
    pub(super) const STANDARD_GUIDANCE: usize = 14;
    pub(super) const NO_GUIDANCE: usize = 15;
    pub(super) const YES_GUIDANCE: usize = 16;
    pub(super) const NA_GUIDANCE: usize = 17;
    pub(super) const REASON: usize = 18;
    pub(super) const FOLLOWUP: usize = 19;
    pub(super) const COMPLIANT_RESPONSE: usize = 20;
    pub(super) const DEFAULT_IMPORTANCE: usize = 22;
    pub(super) const DEFAULT_WEIGHT: usize = 23;
}

/// One data row of the Questions sheet, addressed by fixed column index.
#[derive(Debug)]
pub(crate) struct QuestionRow {
    pub(crate) id: String,
    pub(crate) question: Option<String>,
    pub(crate) sheets: Vec<&'static str>,
    pub(crate) score_mapping: Option<String>,
    pub(crate) score_location: Option<String>,
    pub(crate) has_additional_info: bool,
    pub(crate) if_then: Option<String>,
    pub(crate) standard_guidance: Option<String>,
    pub(crate) no_guidance: Option<String>,
    pub(crate) yes_guidance: Option<String>,
    pub(crate) na_guidance: Option<String>,
    pub(crate) reason: Option<String>,
    pub(crate) followup: Option<String>,
    pub(crate) compliant_response: Option<String>,
    pub(crate) default_importance: Option<String>,
    pub(crate) default_weight: Option<String>,
}

/// Reads every data row that carries a dash-separated id. Rows without one
/// (section headers, blank lines) are dropped here.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<QuestionRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records().skip(LEADING_ROWS) {
        let record = record?;
        let id = cell(&record, column::ID).unwrap_or_default();
        if !id.contains('-') {
            continue;
        }

        let sheets = SHEET_NAMES
            .iter()
            .enumerate()
            .filter(|(index, _)| is_flag_set(&record, SHEET_COLUMN_OFFSET + index))
            .map(|(_, name)| *name)
            .collect();

        rows.push(QuestionRow {
            id,
            question: cell(&record, column::QUESTION),
            sheets,
            score_mapping: cell(&record, column::SCORE_MAPPING),
            score_location: cell(&record, column::SCORE_LOCATION),
            has_additional_info: is_truthy(&record, column::HAS_ADDITIONAL_INFO),
            if_then: cell(&record, column::IF_THEN),
            standard_guidance: cell(&record, column::STANDARD_GUIDANCE),
            no_guidance: cell(&record, column::NO_GUIDANCE),
            yes_guidance: cell(&record, column::YES_GUIDANCE),
            na_guidance: cell(&record, column::NA_GUIDANCE),
            reason: cell(&record, column::REASON),
            followup: cell(&record, column::FOLLOWUP),
            compliant_response: cell(&record, column::COMPLIANT_RESPONSE),
            default_importance: cell(&record, column::DEFAULT_IMPORTANCE),
            default_weight: cell(&record, column::DEFAULT_WEIGHT),
        });
    }

    Ok(rows)
}

fn cell(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(|value| value.replace('\u{feff}', ""))
        .filter(|value| !value.trim().is_empty())
}

/// Spreadsheet exports write the presence flag as `1`, sometimes `1.0`.
fn is_flag_set(record: &csv::StringRecord, index: usize) -> bool {
    record
        .get(index)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .is_some_and(|value| value == 1.0)
}

/// Any non-blank cell counts, except a numeric zero.
fn is_truthy(record: &csv::StringRecord, index: usize) -> bool {
    cell(record, index).is_some_and(|value| match value.trim().parse::<f64>() {
        Ok(number) => number != 0.0,
        Err(_) => true,
    })
}
