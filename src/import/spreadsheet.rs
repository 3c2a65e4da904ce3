use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::AppError;

/// One data row of an imported sheet, already mapped onto tool fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRow {
    /// 1-based row number in the sheet (the header is row 1).
    pub row_number: usize,
    pub name: Option<String>,
    pub category: Option<String>,
    pub subtitle: Option<String>,
    pub rating: Option<f64>,
    pub website_link: Option<String>,
    pub image_link: Option<String>,
    pub features: Option<String>,
    pub sharable_link: Option<String>,
}

/// Positions of the recognized headers in the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    name: Option<usize>,
    category: Option<usize>,
    description: Option<usize>,
    rating: Option<usize>,
    website: Option<usize>,
    image: Option<usize>,
    features: Option<usize>,
    sharable: Option<usize>,
}

impl ColumnMap {
    /// Header names are matched exactly (after trimming); unknown headers
    /// are ignored. The first occurrence of a repeated header wins.
    fn from_headers(headers: &[String]) -> Self {
        let position = |wanted: &str| headers.iter().position(|h| h == wanted);
        Self {
            name: position("name"),
            category: position("Category"),
            description: position("description"),
            rating: position("rating"),
            website: position("Website"),
            image: position("Image"),
            features: position("Features"),
            sharable: position("Sharable"),
        }
    }
}

fn cell(row: &[Data], index: Option<usize>) -> Option<&Data> {
    index.and_then(|i| row.get(i))
}

/// Text content of a cell; empty and blank cells yield `None`.
fn cell_text(value: Option<&Data>) -> Option<String> {
    let text = match value? {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn cell_number(value: Option<&Data>) -> Option<f64> {
    match value? {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|c| cell_text(Some(c)).is_none())
}

/// Map raw sheet rows onto [`ImportRow`]s. The first row holds the headers;
/// fully blank rows are skipped.
pub fn map_rows<'a, I>(mut rows: I) -> Vec<ImportRow>
where
    I: Iterator<Item = &'a [Data]>,
{
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| cell_text(Some(c)).unwrap_or_default())
        .collect();
    let columns = ColumnMap::from_headers(&headers);

    rows.enumerate()
        .filter(|(_, row)| !is_blank_row(row))
        .map(|(i, row)| ImportRow {
            row_number: i + 2,
            name: cell_text(cell(row, columns.name)),
            category: cell_text(cell(row, columns.category)),
            subtitle: cell_text(cell(row, columns.description)),
            rating: cell_number(cell(row, columns.rating)),
            website_link: cell_text(cell(row, columns.website)),
            image_link: cell_text(cell(row, columns.image)),
            features: cell_text(cell(row, columns.features)),
            sharable_link: cell_text(cell(row, columns.sharable)),
        })
        .collect()
}

/// Read the first sheet of the workbook at `path`.
///
/// The format (xlsx, xlsm, xlsb, xls, ods) is chosen from the file extension.
/// This performs blocking file I/O.
pub fn read_first_sheet(path: &Path) -> Result<Vec<ImportRow>, AppError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AppError::Import(format!("Failed to open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Import("Workbook has no sheets".into()))?
        .map_err(|e| AppError::Import(format!("Failed to read first sheet: {e}")))?;

    Ok(map_rows(range.rows()))
}
