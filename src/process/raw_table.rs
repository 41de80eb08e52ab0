// src/process/raw_table.rs

/// One table row as scraped: each `td`'s trimmed text, in order.
pub type RawTableRow = Vec<String>;

/// One rectangular row of a scraped season table.
///
/// `cells` holds the positional columns `col_1 … col_N`; `year` and `athlete`
/// are the trailing `Year`/`Athlete` columns. Tags are appended right after a
/// row's own cells *before* padding, so on short rows they sit inside the
/// positional range and the trailing columns are the padding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub cells: Vec<String>,
    pub year: String,
    pub athlete: String,
    /// Attached by the collector once the batch is known to be non-empty.
    pub date_of_birth: Option<String>,
}

impl RawRecord {
    /// 1-based positional access; columns past this record's width read as empty.
    pub fn col(&self, n: usize) -> &str {
        n.checked_sub(1)
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// All rows scraped for one (year, athlete) season view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBatch {
    /// Number of positional columns (`maxColumns - 2`).
    pub width: usize,
    pub records: Vec<RawRecord>,
}

impl RawBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `col_1 … col_N, Year, Athlete`.
    pub fn column_names(&self) -> Vec<String> {
        column_names(self.width)
    }

    pub fn set_date_of_birth(&mut self, dob: Option<&str>) {
        for rec in &mut self.records {
            rec.date_of_birth = dob.map(str::to_string);
        }
    }
}

/// Every batch of a run stacked in append order, widened to the widest batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub width: usize,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn concat(batches: Vec<RawBatch>) -> Self {
        let width = batches.iter().map(|b| b.width).max().unwrap_or(0);
        let mut records = Vec::with_capacity(batches.iter().map(RawBatch::len).sum());
        for batch in batches {
            for mut rec in batch.records {
                rec.cells.resize(width, String::new());
                records.push(rec);
            }
        }
        Self { width, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

pub fn column_names(width: usize) -> Vec<String> {
    (1..=width)
        .map(|i| format!("col_{}", i))
        .chain(["Year".to_string(), "Athlete".to_string()])
        .collect()
}

/// Build a rectangular batch from scraped rows sharing one `(year, athlete)`.
///
/// Rows whose cells are all empty are dropped. The survivors get
/// `[year, athlete]` appended and are right-padded with empty strings to the
/// widest row. No surviving rows yields an empty batch.
pub fn extract_table_rows(rows: &[RawTableRow], year: &str, athlete: &str) -> RawBatch {
    let mut full: Vec<Vec<String>> = rows
        .iter()
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .map(|row| {
            let mut r = Vec::with_capacity(row.len() + 2);
            r.extend(row.iter().cloned());
            r.push(year.to_string());
            r.push(athlete.to_string());
            r
        })
        .collect();

    let max_cols = match full.iter().map(Vec::len).max() {
        Some(n) => n,
        None => return RawBatch::default(),
    };

    let records = full
        .iter_mut()
        .map(|r| {
            r.resize(max_cols, String::new());
            let athlete = r.pop().unwrap_or_default();
            let year = r.pop().unwrap_or_default();
            RawRecord {
                cells: std::mem::take(r),
                year,
                athlete,
                date_of_birth: None,
            }
        })
        .collect();

    RawBatch {
        width: max_cols - 2,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawTableRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn pads_every_row_to_the_widest() {
        let rows = vec![
            row(&["Long Jump", "2024"]),
            row(&["", "7.45 X", "a", "b", "", "Helsinki", "2024-06-01", ""]),
        ];
        let batch = extract_table_rows(&rows, "2024", "Jane Doe");

        assert_eq!(batch.width, 8);
        assert_eq!(batch.len(), 2);
        for rec in &batch.records {
            assert_eq!(rec.cells.len(), batch.width);
        }
        assert_eq!(batch.column_names().len(), 10);
        assert_eq!(batch.column_names()[0], "col_1");
        assert_eq!(batch.column_names()[8], "Year");
        assert_eq!(batch.column_names()[9], "Athlete");
    }

    #[test]
    fn tags_follow_the_row_cells_before_padding() {
        let rows = vec![
            row(&["Long Jump", "2024"]),
            row(&["", "7.45", "", "", "", "Helsinki"]),
        ];
        let batch = extract_table_rows(&rows, "2023", "Jane Doe");

        // widest row: 6 cells + 2 tags
        assert_eq!(batch.width, 6);

        let header = &batch.records[0];
        assert_eq!(header.col(1), "Long Jump");
        assert_eq!(header.col(3), "2023");
        assert_eq!(header.col(4), "Jane Doe");
        assert_eq!(header.col(5), "");
        assert_eq!(header.year, "");
        assert_eq!(header.athlete, "");

        let data = &batch.records[1];
        assert_eq!(data.col(6), "Helsinki");
        assert_eq!(data.year, "2023");
        assert_eq!(data.athlete, "Jane Doe");
    }

    #[test]
    fn blank_rows_are_dropped() {
        let rows = vec![row(&["", "", ""]), row(&[]), row(&["Shot Put", "2024"])];
        let batch = extract_table_rows(&rows, "2024", "A");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records[0].col(1), "Shot Put");
    }

    #[test]
    fn no_surviving_rows_is_an_empty_batch() {
        let rows = vec![row(&["", ""])];
        let batch = extract_table_rows(&rows, "2024", "A");
        assert!(batch.is_empty());
        assert_eq!(batch.width, 0);

        assert!(extract_table_rows(&[], "2024", "A").is_empty());
    }

    #[test]
    fn concat_widens_to_the_widest_batch() {
        let narrow = extract_table_rows(&[row(&["a", "b"])], "2023", "A");
        let wide = extract_table_rows(&[row(&["", "1", "2", "3", "4"])], "2024", "A");
        let table = RawTable::concat(vec![narrow, RawBatch::default(), wide]);

        assert_eq!(table.width, 5);
        assert_eq!(table.len(), 2);
        assert!(table.records.iter().all(|r| r.cells.len() == 5));
        assert_eq!(table.records[0].col(1), "a");
        assert_eq!(table.records[0].col(5), "");
        assert_eq!(table.records[1].year, "2024");
    }

    #[test]
    fn out_of_range_columns_read_empty() {
        let batch = extract_table_rows(&[row(&["a"])], "2024", "A");
        let rec = &batch.records[0];
        assert_eq!(rec.col(0), "");
        assert_eq!(rec.col(42), "");
    }
}
