use std::collections::BTreeSet;

use polars::prelude::*;

use rds_common::any_to_text;

/// Drop exact-duplicate rows, keeping the first occurrence in order.
///
/// Null and `""` are distinct values. Returns the kept table and the number
/// of rows dropped.
pub fn dedupe_rows(df: &DataFrame) -> PolarsResult<(DataFrame, usize)> {
    let columns = df.get_columns();
    let row_count = df.height();
    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(row_count);
    for idx in 0..row_count {
        let mut key = Vec::with_capacity(columns.len());
        for column in columns {
            key.push(any_to_text(column.get(idx)?));
        }
        keep.push(seen.insert(key));
    }

    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped == 0 {
        return Ok((df.clone(), 0));
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    Ok((df.filter(&mask)?, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec![1i64, 2, 1, 3, 2]).into_column(),
            Series::new("name".into(), vec!["a", "b", "a", "c", "x"]).into_column(),
        ])
        .unwrap();

        let (kept, dropped) = dedupe_rows(&df).unwrap();
        assert_eq!(dropped, 1);
        let names: Vec<_> = kept.column("name").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(names, vec![Some("a"), Some("b"), Some("c"), Some("x")]);
    }

    #[test]
    fn null_and_empty_differ() {
        let df = DataFrame::new(vec![
            Series::new("name".into(), vec![None, Some(""), None]).into_column(),
        ])
        .unwrap();
        let (kept, dropped) = dedupe_rows(&df).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(kept.height(), 2);
    }
}
