//! HTML table -> `RawTable`.
//!
//! Only the first `<table>` on the page is read. Cell text is whitespace-collapsed
//! (full-width blanks included), and `colspan`/`rowspan` cells are repeated into
//! every grid position they cover so that column positions line up with the sheet.

use scraper::{ElementRef, Html, Selector};

use crate::domain::{Cell, RawTable};
use crate::error::ScheduleError;

/// Upper bound on a single span attribute; protects against absurd values.
const MAX_SPAN: usize = 1000;

/// Parse the first `<table>` of an HTML document.
pub fn parse_first_table(html: &str) -> Result<RawTable, ScheduleError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScheduleError::SourceShape("no <table> found in page".to_string()))?;

    let rows: Vec<ElementRef<'_>> = table
        .select(&row_sel)
        .filter(|tr| owning_table(*tr).map(|t| t.id()) == Some(table.id()))
        .collect();

    Ok(RawTable::new(expand_rows(&rows)))
}

fn selector(css: &str) -> Result<Selector, ScheduleError> {
    Selector::parse(css).map_err(|e| ScheduleError::SourceShape(format!("invalid selector `{css}`: {e:?}")))
}

/// Nearest enclosing `<table>` (rows of nested tables belong to the inner one).
fn owning_table(tr: ElementRef<'_>) -> Option<ElementRef<'_>> {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

fn expand_rows(rows: &[ElementRef<'_>]) -> Vec<Vec<Cell>> {
    // Per column: remaining rows a rowspan still covers, and its value.
    let mut carry: Vec<Option<(usize, Cell)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for tr in rows {
        let mut out: Vec<Cell> = Vec::new();

        for td in tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "td" | "th"))
        {
            while let Some(v) = take_carry(&mut carry, out.len()) {
                out.push(v);
            }

            let value = Cell::from_text(&collapse_text(td));
            let colspan = span(td, "colspan");
            let rowspan = span(td, "rowspan");

            for _ in 0..colspan {
                if rowspan > 1 {
                    let col = out.len();
                    if carry.len() <= col {
                        carry.resize(col + 1, None);
                    }
                    carry[col] = Some((rowspan - 1, value.clone()));
                }
                out.push(value.clone());
            }
        }

        while carry[out.len().min(carry.len())..].iter().any(Option::is_some) {
            let v = take_carry(&mut carry, out.len()).unwrap_or(Cell::Empty);
            out.push(v);
        }

        grid.push(out);
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut grid {
        row.resize(width, Cell::Empty);
    }
    grid
}

fn take_carry(carry: &mut [Option<(usize, Cell)>], col: usize) -> Option<Cell> {
    let slot = carry.get_mut(col)?;
    let (left, value) = slot.as_mut()?;
    let out = value.clone();
    *left -= 1;
    if *left == 0 {
        *slot = None;
    }
    Some(out)
}

fn span(cell: ElementRef<'_>, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
        .min(MAX_SPAN)
}

fn collapse_text(cell: ElementRef<'_>) -> String {
    let text: String = cell.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
