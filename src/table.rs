use crate::aggregate::FetchOutcome;

const HEADERS: [&str; 3] = ["REPO", "URL", "TITLE"];
const MIN_WIDTHS: [usize; 3] = [4, 3, 5];
const TITLE_MAX_CHARS: usize = 60;
const ELLIPSIS: &str = "...";

pub type Row = [String; 3];

/// Shortens `s` to at most `max` characters, ending in `...` when cut.
///
/// Counts `char`s, never bytes, so multi-byte text is never split.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= ELLIPSIS.len() {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

/// One row per pull request, or a single placeholder row for a reference
/// with no open pull requests or a failed fetch.
pub fn table_rows(outcomes: &[FetchOutcome]) -> Vec<Row> {
    outcomes
        .iter()
        .flat_map(|outcome| match &outcome.result {
            Err(err) => vec![[
                outcome.repo.clone(),
                String::new(),
                single_line(&format!("(error: {})", err.detailed())),
            ]],
            Ok(pulls) if pulls.is_empty() => vec![[
                outcome.repo.clone(),
                String::new(),
                "(no open PRs)".to_string(),
            ]],
            Ok(pulls) => pulls
                .iter()
                .map(|pull| {
                    [
                        outcome.repo.clone(),
                        pull.html_url.clone(),
                        truncate(&single_line(&pull.title), TITLE_MAX_CHARS),
                    ]
                })
                .collect(),
        })
        .collect()
}

/// Widest cell per column in characters, never below the header minimums.
pub fn column_widths(rows: &[Row]) -> [usize; 3] {
    rows.iter().fold(MIN_WIDTHS, |mut widths, row| {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
        widths
    })
}

/// Renders the header, a dashed separator and every row as aligned text.
pub fn render_table(outcomes: &[FetchOutcome]) -> String {
    let rows = table_rows(outcomes);
    let widths = column_widths(&rows);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(&HEADERS, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|row| format_line(row, &widths)));
    lines.join("\n")
}

fn format_line<S: AsRef<str>>(cells: &[S; 3], widths: &[usize; 3]) -> String {
    format!(
        "{:<w0$}  {:<w1$}  {:<w2$}",
        cells[0].as_ref(),
        cells[1].as_ref(),
        cells[2].as_ref(),
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    )
    .trim_end()
    .to_string()
}

fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}
