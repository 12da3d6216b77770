use crate::types::config::OutputConfig;
use crate::types::report::ScoreReport;

pub fn to_markdown(report: &ScoreReport, columns: &OutputConfig) -> String {
    let mut output = String::new();
    output.push_str("# Score Report\n\n");
    output.push_str(&format!(
        "- students: {}\n- matched: {}\n- unmatched students: {}\n- unmatched activity names: {}\n- activities: {}\n\n",
        report.rows.len(),
        report.matches.len(),
        report.unmatched_student_count(),
        report.unmatched_name_count(),
        report.titles.len()
    ));

    output.push_str("## Matches\n\n");
    if report.matches.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for pair in &report.matches {
            output.push_str(&format!(
                "- {} <- {} (similarity {:.2}, tier {:.1})\n",
                pair.roster_name, pair.scraped_name, pair.similarity, pair.tier
            ));
        }
        output.push('\n');
    }

    output.push_str("## Diagnostics\n\n");
    if report.diagnostics.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for diagnostic in &report.diagnostics {
            output.push_str(&format!("- {}\n", diagnostic.describe()));
        }
        output.push('\n');
    }

    output.push_str("## Scores\n\n");
    output.push_str(&format!(
        "| {} | {} |",
        escape_cell(&columns.id_header),
        escape_cell(&columns.name_header)
    ));
    for title in &report.titles {
        output.push_str(&format!(" {} |", escape_cell(title)));
    }
    output.push_str("\n|---|---|");
    output.push_str(&"---|".repeat(report.titles.len()));
    output.push('\n');
    for row in &report.rows {
        output.push_str(&format!(
            "| {} | {} |",
            escape_cell(&row.unique_id),
            escape_cell(&row.name)
        ));
        for title in &report.titles {
            match row.score_for(title) {
                Some(score) => output.push_str(&format!(" {} |", score.points())),
                None => output.push_str("  |"),
            }
        }
        output.push('\n');
    }

    output
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
