use std::path::PathBuf;

use pictile_engine::GridSize;

use crate::{
    store::{DEFAULT_SCORES_FILE, ScoreStore},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// Score file written by `play`
    #[clap(long, default_value = DEFAULT_SCORES_FILE)]
    scores_file: PathBuf,
    /// Only show scores for this grid size
    #[clap(long)]
    grid_size: Option<GridSize>,
    /// Maximum number of scores to show per grid size
    #[clap(long, default_value_t = 10)]
    limit: usize,
    /// Print the records as JSON instead of a table
    #[clap(long)]
    json: bool,
    /// Output file path (default: stdout)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let ScoresArg {
        scores_file,
        grid_size,
        limit,
        json,
        output,
    } = arg;

    let store = ScoreStore::new(scores_file.clone());
    let mut records = store.read_all()?;
    records.retain(|record| grid_size.is_none_or(|size| record.grid_size == size));
    records.sort_by(|a, b| a.grid_size.cmp(&b.grid_size).then_with(|| a.rank_cmp(b)));

    let mut shown = vec![];
    for group in records.chunk_by(|a, b| a.grid_size == b.grid_size) {
        shown.extend(group.iter().take(*limit).cloned());
    }
    eprintln!("Loaded {} scores from {}", records.len(), store.path().display());

    let mut output = Output::from_output_path(output.clone())?;
    if *json {
        return output.write_json(&shown);
    }

    let mut lines = vec![];
    for group in shown.chunk_by(|a, b| a.grid_size == b.grid_size) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("{}:", group[0].grid_size));
        lines.push(format!("{:>4}  {:>6}  {:>6}  {}", "#", "MOVES", "TIME", "DATE"));
        for (rank, record) in group.iter().enumerate() {
            lines.push(format!(
                "{:>4}  {:>6}  {:>6}  {}",
                rank + 1,
                record.move_count,
                record.elapsed,
                record.recorded_at.format("%Y-%m-%d %H:%M")
            ));
        }
    }
    if lines.is_empty() {
        lines.push("No scores yet.".to_owned());
    }
    output.write_lines(lines)
}
