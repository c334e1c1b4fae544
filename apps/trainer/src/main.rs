use clap::Parser;
use mood_predict_model::{
    DEFAULT_BOOL_COLS, DEFAULT_TARGET_COL, ErrorKind, TrainParams, TrainingTable, TreeParams,
    train,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Fit the mood classifier on a mood-log CSV and write the model artifact
///
/// ```bash
/// mood-predict-trainer --data data.csv --output mood_model.json
/// ```
#[derive(Parser, Debug)]
#[command(name = "mood-predict-trainer", version)]
struct Args {
    /// Training data, one row per mood log with a header line
    #[arg(long, default_value = "data.csv")]
    data: PathBuf,

    /// Where to write the artifact; `.json`, `.msgpack` or `.mpk`
    #[arg(long, short = 'o', default_value = "mood_model.json")]
    output: PathBuf,

    /// Outcome column
    #[arg(long, default_value = DEFAULT_TARGET_COL)]
    target: String,

    /// Yes/no column, repeatable. Defaults to the mood-log columns.
    #[arg(long = "bool-col", value_name = "NAME")]
    bool_cols: Vec<String>,

    /// Maximum tree depth (unlimited when omitted)
    #[arg(long)]
    max_depth: Option<usize>,

    #[arg(long, default_value = "2")]
    min_samples_split: usize,
}

impl Args {
    fn train_params(&self) -> TrainParams {
        let bool_cols = if self.bool_cols.is_empty() {
            DEFAULT_BOOL_COLS.iter().map(|c| c.to_string()).collect()
        } else {
            self.bool_cols.clone()
        };
        TrainParams {
            target: self.target.clone(),
            bool_cols,
            tree: TreeParams {
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
            },
        }
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.kind() {
                ErrorKind::DatasetNotFound => {
                    tracing::error!("Data file not found: {}", args.data.display())
                }
                ErrorKind::Save => tracing::error!("Error saving model: {}", e),
                ErrorKind::Dataset => tracing::error!("Error reading dataset: {}", e),
                _ => tracing::error!("Error during training: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> mood_predict_model::Result<()> {
    let params = args.train_params();
    tracing::info!(
        data = %args.data.display(),
        target = %params.target,
        bool_cols = params.bool_cols.len(),
        "Training mood model"
    );

    let table = TrainingTable::from_csv_path(&args.data)?;
    tracing::info!(rows = table.len(), columns = table.columns().len(), "Loaded dataset");

    let (model, report) = train(table, &params)?;
    tracing::info!(
        samples = report.n_samples,
        features = report.n_features,
        classes = ?report.classes,
        depth = report.depth,
        leaves = report.leaves,
        "Model trained"
    );
    tracing::info!("Training accuracy: {:.2}%", report.accuracy * 100.0);

    model.save(&args.output)?;
    tracing::info!("Model saved to {}", args.output.display());
    Ok(())
}
