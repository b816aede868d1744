use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{builder::NonEmptyStringValueParser, Parser, ValueEnum};
use tracing::error;

use crate::client::VisionClient;
use crate::config::Config;
use crate::input::ImageInput;
use crate::report;
use crate::service::AnnotationService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    #[value(name = "LABELS")]
    Labels,
    #[value(name = "TEXTS")]
    Texts,
    #[value(name = "FACES")]
    Faces,
    #[value(name = "BATCH_LABELS")]
    BatchLabels,
}

/// Annotate images with the Cloud Vision API.
///
/// Credentials are read from the service account key named by
/// GOOGLE_APPLICATION_CREDENTIALS.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// Image file, or a directory of images for BATCH_LABELS
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub path: String,

    /// Operation to run
    #[arg(short, long, value_enum)]
    pub op: Operation,
}

impl Cli {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

/// Rewrites single-dash long flags (`-path x`, `-op=LABELS`) to the
/// double-dash form clap understands. Nothing after `--` is touched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    arg
                }
                Some("-path") => OsString::from("--path"),
                Some("-op") => OsString::from("--op"),
                Some(flag) if flag.starts_with("-path=") || flag.starts_with("-op=") => {
                    OsString::from(format!("-{flag}"))
                }
                _ => arg,
            }
        })
        .collect()
}

/// Exit status for a failed argument parse. Help and version requests are not
/// failures; every usage error maps to 1.
pub fn usage_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// Images an operation works on, read in full before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inputs {
    Single(ImageInput),
    Batch(Vec<ImageInput>),
}

impl Inputs {
    pub fn read(operation: Operation, path: &Path) -> Result<Self> {
        match operation {
            Operation::Labels | Operation::Texts | Operation::Faces => {
                let image = ImageInput::open(path).context("failed to read file")?;
                Ok(Inputs::Single(image))
            }
            Operation::BatchLabels => {
                let images = ImageInput::read_dir(path).context("failed to read directory")?;
                Ok(Inputs::Batch(images))
            }
        }
    }
}

/// Runs `operation` over already-read `inputs` and writes the report to `out`.
pub async fn execute<S: AnnotationService>(
    client: &VisionClient<S>,
    operation: Operation,
    inputs: &Inputs,
    out: &mut impl Write,
) -> Result<()> {
    match (operation, inputs) {
        (Operation::Labels, Inputs::Single(image)) => {
            let labels = client.detect_labels(image).await.context("failed to detect labels")?;
            report::write_labels(out, &labels)?;
        }
        (Operation::Texts, Inputs::Single(image)) => {
            let texts = client.detect_texts(image).await.context("failed to detect texts")?;
            report::write_texts(out, &texts)?;
        }
        (Operation::Faces, Inputs::Single(image)) => {
            let faces = client.detect_faces(image).await.context("failed to detect faces")?;
            report::write_faces(out, &faces)?;
        }
        (Operation::BatchLabels, Inputs::Batch(images)) => {
            let results = client
                .batch_detect_labels(images)
                .await
                .context("failed to get batch responses")?;
            report::write_batch(out, &results)?;
        }
        (operation, _) => anyhow::bail!("inputs do not match operation {operation:?}"),
    }
    out.flush()?;
    Ok(())
}

/// Reads the inputs `operation` needs from `path`, then runs it.
pub async fn dispatch<S: AnnotationService>(
    client: &VisionClient<S>,
    operation: Operation,
    path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let inputs = Inputs::read(operation, path)?;
    execute(client, operation, &inputs, out).await
}

/// Whole program: parse `args`, load configuration through `lookup`, read
/// the inputs, connect and report to `out`. Returns the process exit code.
pub async fn run_with<I, T>(
    args: I,
    lookup: impl Fn(&str) -> Option<String>,
    out: &mut impl Write,
) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cli = match Cli::try_parse_from(normalize_args(args)) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return usage_exit_code(&err);
        }
    };

    match run(cli, lookup, out).await {
        Ok(()) => 0,
        Err(err) => {
            error!("{err:#}");
            1
        }
    }
}

async fn run(
    cli: Cli,
    lookup: impl Fn(&str) -> Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    let config = Config::from_lookup(lookup)?;
    let inputs = Inputs::read(cli.op, &cli.path())?;
    let client = VisionClient::connect(&config).context("failed to create client")?;
    execute(&client, cli.op, &inputs, out).await
}
