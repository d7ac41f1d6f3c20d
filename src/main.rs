use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lexis::{
    Corpus, DfmError, LexisConfig, Pattern, Pipeline, Resources, TrimOptions, read_path,
    write_tables_csv,
};

/// Tokenize, count and explore a text dataset.
#[derive(Parser, Debug)]
#[command(name = "lexis", version, about)]
struct Cli {
    /// YAML pipeline configuration; defaults apply when omitted
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-document token, type and sentence counts
    Summary(DatasetArgs),

    /// Feature frequency table
    Freq(FreqArgs),

    /// Keyword-in-context search
    Kwic(KwicArgs),

    /// Build a document-feature matrix
    Dfm(DfmArgs),
}

#[derive(Args, Debug)]
struct DatasetArgs {
    /// CSV, TSV, JSON or JSON Lines dataset
    dataset: PathBuf,

    /// Column holding the document text
    #[arg(long)]
    text_field: Option<String>,

    /// Column holding document ids
    #[arg(long)]
    id_field: Option<String>,
}

#[derive(Args, Debug)]
struct FreqArgs {
    #[command(flatten)]
    data: DatasetArgs,

    /// Rows to print per table (0 for all)
    #[arg(long, short = 'n', default_value_t = 20)]
    top: usize,

    /// One table per value of this document variable (grouped before trimming)
    #[arg(long)]
    group_by: Option<String>,

    /// Write the full table(s) as CSV instead of printing
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct KwicArgs {
    #[command(flatten)]
    data: DatasetArgs,

    /// Exact term or `*`/`?` wildcard pattern
    pattern: String,

    /// Tokens of context on each side
    #[arg(long, short, default_value_t = 5)]
    window: usize,

    #[arg(long, short = 'i')]
    ignore_case: bool,
}

#[derive(Args, Debug)]
struct DfmArgs {
    #[command(flatten)]
    data: DatasetArgs,

    /// Sum rows by this document variable (applied before trimming)
    #[arg(long)]
    group_by: Option<String>,

    /// Drop features occurring fewer times in total
    #[arg(long)]
    min_termfreq: Option<u64>,

    /// Drop features found in fewer documents
    #[arg(long)]
    min_docfreq: Option<u64>,

    /// Top features to print
    #[arg(long, short = 'n', default_value_t = 10)]
    top: usize,

    /// Write the matrix as `docname,feature,count` CSV
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let mut config = match &cli.config {
        Some(path) => LexisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LexisConfig::default(),
    };
    let resources = Resources::new();

    match cli.command {
        Command::Summary(args) => {
            let corpus = load_corpus(&mut config, &args)?;
            let pipeline = Pipeline::from_config(&config, &resources)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "docname\ttypes\ttokens\tsentences")?;
            for row in pipeline.summarize(&corpus)? {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    row.docname, row.ntype, row.ntoken, row.nsentence
                )?;
            }
        }
        Command::Freq(args) => {
            let corpus = load_corpus(&mut config, &args.data)?;
            if args.group_by.is_some() {
                config.dfm.group_by = args.group_by.clone();
            }
            let pipeline = Pipeline::from_config(&config, &resources)?;
            let tables = pipeline.frequency_tables(&corpus)?;
            match &args.output {
                Some(path) => write_output(path, |w| write_tables_csv(&tables, w))?,
                None => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    for table in &tables {
                        if let Some(group) = &table.group {
                            writeln!(out, "# {group}")?;
                        }
                        let rows = if args.top == 0 {
                            &table.rows[..]
                        } else {
                            table.top(args.top)
                        };
                        for row in rows {
                            writeln!(
                                out,
                                "{:>4}  {:<24} {:>8} {:>6}",
                                row.rank, row.feature, row.frequency, row.docfreq
                            )?;
                        }
                    }
                }
            }
        }
        Command::Kwic(args) => {
            let corpus = load_corpus(&mut config, &args.data)?;
            let pipeline = Pipeline::from_config(&config, &resources)?;
            let pattern = Pattern::new(args.pattern.as_str());
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for hit in pipeline.kwic(&corpus, &pattern, args.window, args.ignore_case)? {
                writeln!(out, "{hit}")?;
            }
        }
        Command::Dfm(args) => {
            let corpus = load_corpus(&mut config, &args.data)?;
            if args.group_by.is_some() {
                config.dfm.group_by = args.group_by.clone();
            }
            if args.min_termfreq.is_some() || args.min_docfreq.is_some() {
                let trim = config.dfm.trim.get_or_insert_with(TrimOptions::default);
                trim.min_termfreq = args.min_termfreq.or(trim.min_termfreq);
                trim.min_docfreq = args.min_docfreq.or(trim.min_docfreq);
            }
            let pipeline = Pipeline::from_config(&config, &resources)?;
            let dfm = pipeline.build_dfm(&corpus)?;
            match &args.output {
                Some(path) => write_output(path, |w| dfm.write_csv(w))?,
                None => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    writeln!(
                        out,
                        "Document-feature matrix of: {} documents, {} features",
                        dfm.ndoc(),
                        dfm.nfeat()
                    )?;
                    for (feature, count) in dfm.topfeatures(args.top) {
                        writeln!(out, "{feature:<24} {count:>8}")?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn,lexis=info,corpus=info,dfm=info,tokens=info"))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn load_corpus(config: &mut LexisConfig, args: &DatasetArgs) -> Result<Corpus> {
    if let Some(field) = &args.text_field {
        config.corpus.text_field = field.clone();
    }
    if args.id_field.is_some() {
        config.corpus.id_field = args.id_field.clone();
    }
    read_path(&args.dataset, &config.corpus)
        .with_context(|| format!("reading {}", args.dataset.display()))
}

fn write_output<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), DfmError>,
{
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}
