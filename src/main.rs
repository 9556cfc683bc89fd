use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use newsgroup_similarity::{
    display::{format_score, preview},
    CleanOptions, Corpus, Error, Settings, SimilarityLookup, StripOptions, Subset,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compare 20 Newsgroups documents by TF-IDF cosine similarity
#[derive(Parser, Debug)]
#[command(name = "newsgroup-similarity")]
#[command(about = "Pick two newsgroup posts and see how similar they are", long_about = None)]
struct Args {
    /// Root of the 20news-bydate-train / 20news-bydate-test directories
    #[arg(short, long, env = "NEWSGROUPS_DIR", default_value = "./20news")]
    data_dir: PathBuf,

    /// Which split to load: train, test or all
    #[arg(long, env = "NEWSGROUPS_SUBSET", default_value_t = Subset::All)]
    subset: Subset,

    /// Keep post headers
    #[arg(long)]
    keep_headers: bool,

    /// Keep signature blocks
    #[arg(long)]
    keep_footers: bool,

    /// Keep quoted replies
    #[arg(long)]
    keep_quotes: bool,

    /// Do not squeeze repeated punctuation while cleaning
    #[arg(long)]
    keep_repeated_punctuation: bool,

    /// Collapse whitespace again at the end of cleaning
    #[arg(long)]
    recollapse_whitespace: bool,

    /// Cleaning workers (0 = one per core)
    #[arg(long, env = "SIMILARITY_WORKERS", default_value_t = 0)]
    workers: usize,

    /// Memoized similarity pairs (0 disables the cache)
    #[arg(long, env = "SIMILARITY_CACHE_CAPACITY", default_value_t = newsgroup_similarity::similarity::DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,

    /// Read / write the prepared corpus from / to this CBOR file
    #[arg(long, env = "SIMILARITY_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Characters of each document to show
    #[arg(long, default_value_t = newsgroup_similarity::display::DEFAULT_PREVIEW_CHARS)]
    preview_chars: usize,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories with their document counts
    Categories,
    /// List the document ids of a category
    List {
        category: String,
        /// Show at most this many ids
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one document and its heaviest terms
    Show {
        id: usize,
        #[arg(long, default_value_t = 10)]
        terms: usize,
    },
    /// Similarity score of two documents
    Compare {
        first: usize,
        second: usize,
        /// Require the first document to be in this category
        #[arg(long)]
        first_category: Option<String>,
        /// Require the second document to be in this category
        #[arg(long)]
        second_category: Option<String>,
    },
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            data_dir: self.data_dir.clone(),
            subset: self.subset,
            strip: StripOptions {
                headers: !self.keep_headers,
                footers: !self.keep_footers,
                quotes: !self.keep_quotes,
            },
            clean: CleanOptions {
                squeeze_punctuation: !self.keep_repeated_punctuation,
                recollapse_whitespace: self.recollapse_whitespace,
            },
            workers: self.workers,
            cache_capacity: self.cache_capacity,
            snapshot: self.snapshot.clone(),
            preview_chars: self.preview_chars,
        }
    }
}

fn ensure_in_category(corpus: &Corpus, id: usize, category: Option<&str>) -> anyhow::Result<()> {
    let Some(category) = category else {
        return Ok(());
    };
    let ids = corpus
        .documents_in(category)
        .ok_or_else(|| Error::UnknownCategory(category.to_string()))?;
    if ids.binary_search(&id).is_err() {
        bail!("document {id} is not in category '{category}'");
    }
    Ok(())
}

fn print_document(corpus: &Corpus, heading: &str, id: usize, preview_chars: usize) -> anyhow::Result<()> {
    let doc = corpus.document(id)?;
    println!("## {heading} - {} (#{})", doc.category, doc.id);
    println!("{}", preview(&doc.cleaned, preview_chars));
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = args.settings();
    info!(data_dir = %settings.data_dir.display(), subset = %settings.subset, "preparing corpus");

    let prepared = settings
        .preparer()
        .prepare()
        .with_context(|| format!("could not prepare corpus from {}", settings.data_dir.display()))?;
    let corpus = &prepared.corpus;

    match &args.command {
        Command::Categories => {
            for name in corpus.category_names() {
                let count = corpus.documents_in(name).map_or(0, <[usize]>::len);
                println!("{name}\t{count}");
            }
        }
        Command::List { category, limit } => {
            let ids = corpus
                .documents_in(category)
                .ok_or_else(|| Error::UnknownCategory(category.clone()))?;
            let shown = limit.unwrap_or(ids.len()).min(ids.len());
            for id in &ids[..shown] {
                println!("{id}");
            }
        }
        Command::Show { id, terms } => {
            print_document(corpus, "Document", *id, settings.preview_chars)?;
            for (term, weight) in prepared.matrix.top_terms(*id, *terms)? {
                println!("{term}\t{weight:.4}");
            }
        }
        Command::Compare { first, second, first_category, second_category } => {
            ensure_in_category(corpus, *first, first_category.as_deref())?;
            ensure_in_category(corpus, *second, second_category.as_deref())?;

            let lookup = SimilarityLookup::with_capacity(prepared.clone(), settings.cache_capacity);
            let score = lookup.similarity(*first, *second)?;
            println!("Similarity Score: {}", format_score(score));
            println!();
            print_document(corpus, "Document 1", *first, settings.preview_chars)?;
            print_document(corpus, "Document 2", *second, settings.preview_chars)?;
        }
    }
    Ok(())
}
