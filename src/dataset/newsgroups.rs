//! Loader for the "bydate" on-disk layout of 20 Newsgroups:
//!
//! ```text
//! root/
//!   20news-bydate-train/<category>/<post>
//!   20news-bydate-test/<category>/<post>
//! ```
//!
//! A root without the two split directories is read as a single split.

use std::{collections::BTreeSet, fmt, fs, path::{Path, PathBuf}, str::FromStr};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::{dataset::{DatasetSource, RawDataset}, error::{Error, Result}};

pub const TRAIN_DIR: &str = "20news-bydate-train";
pub const TEST_DIR: &str = "20news-bydate-test";

static QUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(writes in|writes:|wrote:|says:|said:|^In article|^Quoted from|^\||^>)").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subset {
    Train,
    Test,
    /// train followed by test
    #[default]
    All,
}

impl FromStr for Subset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Subset::Train),
            "test" => Ok(Subset::Test),
            "all" => Ok(Subset::All),
            other => Err(format!("unknown subset '{other}' (expected train, test or all)")),
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subset::Train => write!(f, "train"),
            Subset::Test => write!(f, "test"),
            Subset::All => write!(f, "all"),
        }
    }
}

/// Which parts of a post are removed before it enters the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripOptions {
    pub headers: bool,
    pub footers: bool,
    pub quotes: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            headers: true,
            footers: true,
            quotes: true,
        }
    }
}

impl StripOptions {
    pub fn none() -> Self {
        Self {
            headers: false,
            footers: false,
            quotes: false,
        }
    }

    /// headers, then footers, then quotes
    pub fn apply(&self, text: &str) -> String {
        let mut text = text.to_string();
        if self.headers {
            text = strip_header(&text).to_string();
        }
        if self.footers {
            text = strip_footer(&text);
        }
        if self.quotes {
            text = strip_quoting(&text);
        }
        text
    }
}

/// Everything up to and including the first blank line.
pub fn strip_header(text: &str) -> &str {
    text.split_once("\n\n").map_or("", |(_, body)| body)
}

/// Cut at the last line made only of dashes (or blank), unless that is the first line.
pub fn strip_footer(text: &str) -> String {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    match lines
        .iter()
        .rposition(|line| line.trim().trim_matches('-').is_empty())
    {
        Some(line_num) if line_num > 0 => lines[..line_num].join("\n"),
        _ => text.to_string(),
    }
}

/// Lines that quote or attribute another post.
pub fn strip_quoting(text: &str) -> String {
    text.split('\n')
        .filter(|line| !QUOTE_RE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Posts are Latin-1 encoded.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// 20 Newsgroups read from a local directory.
#[derive(Debug, Clone)]
pub struct NewsgroupsDir {
    root: PathBuf,
    subset: Subset,
    strip: StripOptions,
}

impl NewsgroupsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            subset: Subset::default(),
            strip: StripOptions::default(),
        }
    }

    pub fn with_subset(mut self, subset: Subset) -> Self {
        self.subset = subset;
        self
    }

    pub fn with_strip(mut self, strip: StripOptions) -> Self {
        self.strip = strip;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The split directories to read, in order.
    fn split_dirs(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(Error::unavailable(&self.root, "not a directory"));
        }
        let train = self.root.join(TRAIN_DIR);
        let test = self.root.join(TEST_DIR);
        if !train.is_dir() && !test.is_dir() {
            return Ok(vec![self.root.clone()]);
        }
        let wanted = match self.subset {
            Subset::Train => vec![train],
            Subset::Test => vec![test],
            Subset::All => vec![train, test],
        };
        for dir in &wanted {
            if !dir.is_dir() {
                return Err(Error::unavailable(dir, format!("missing split for subset '{}'", self.subset)));
            }
        }
        Ok(wanted)
    }

    /// Sorted entries of `dir` passing `keep`.
    fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| Error::unavailable(dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::unavailable(dir, e))?.path();
            if keep(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn dir_name(path: &Path) -> Option<String> {
        path.file_name().map(|name| name.to_string_lossy().into_owned())
    }
}

impl DatasetSource for NewsgroupsDir {
    #[instrument(skip(self), fields(root = %self.root.display(), subset = %self.subset))]
    fn load(&self) -> Result<RawDataset> {
        let splits = self.split_dirs()?;

        // category dirs per split, and the union of their names
        let mut per_split: Vec<Vec<PathBuf>> = Vec::with_capacity(splits.len());
        let mut names: BTreeSet<String> = BTreeSet::new();
        for split in &splits {
            let categories = Self::sorted_entries(split, |p| p.is_dir())?;
            names.extend(categories.iter().filter_map(|p| Self::dir_name(p)));
            per_split.push(categories);
        }
        if names.is_empty() {
            return Err(Error::unavailable(&self.root, "no category directories found"));
        }
        let labels: IndexMap<String, usize> = names
            .into_iter()
            .enumerate()
            .map(|(label, name)| (name, label))
            .collect();

        let mut dataset = RawDataset {
            category_names: labels.keys().cloned().collect(),
            ..RawDataset::default()
        };
        for categories in per_split {
            for category in categories {
                let Some(label) = Self::dir_name(&category).and_then(|n| labels.get(&n).copied()) else {
                    continue;
                };
                let posts = Self::sorted_entries(&category, |p| p.is_file())?;
                debug!(category = %category.display(), posts = posts.len(), "reading category");
                for post in posts {
                    let bytes = fs::read(&post).map_err(|e| Error::unavailable(&post, e))?;
                    dataset.texts.push(self.strip.apply(&decode_latin1(&bytes)));
                    dataset.labels.push(label);
                }
            }
        }

        info!(
            documents = dataset.len(),
            categories = dataset.category_names.len(),
            "newsgroups loaded"
        );
        Ok(dataset)
    }

    fn fingerprint(&self) -> String {
        let StripOptions { headers, footers, quotes } = self.strip;
        format!(
            "newsgroups:{}:{}:headers={headers}:footers={footers}:quotes={quotes}",
            self.root.display(),
            self.subset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "From: someone@example.com\nSubject: Re: engines\n\nIn article <1@x>, bob@y writes:\n> quoted line\nThe V8 is louder.\nI agree.\n\n--\nSig line\n";

    #[test]
    fn header_is_everything_before_first_blank_line() {
        assert_eq!(strip_header("A: b\nC: d\n\nbody\n\nmore"), "body\n\nmore");
        assert_eq!(strip_header("no blank line"), "");
    }

    #[test]
    fn footer_cut_at_last_dash_line() {
        assert_eq!(strip_footer("body\nmore\n--\nsig"), "body\nmore");
        assert_eq!(strip_footer("body\n\nmore"), "body");
        // dash line as first line keeps the text
        assert_eq!(strip_footer("---\nbody"), "---\nbody");
        assert_eq!(strip_footer("single line"), "single line");
    }

    #[test]
    fn quoting_lines_removed() {
        let text = "In article <x>, a@b writes:\n> old\n| old too\nkept\nJoe wrote: hi\nalso kept";
        assert_eq!(strip_quoting(text), "kept\nalso kept");
    }

    #[test]
    fn fingerprint_tracks_root_subset_and_strip() {
        let all = NewsgroupsDir::new("/data/20news");
        let train = all.clone().with_subset(Subset::Train);
        let raw = all.clone().with_strip(StripOptions::none());
        let elsewhere = NewsgroupsDir::new("/data/other");
        assert_eq!(all.fingerprint(), NewsgroupsDir::new("/data/20news").fingerprint());
        assert_ne!(all.fingerprint(), train.fingerprint());
        assert_ne!(all.fingerprint(), raw.fingerprint());
        assert_ne!(all.fingerprint(), elsewhere.fingerprint());
    }

    #[test]
    fn full_strip_of_post() {
        assert_eq!(StripOptions::default().apply(POST), "The V8 is louder.\nI agree.\n");
        assert_eq!(StripOptions::none().apply(POST), POST);
    }

    #[test]
    fn latin1_decoding() {
        assert_eq!(decode_latin1(&[b'c', b'a', b'f', 0xE9]), "café");
    }

    #[test]
    fn subset_parsing() {
        assert_eq!("Train".parse::<Subset>(), Ok(Subset::Train));
        assert_eq!("all".parse::<Subset>(), Ok(Subset::All));
        assert!("dev".parse::<Subset>().is_err());
        assert_eq!(Subset::Test.to_string(), "test");
    }

    fn write_post(root: &Path, split: &str, category: &str, name: &str, body: &str) {
        let dir = root.join(split).join(category);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), format!("Subject: x\n\n{body}")).unwrap();
    }

    #[test]
    fn loads_bydate_layout() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), TRAIN_DIR, "sci.space", "2", "orbit two");
        write_post(tmp.path(), TRAIN_DIR, "sci.space", "1", "orbit one");
        write_post(tmp.path(), TRAIN_DIR, "rec.autos", "7", "engine");
        write_post(tmp.path(), TEST_DIR, "sci.space", "9", "orbit test");
        write_post(tmp.path(), TEST_DIR, "alt.atheism", "3", "belief");

        let all = NewsgroupsDir::new(tmp.path()).load().unwrap();
        assert_eq!(all.category_names, vec!["alt.atheism", "rec.autos", "sci.space"]);
        assert_eq!(all.texts, vec!["engine", "orbit one", "orbit two", "belief", "orbit test"]);
        assert_eq!(all.labels, vec![1, 2, 2, 0, 2]);

        let test = NewsgroupsDir::new(tmp.path()).with_subset(Subset::Test).load().unwrap();
        assert_eq!(test.category_names, vec!["alt.atheism", "sci.space"]);
        assert_eq!(test.labels, vec![0, 1]);
    }

    #[test]
    fn flat_layout_is_one_split() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), ".", "comp.graphics", "1", "pixels");
        let raw = NewsgroupsDir::new(tmp.path()).load().unwrap();
        assert_eq!(raw.category_names, vec!["comp.graphics"]);
        assert_eq!(raw.texts, vec!["pixels"]);
    }

    #[test]
    fn missing_root_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = NewsgroupsDir::new(tmp.path().join("nope")).load().unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }

    #[test]
    fn missing_split_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), TRAIN_DIR, "sci.space", "1", "orbit");
        let err = NewsgroupsDir::new(tmp.path()).with_subset(Subset::Test).load().unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }

    #[test]
    fn empty_root_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = NewsgroupsDir::new(tmp.path()).load().unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }
}
