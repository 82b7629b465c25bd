use anyhow::{Context, Result, bail};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The two news corpora offered by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Fake and real news dataset, one article per CSV row.
    English,
    /// Persian news dataset, merged into a single text file.
    Persian,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::English => "English news",
            Dataset::Persian => "Persian news",
        }
    }

    pub fn source_url(&self) -> &'static str {
        match self {
            Dataset::English => "https://www.kaggle.com/clmentbisaillon/fake-and-real-news-dataset",
            Dataset::Persian => "https://bigdata-ir.com/wp-content/uploads/2019/07/news-dataset.zip",
        }
    }
}

/// Where each dataset lives on disk.
#[derive(Debug, Clone)]
pub struct Sources {
    pub english_csv: PathBuf,
    pub english_column: String,
    pub persian_txt: PathBuf,
}

impl Default for Sources {
    fn default() -> Self {
        Sources {
            english_csv: PathBuf::from("english_news/news.csv"),
            english_column: "text".to_string(),
            persian_txt: PathBuf::from("persian_news/news.txt"),
        }
    }
}

impl Sources {
    pub fn load(&self, dataset: Dataset) -> Result<String> {
        match dataset {
            Dataset::English => load_csv_column(&self.english_csv, &self.english_column),
            Dataset::Persian => load_text(&self.persian_txt),
        }
    }
}

/// Reads a whole text file.
pub fn load_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Joins every cell of the named column with single spaces.
pub fn load_csv_column<P: AsRef<Path>>(path: P, column: &str) -> Result<String> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?;
    let Some(idx) = headers.iter().position(|h| h == column) else {
        bail!("column '{column}' not found in {}", path.display());
    };

    let mut cells: Vec<String> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("malformed record {} in {}", line + 1, path.display()))?;
        cells.push(record.get(idx).unwrap_or_default().to_string());
    }

    Ok(cells.join(" "))
}

/// Appends the contents of every file below `dir` to `output`, one file per
/// line, and returns how many files were merged. Files are visited in path
/// order so the result is reproducible.
pub fn merge_dir<P: AsRef<Path>, Q: AsRef<Path>>(dir: P, output: Q, verbose: i32) -> Result<usize> {
    let mut files = Vec::new();
    collect_files(dir.as_ref(), &mut files)?;
    files.sort();

    let output = output.as_ref();
    let out = File::options()
        .create(true)
        .append(true)
        .open(output)
        .with_context(|| format!("failed to open {}", output.display()))?;
    let mut writer = BufWriter::new(out);

    for path in &files {
        if verbose > 1 {
            eprintln!("merging {}", path.display());
        }
        let text = load_text(path)?;
        writer.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;

    Ok(files.len())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
