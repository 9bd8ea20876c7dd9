use std::path::{Path, PathBuf};

/// Output files derived from the input file name: `{stem}-clean.csv` and friends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cleaned_csv: PathBuf,
    pub cleaned_parquet: PathBuf,
    pub annual_summary: PathBuf,
    pub comparison_chart: PathBuf,
}

impl OutputPaths {
    /// Files land in `output_dir`, or beside the input when none is given
    pub fn for_input(input: &Path, output_dir: Option<&Path>) -> Self {
        let stem = input_stem(input);
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        Self {
            cleaned_csv: dir.join(format!("{}-clean.csv", stem)),
            cleaned_parquet: dir.join(format!("{}-clean.parquet", stem)),
            annual_summary: dir.join(format!("{}-annual-summary.csv", stem)),
            comparison_chart: dir.join(format!("{}-comparison-chart.json", stem)),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            &self.cleaned_csv,
            &self.cleaned_parquet,
            &self.annual_summary,
            &self.comparison_chart,
        ]
    }
}

/// Lower-cased file stem with spaces and underscores turned into dashes
pub fn input_stem(input: &Path) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("station");

    stem.trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
