use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use sabermap_model::{
    Beatmap, Difficulty,
    loader::{self, LoadOptions},
};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes `header` and `rows` as CSV.
    pub fn write_csv<H, R, F>(&mut self, header: H, rows: R) -> anyhow::Result<()>
    where
        H: IntoIterator,
        H::Item: AsRef<[u8]>,
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: AsRef<[u8]>,
    {
        let display_path = self.display_path();
        let mut writer = csv::Writer::from_writer(&mut *self);
        writer
            .write_record(header)
            .with_context(|| format!("Failed to write CSV header to {display_path}"))?;
        for row in rows {
            writer
                .write_record(row)
                .with_context(|| format!("Failed to write CSV row to {display_path}"))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {display_path}"))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;
    Ok(value)
}

/// Loads a difficulty file, taking the difficulty from its file name unless
/// `options` already names one.
pub fn load_map_file(path: &Path, options: &LoadOptions) -> anyhow::Result<Beatmap> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map file: {}", path.display()))?;
    let options = LoadOptions {
        difficulty: options.difficulty.or_else(|| difficulty_of(path)),
        ..options.clone()
    };
    let map = loader::load_from_str(&json, &options)
        .with_context(|| format!("Failed to load map file: {}", path.display()))?;
    log::info!(
        "Loaded {} ({} notes, {} bombs, {} obstacles at {} BPM)",
        path.display(),
        map.notes().len(),
        map.bombs().len(),
        map.obstacles().len(),
        map.bpm()
    );
    Ok(map)
}

pub fn difficulty_of(path: &Path) -> Option<Difficulty> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(Difficulty::from_file_name)
}
