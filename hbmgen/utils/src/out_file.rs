use std::{
    fmt,
    io::{self, BufWriter},
    path::PathBuf,
    str::FromStr,
};

/// Possible choices for output streams. Used by the `-o` option to the driver.
/// * "-" and "<out>" are treated as stdout.
/// * "<err>" is treated as stderr.
/// * "<null>" is treated as a null output stream.
/// * All other strings are treated as file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFile {
    Null,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl OutputFile {
    pub fn file(path: PathBuf) -> Self {
        OutputFile::File(path)
    }

    pub fn as_path_string(&self) -> String {
        match self {
            OutputFile::Null => "<null>".to_string(),
            OutputFile::Stdout => "<stdout>".to_string(),
            OutputFile::Stderr => "<stderr>".to_string(),
            OutputFile::File(path) => path.to_string_lossy().to_string(),
        }
    }

    /// Open a buffered writer for this stream. Files are created (or
    /// truncated) on every call.
    pub fn get_write(&self) -> io::Result<Box<dyn io::Write>> {
        Ok(match self {
            OutputFile::Stdout => Box::new(BufWriter::new(io::stdout())),
            OutputFile::Stderr => Box::new(BufWriter::new(io::stderr())),
            OutputFile::File(path) => {
                Box::new(BufWriter::new(std::fs::File::create(path)?))
            }
            OutputFile::Null => Box::new(io::sink()),
        })
    }
}

impl FromStr for OutputFile {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "-" | "<out>" => Ok(OutputFile::Stdout),
            "<err>" => Ok(OutputFile::Stderr),
            "<null>" => Ok(OutputFile::Null),
            "" => Err("output path cannot be empty".to_string()),
            _ => Ok(OutputFile::file(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for OutputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFile::Stdout => write!(f, "-"),
            OutputFile::Stderr => write!(f, "<err>"),
            OutputFile::Null => write!(f, "<null>"),
            OutputFile::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn special_names() {
        assert_eq!("-".parse::<OutputFile>(), Ok(OutputFile::Stdout));
        assert_eq!("<out>".parse::<OutputFile>(), Ok(OutputFile::Stdout));
        assert_eq!("<err>".parse::<OutputFile>(), Ok(OutputFile::Stderr));
        assert_eq!("<null>".parse::<OutputFile>(), Ok(OutputFile::Null));
        assert!("".parse::<OutputFile>().is_err());
    }

    #[test]
    fn paths_round_trip_through_display() {
        let out: OutputFile = "gen/hbm_glue.vhd".parse().unwrap();
        assert_eq!(out, OutputFile::file(PathBuf::from("gen/hbm_glue.vhd")));
        assert_eq!(out.to_string(), "gen/hbm_glue.vhd");
    }

    #[test]
    fn null_sink_accepts_writes() {
        let mut w = OutputFile::Null.get_write().unwrap();
        assert!(w.write_all(b"-- nothing\n").is_ok());
    }
}
