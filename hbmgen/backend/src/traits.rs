use hbmgen_ir::{HbmConfig, RangeKey};
use hbmgen_utils::{Error, GenResult, OutputFile};
use std::io::Write;

/// A generator for one family of boilerplate text.
pub trait Backend {
    /// The name of this backend.
    fn name(&self) -> &'static str;

    /// The entry of the config's range table this backend expands over.
    fn range_key(&self) -> RangeKey;

    /// Validate the configuration and the static tables used by this
    /// backend. Returns an Err(..) if the range is empty or a name is missing
    /// from a table.
    fn validate(&self, conf: &HbmConfig) -> GenResult<()> {
        conf.ranges.get(self.range_key()).checked()?;
        Ok(())
    }

    /// Write the generated text to `out`.
    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()>;

    /// Convenience function to validate and emit into `file`. The text is
    /// rendered in memory first so a failing backend writes nothing.
    fn run(&self, conf: &HbmConfig, file: &OutputFile) -> GenResult<()> {
        let text = self.render(conf)?;
        let mut out = file.get_write()?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        log::info!(
            "{}: wrote {} lines to {}",
            self.name(),
            text.lines().count(),
            file.as_path_string()
        );
        Ok(())
    }

    /// Validate and emit into a string.
    fn render(&self, conf: &HbmConfig) -> GenResult<String> {
        self.validate(conf)?;
        let mut buf = Vec::new();
        self.emit(conf, &mut buf)?;
        String::from_utf8(buf).map_err(|e| {
            Error::write_error(format!("{} produced invalid UTF-8: {e}", self.name()))
        })
    }
}
