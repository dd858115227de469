//! The template expander: one block of text per port index.
use hbmgen_ir::{PortIdx, PortRange};
use hbmgen_utils::GenResult;
use std::io::{self, Write};

/// The rendered text for a single port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    port: PortIdx,
    lines: Vec<String>,
}

impl Block {
    pub fn new(port: PortIdx) -> Self {
        Self {
            port,
            lines: Vec::new(),
        }
    }

    pub fn port(&self) -> PortIdx {
        self.port
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line<S: Into<String>>(&mut self, line: S) {
        self.lines.push(line.into());
    }

    /// Add a blank separator line.
    pub fn gap(&mut self) {
        self.lines.push(String::new());
    }

    /// The block as text, every line terminated by a newline.
    pub fn text(&self) -> String {
        self.lines.iter().fold(String::new(), |mut acc, line| {
            acc.push_str(line);
            acc.push('\n');
            acc
        })
    }
}

/// Expands a per-port template over an inclusive range of ports.
///
/// The expander is a pure function of the range and the render closure:
/// blocks come back in ascending port order and expanding twice yields the
/// same blocks.
pub struct Expander {
    range: PortRange,
}

impl Expander {
    pub fn new(range: PortRange) -> Self {
        Self { range }
    }

    /// Produce one value per port. Fails on an empty range or on the first
    /// failing port.
    pub fn map<T, F>(&self, f: F) -> GenResult<Vec<T>>
    where
        F: FnMut(PortIdx) -> GenResult<T>,
    {
        self.range.checked()?.iter().map(f).collect()
    }

    /// Render one [Block] per port.
    pub fn expand<F>(&self, mut render: F) -> GenResult<Vec<Block>>
    where
        F: FnMut(PortIdx, &mut Block) -> GenResult<()>,
    {
        self.map(|port| {
            let mut block = Block::new(port);
            render(port, &mut block)?;
            log::debug!(
                "expanded {} into {} lines",
                port.axi(),
                block.lines.len()
            );
            Ok(block)
        })
    }
}

/// Write `lines`, each terminated by a newline.
pub fn write_lines<S: AsRef<str>>(
    out: &mut dyn Write,
    lines: &[S],
) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    Ok(())
}

/// Write every block in order.
pub fn write_blocks(out: &mut dyn Write, blocks: &[Block]) -> io::Result<()> {
    for block in blocks {
        write_lines(out, block.lines())?;
    }
    Ok(())
}
