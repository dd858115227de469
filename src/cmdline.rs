//! Command line parsing for the hbmgen driver.
use argh::FromArgs;
use hbmgen_backend::BackendOpt;
use hbmgen_ir::HbmConfig;
use hbmgen_utils::{GenResult, OutputFile};

#[derive(FromArgs, Debug)]
#[argh(help_triggers("-h", "--help"))]
/// Generate Verilog, VHDL and IP-XACT boilerplate for a range of HBM AXI ports.
pub struct Opts {
    /// generator to run
    #[argh(
        option,
        short = 'b',
        long = "backend",
        default = "BackendOpt::default()"
    )]
    pub backend: BackendOpt,

    /// output file, default is stdout
    #[argh(
        option,
        short = 'o',
        long = "output",
        default = "OutputFile::Stdout"
    )]
    pub output: OutputFile,

    /// first port of the range, replacing the generator's default
    #[argh(option)]
    pub first: Option<u32>,

    /// last port of the range (inclusive), replacing the generator's default
    #[argh(option)]
    pub last: Option<u32>,

    /// override a constant of the configuration (key=value)
    #[argh(option, short = 'x', long = "extra-opt")]
    pub extra_opts: Vec<String>,

    /// list all generators
    #[argh(switch, long = "list")]
    pub list: bool,

    /// print the effective configuration as JSON instead of generating
    #[argh(switch, long = "dump-config")]
    pub dump_config: bool,

    /// logging level
    #[argh(option, long = "log", default = "log::LevelFilter::Warn")]
    pub log_level: log::LevelFilter,
}

impl Opts {
    /// Parse the process arguments. Exits on malformed input.
    pub fn get_opts() -> Opts {
        argh::from_env()
    }

    /// The configuration selected by the command line: defaults, then `-x`
    /// overrides, then the range of the selected generator.
    pub fn config(&self) -> GenResult<HbmConfig> {
        let mut conf = HbmConfig::default();
        conf.apply_extra_opts(&self.extra_opts)?;

        let range = conf.ranges.get_mut(self.backend.backend().range_key());
        if let Some(first) = self.first {
            *range = range.with_first(first);
        }
        if let Some(last) = self.last {
            *range = range.with_last(last);
        }
        range.checked()?;
        Ok(conf)
    }

    /// Run the selected generator into the output file.
    pub fn run_backend(&self, conf: &HbmConfig) -> GenResult<()> {
        self.backend.backend().run(conf, &self.output)
    }
}
