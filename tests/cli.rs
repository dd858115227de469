use argh::FromArgs;
use hbmgen::{cmdline::Opts, driver};
use hbmgen_backend::BackendOpt;
use hbmgen_ir::{PortRange, SelectMode};
use hbmgen_utils::{ErrorKind, OutputFile};
use std::path::PathBuf;

fn opts(args: &[&str]) -> Opts {
    Opts::from_args(&["hbmgen"], args).unwrap()
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hbmgen-{}-{name}", std::process::id()))
}

#[test]
fn defaults() {
    let opts = opts(&[]);
    assert_eq!(opts.backend, BackendOpt::MuxDemux);
    assert_eq!(opts.output, OutputFile::Stdout);
    assert_eq!(opts.log_level, log::LevelFilter::Warn);
    assert!(opts.extra_opts.is_empty());
    assert!(!opts.list && !opts.dump_config);
}

#[test]
fn parses_every_option() {
    let opts = opts(&[
        "-b",
        "sideband-tieoff",
        "--first",
        "3",
        "--last",
        "4",
        "-x",
        "clk-domain=sys_clk",
        "-o",
        "<null>",
        "--log",
        "debug",
    ]);
    assert_eq!(opts.backend, BackendOpt::SidebandTieoff);
    assert_eq!(opts.first, Some(3));
    assert_eq!(opts.last, Some(4));
    assert_eq!(opts.extra_opts, ["clk-domain=sys_clk"]);
    assert_eq!(opts.output, OutputFile::Null);
    assert_eq!(opts.log_level, log::LevelFilter::Debug);
}

#[test]
fn unknown_backend_is_rejected() {
    assert!(Opts::from_args(&["hbmgen"], &["-b", "systemverilog"]).is_err());
}

#[test]
fn range_override_applies_to_selected_backend() {
    let conf = opts(&["-b", "hbm-inst", "--first", "2", "--last", "3"])
        .config()
        .unwrap();
    assert_eq!(conf.ranges.hbm_inst, PortRange::new(2, 3).unwrap());
    assert_eq!(conf.ranges.mux, PortRange::new(0, 15).unwrap());
    assert_eq!(conf.remap_offset(), 14);
}

#[test]
fn inverted_range_is_rejected() {
    let err = opts(&["--first", "5", "--last", "2"]).config().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidRange(_)));
}

#[test]
fn extra_opts_are_applied() {
    let conf = opts(&["-x", "select=per-port", "-x", "data-width=512"])
        .config()
        .unwrap();
    assert_eq!(conf.select.mode, SelectMode::PerPort);
    assert_eq!(conf.bus.data, 512);

    let err = opts(&["-x", "data-width"]).config().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidOption(_)));
    let err = opts(&["-x", "colour=blue"]).config().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidOption(_)));
}

#[test]
fn oversized_burst_length_width_is_rejected() {
    let path = scratch("burst.v");
    let out = path.to_string_lossy().to_string();
    let res = driver::run(&opts(&[
        "-b",
        "axi-meta",
        "-x",
        "burst-len-width=32",
        "-o",
        &out,
    ]));
    let err = res.unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidOption(_)));
    assert!(!path.exists());
}

#[test]
fn generates_into_file() {
    let path = scratch("sideband.v");
    let out = path.to_string_lossy().to_string();
    driver::run(&opts(&[
        "-b",
        "sideband-ports",
        "--first",
        "1",
        "--last",
        "2",
        "-o",
        &out,
    ]))
    .unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(text.contains("input  wire [2:0] AXI_01_ARPROT,"));
    assert!(text.contains("input  wire [3:0] AXI_02_AWQOS,"));
    assert!(!text.contains("AXI_03"));
}

#[test]
fn failed_generation_writes_nothing() {
    let path = scratch("never.vhd");
    let out = path.to_string_lossy().to_string();
    let res = driver::run(&opts(&["--first", "9", "--last", "1", "-o", &out]));
    assert!(res.is_err());
    assert!(!path.exists());
}

#[test]
fn lists_backends() {
    let path = scratch("list.txt");
    let out = path.to_string_lossy().to_string();
    driver::run(&opts(&["--list", "-o", &out])).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(text.starts_with("- axi-meta\n"));
    assert!(text.contains("- mux-demux\n"));
    assert_eq!(text.lines().count(), BackendOpt::all().count());
}

#[test]
fn dumps_config_as_json() {
    let path = scratch("config.json");
    let out = path.to_string_lossy().to_string();
    driver::run(&opts(&[
        "--dump-config",
        "-x",
        "window-size=4096",
        "-b",
        "ip-xact",
        "--last",
        "7",
        "-o",
        &out,
    ]))
    .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(json["window_size"], 4096);
    assert_eq!(json["bus"]["data"], 256);
    assert_eq!(json["ranges"]["ip_xact"]["last"], 7);
}
