#[macro_use]
extern crate log;

use clap::Parser;

use std::path::PathBuf;

/// PlayStation emulator frontend with debugging tools.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Start in fullscreen.
    #[arg(short, long)]
    fullscreen: bool,

    /// Config file to use instead of the default one.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// BIOS image, overrides the one in the config file.
    #[arg(short, long, value_name = "FILE")]
    bios: Option<PathBuf>,

    /// Disc image to insert.
    #[arg(short, long, value_name = "FILE")]
    iso: Option<PathBuf>,

    /// PS-X EXE to sideload.
    #[arg(short, long, value_name = "FILE")]
    exe: Option<PathBuf>,

    /// Start running right away.
    #[arg(short, long)]
    run: bool,
}

fn main() {
    let args = Args::parse();
    let logs = pxs_front::init_logger();

    let options = pxs_front::Options {
        fullscreen: args.fullscreen,
        config: args.config,
        bios: args.bios,
        iso: args.iso,
        exe: args.exe,
        run: args.run,
        logs,
    };

    if let Err(err) = pxs_front::run(options) {
        error!("{err}");
        std::process::exit(1);
    }
}
