use structopt::StructOpt;
use structopt::clap::{AppSettings, ErrorKind};
use pbr_ibl::core::pbrt::{Float, Options, get_progress_bar, set_quiet};
use pbr_ibl::core::stats::{report_stats, print_stats};
use pbr_ibl::core::interactor::RenderWindowInteractor;
use pbr_ibl::scenes::pbrhdrenvironment::{SceneSettings, build, load_environment_texture};
use pbr_ibl::testing::regression::{Testing, RegressionResult, DEFAULT_THRESHOLD, exit_code};
use pbr_ibl::init_stats;
use std::path::PathBuf;
use num_cpus;
use anyhow::Result;
use fern::colors::{ColoredLevelConfig, Color};
use fern::Output;
use log::{info, debug, error};
use std::io::Write;

#[derive(StructOpt, Debug)]
#[structopt(name = "pbr-hdr-environment", setting = AppSettings::DisableVersion)]
struct Args {
    /// set LOG verbosity
    #[structopt(short, long)]
    verbose: bool,

    /// Directory that the log file is written to. No log file when unset.
    #[structopt(short, long, parse(from_os_str))]
    logdir: Option<PathBuf>,

    /// Suppress all text output other than error messages
    #[structopt(short, long)]
    quiet: bool,

    /// Use specified number of threads for rendering
    #[structopt(short, long, default_value = "0")]
    nthreads: u8,

    /// Divide bake sizes and sample counts by 4
    #[structopt(long)]
    quick: bool,

    /// Baseline image to compare the rendered frame against
    #[structopt(short = "V", long, parse(from_os_str))]
    valid_image: Option<PathBuf>,

    /// Directory the test, diff and baseline images are written to on failure.
    /// Default: system temp directory (e.g $TMPDIR or /tmp).
    #[structopt(short = "T", long, parse(from_os_str))]
    temp_dir: Option<PathBuf>,

    /// Start the interactor after the image comparison
    #[structopt(short = "I", long)]
    interactive: bool,

    /// Largest mean image difference that still passes
    #[structopt(long, default_value = "0.05")]
    threshold: Float,

    #[structopt(short, long, parse(from_os_str))]
    /// Write the final image to the given filename
    outfile: Option<PathBuf>,

    #[structopt(parse(from_os_str))]
    /// HDR environment image
    input: PathBuf
}

fn setup_logging(verbose: bool, logdir: Option<PathBuf>, stderr: bool) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow);
    let clevel = colors.clone().info(Color::Green);

    let mut base_config = fern::Dispatch::new();

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    base_config = base_config.level(level);

    if let Some(dir) = logdir {
        let file_config = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}] {}",
                    record.level(),
                    message
                ))
            })
            .chain(fern::log_file(dir.join("pbr-hdr-environment.log"))?);

        base_config = base_config.chain(file_config);
    }

    let stderr_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{color_line}[{level}] {message}\x1B[0m",
                color_line = format_args!("\x1B[{}m", colors.get_color(&record.level()).to_fg_str()),
                level = clevel.color(record.level()),
                message = message,
            ));
        })
        .level(if stderr { level } else { log::LevelFilter::Error })
        .chain(
            Output::call(|record| {
                if let Some(pb) = get_progress_bar() {
                    pb.println(record.args().to_string());
                } else {
                    writeln!(std::io::stderr(), "{}", record.args()).ok();
                }
            })

        );

    base_config = base_config.chain(stderr_config);
    base_config.apply()?;

    Ok(())
}

fn parse_args() -> std::result::Result<Args, i32> {
    let prog = std::env::args().next().unwrap_or_else(|| "pbr-hdr-environment".to_owned());

    match Args::from_iter_safe(std::env::args_os()) {
        Ok(args) => Ok(args),
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => {
                println!("{}", e.message);
                Err(0)
            }
            ErrorKind::MissingRequiredArgument => {
                println!("Usage: {} <hdr file>", prog);
                Err(1)
            }
            _ => {
                eprintln!("{}", e.message);
                Err(1)
            }
        }
    }
}

fn run() -> i32 {
    let args = match parse_args() {
        Ok(a) => a,
        Err(code) => return code
    };

    let mut opts = Options::new();
    opts.nthreads = args.nthreads as usize;
    opts.quick_render = args.quick;
    opts.quiet = args.quiet;
    opts.interactive = args.interactive;
    opts.image_file = args.outfile;

    if let Err(e) = setup_logging(args.verbose, args.logdir, !opts.quiet) {
        eprintln!("Unable to set up logging: {:#}", e);
        return 1;
    }

    let nthreads = match opts.nthreads {
        0 => num_cpus::get(),
        n => n
    };

    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(nthreads).build_global() {
        error!("Unable to configure the thread pool: {}", e);
    }

    set_quiet(opts.quiet);
    // Initialize statistics counter
    init_stats();

    let texture = match load_environment_texture(&args.input) {
        Ok(t) => t,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    let settings = if opts.quick_render { SceneSettings::quick() } else { SceneSettings::default() };
    debug!("Scene settings {:?}", settings);

    let mut window = build(texture, &settings);
    window.render();

    if let Some(ref f) = opts.image_file {
        if let Err(e) = window.film().write_image(f) {
            error!("{:#}", e);
        }
    }

    let testing = Testing {
        valid_image: args.valid_image,
        temp_dir: args.temp_dir.unwrap_or_else(std::env::temp_dir),
        interactive: opts.interactive,
        threshold: if args.threshold >= 0.0 { args.threshold } else { DEFAULT_THRESHOLD },
        ..Testing::default()
    };

    let result = testing.regression_test_image(&window);
    info!("Regression result {:?}", result);

    if result == RegressionResult::DoInteractor {
        RenderWindowInteractor::new(&mut window).start();
    }

    report_stats();
    debug!("{}", print_stats());

    exit_code(result)
}

fn main() {
    std::process::exit(run());
}
