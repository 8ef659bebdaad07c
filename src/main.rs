use slicegrab::capture::Capture;
use slicegrab::{convert, Format, Options};
use tracing::{error, info, span, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use url::Url;

static USAGE: &str = "\
usage: slicegrab <capture.json> [--format typestyle|css] [--extract-colors]
                 [--remove-data-attributes] [--base-url URL] [--markup] [--trace|-t]";

struct Args {
    pub input: String,
    pub format: Format,
    pub extract_colors: bool,
    pub remove_data_attributes: bool,
    pub base_url: Option<Url>,
    pub markup: bool,
    pub trace: bool,
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if args.trace {
        tracing_subscriber::fmt::fmt()
            .with_span_events(FmtSpan::ACTIVE)
            .with_max_level(Level::DEBUG)
            .with_env_filter(EnvFilter::from_default_env())
            .finish()
            .init();
        info!("Logger initialized");
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();
    let args = Args {
        format: pargs.opt_value_from_str("--format")?.unwrap_or_default(),
        extract_colors: pargs.contains("--extract-colors"),
        remove_data_attributes: pargs.contains("--remove-data-attributes"),
        base_url: pargs.opt_value_from_str("--base-url")?,
        markup: pargs.contains("--markup"),
        trace: pargs.contains(["--trace", "-t"]),
        input: pargs.free_from_str()?,
    };
    Ok(args)
}

fn run(args: &Args) -> slicegrab::Result<()> {
    let text = {
        let span = span!(Level::DEBUG, "Reading capture", "{}", &args.input);
        let _enter = span.enter();
        std::fs::read_to_string(&args.input)?
    };
    let (mut tree, captured) = Capture::from_json(&text)?.build()?;
    // Flags win over what the capture was made with
    let options = Options {
        extract_colors: args.extract_colors || captured.extract_colors,
        remove_data_attributes: args.remove_data_attributes || captured.remove_data_attributes,
        base_url: args.base_url.clone().or(captured.base_url),
    };
    let backend = args.format.backend();
    let conversion = convert(&mut tree, &options, backend.as_ref())?;
    println!("{}", conversion.stylesheet);
    if args.markup {
        println!("{}", html::to_markup(&tree)?);
    }
    Ok(())
}
