use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use blog_cards::app::RunOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "blog-cards - Render filterable blog post cards from a CSV listing.

  --version, -V          Show version and exit
  --help,    -h          Show this help message
  --config PATH          Read configuration from PATH
  --source PATH|URL      Data file (overrides data-csv-path and the configured default)
  --topic NAME           Select a topic before rendering
  --overflow             Select the topic through the \"More topics\" menu
  --expand               Activate the \"View all\" card
  --output PATH          Write the HTML to PATH instead of stdout";

enum Command {
    Version,
    Help,
    Render(RunOptions),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_cards=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_args(&args).and_then(|command| match command {
        Command::Version => {
            println!("blog-cards {}", blog_cards::VERSION);
            Ok(())
        }
        Command::Help => {
            println!("{HELP}");
            Ok(())
        }
        Command::Render(opts) => blog_cards::run(opts),
    });

    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut opts = RunOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            "--config" => opts.config_file = Some(PathBuf::from(value(&mut iter, arg)?)),
            "--source" => opts.source = Some(value(&mut iter, arg)?),
            "--topic" => opts.topic = Some(value(&mut iter, arg)?),
            "--overflow" => opts.via_overflow = true,
            "--expand" => opts.expand = true,
            "--output" => opts.output = Some(PathBuf::from(value(&mut iter, arg)?)),
            other => bail!("unknown argument {other:?} (see --help)"),
        }
    }
    if opts.via_overflow && opts.topic.is_none() {
        bail!("--overflow requires --topic");
    }
    Ok(Command::Render(opts))
}

fn value<'a, I>(iter: &mut I, flag: &str) -> Result<String>
where
    I: Iterator<Item = &'a String>,
{
    iter.next()
        .cloned()
        .with_context(|| format!("{flag} requires a value"))
}
