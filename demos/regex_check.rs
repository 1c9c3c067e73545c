//! Checks a subject string against a handful of built-in patterns.
//!
//! For every pattern this prints the matching verdict (must/may/never) and
//! the over- and under-approximated length of its language.
//!
//! Run with:
//! ```bash
//! cargo run --example regex_check -- "user@example.com"
//! cargo run --example regex_check -- --backward --dot "abc"
//! ```

use clap::Parser;
use log::info;
use regex_absint::generating::generate;
use regex_absint::interpreter::Direction;
use regex_absint::length::LengthDomain;
use regex_absint::matching::check_match;
use regex_absint::pattern::Element;
use regex_absint::positions::{PositionDomain, Subject};
use regex_absint::ranges::CharRanges;

#[derive(Debug, Parser)]
#[command(author, version, about = "Abstract matching of built-in regex patterns")]
struct Cli {
    /// Subject string to match against
    #[arg(default_value = "user@example.com")]
    subject: String,

    /// Interpret patterns backward over the reversed subject
    #[arg(long)]
    backward: bool,

    /// Print each pattern as a Graphviz graph
    #[arg(long)]
    dot: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn patterns() -> color_eyre::Result<Vec<(&'static str, Element)>> {
    let lower = CharRanges::range('a', 'z')?;
    let word = lower
        .union(&CharRanges::range('A', 'Z')?)
        .union(&CharRanges::range('0', '9')?)
        .union(&CharRanges::from_chars(['_', '.']));

    Ok(vec![
        (
            "email",
            Element::concat([
                Element::start(),
                Element::plus(Element::class(word.clone())),
                Element::char('@'),
                Element::plus(Element::class(word)),
                Element::end(),
            ]),
        ),
        (
            "lowercase",
            Element::concat([Element::start(), Element::star(Element::class(lower.clone())), Element::end()]),
        ),
        (
            "short-word",
            Element::concat([
                Element::start(),
                Element::repeat(Element::class(lower.clone()), 1, Some(4))?,
                Element::end(),
            ]),
        ),
        ("contains-abc", Element::literal("abc")),
        (
            "opaque-tail",
            Element::concat([Element::plus(Element::class(lower)), Element::unknown(Element::literal(".com"))]),
        ),
    ])
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        cli.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let (direction, subject) = if cli.backward {
        (Direction::Backward, Subject::new(&cli.subject).reversed())
    } else {
        (Direction::Forward, Subject::new(&cli.subject))
    };
    info!("Checking {:?} ({:?})", cli.subject, direction);

    println!(
        "{:>14} {:>8} {:>12} {:>12}  {}",
        "Name", "Verdict", "Over", "Under", "Pattern"
    );
    println!("{}", "-".repeat(80));

    for (name, pattern) in patterns()? {
        let verdict = check_match(&PositionDomain, &subject, &pattern, direction)?;
        let over = generate(&LengthDomain, &pattern, false)?;
        let under = generate(&LengthDomain, &pattern, true)?;

        println!(
            "{:>14} {:>8} {:>12} {:>12}  {}",
            name,
            format!("{:?}", verdict),
            over.to_string(),
            under.to_string(),
            pattern
        );

        if cli.dot {
            println!("{}", pattern.to_dot()?);
        }
    }

    Ok(())
}
