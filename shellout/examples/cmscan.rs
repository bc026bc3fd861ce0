//! Wraps Infernal's `cmscan` to scan a sequence file against a covariance
//! model database: `cargo run --example cmscan -- <db.cm> <query.fa>`.

#![allow(clippy::print_stdout, clippy::print_stderr, reason = "example output")]

use std::error::Error;

use shellout::{InvokeSpec, Param, Parameters, Tool, Value};

fn cmscan() -> Result<Tool, shellout::ShelloutError> {
    let params = Parameters::new([
        Param::option_as("--tblout", "out")?
            .with_help("save parseable table of hits to file"),
        Param::option("--cpu")?
            .with_value(1)?
            .with_help("number of parallel CPU workers to use for multithreads"),
        Param::positional("db").with_help("HMM/CM database file"),
        Param::positional("query").with_help("input sequence to scan"),
    ])?;
    Ok(Tool::new("cmscan", params)
        .with_version("1.1.2")
        .with_url("http://eddylab.org/infernal"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(db), Some(query)) = (args.next(), args.next()) else {
        eprintln!("usage: cmscan <db.cm> <query.fa>");
        std::process::exit(2);
    };

    let mut tool = cmscan()?;
    tool.update([("db", Value::from(db)), ("query", Value::from(query))])?;
    println!("running: {tool}");

    let mut run = tool.invoke(
        [("out", Value::from("hits.tbl"))],
        InvokeSpec::default(),
    )?;
    run.ensure_success()?;
    println!("{}", run.read_stdout()?);
    println!("parseable hit table written to hits.tbl");
    Ok(())
}
