use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use spectrum_analyzer::{AnalyzerConfig, Session};

const USAGE: &str = "\
commands:
  open <folder>       import every measurement file in <folder>
  click <x> <y>       pick a point on the spectrum
  integrate           integrate between the last two picked points
  background          subtract the line through the last two picked points
  plot                print the spectrum as x y pairs
  clear               drop the current spectrum
  save <file.csv>     write the spectrum as CSV
  report              print the last import report as JSON
  help                explain the workflow
  quit";

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => AnalyzerConfig::from_json_file(Path::new(&path))?,
        None => AnalyzerConfig::default(),
    };
    let mut session = Session::new(config);

    println!("Spectrum analyzer, type 'help' or '?' for commands");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush().context("flushing stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("reading stdin")? == 0 {
            break;
        }
        match run_command(&mut session, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{e:#}"),
        }
        for msg in session.take_messages() {
            println!("{msg}");
        }
    }
    Ok(())
}

/// Execute one shell line. Returns `false` when the user asked to quit.
fn run_command(session: &mut Session, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(true);
    };
    let rest: Vec<&str> = parts.collect();

    match command {
        "open" => {
            let folder = PathBuf::from(rest.join(" "));
            if folder.as_os_str().is_empty() {
                bail!("usage: open <folder>");
            }
            session.open_folder(&folder);
        }
        "click" => {
            let [x, y] = rest.as_slice() else {
                bail!("usage: click <x> <y>");
            };
            let x: f64 = x.parse().with_context(|| format!("'{x}' is not a number"))?;
            let y: f64 = y.parse().with_context(|| format!("'{y}' is not a number"))?;
            session.pick_point(x, y);
        }
        "integrate" => {
            session.integrate();
        }
        "background" => {
            session.remove_background();
        }
        "plot" => {
            for [x, y] in session.plot_points() {
                println!("{x} {y}");
            }
        }
        "clear" => session.clear(),
        "save" => {
            let [path] = rest.as_slice() else {
                bail!("usage: save <file.csv>");
            };
            session.save_csv(Path::new(path));
        }
        "report" => match session.last_report() {
            Some(report) => {
                let json = serde_json::to_string_pretty(report).context("serializing report")?;
                println!("{json}");
            }
            None => println!("Nothing imported yet"),
        },
        "help" => session.help(),
        "?" => println!("{USAGE}"),
        "quit" | "exit" => return Ok(false),
        other => bail!("Unknown command '{other}'\n{USAGE}"),
    }
    Ok(true)
}
