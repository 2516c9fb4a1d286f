use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use gridlogic::puzzle::{build_truth_table, format_truth_table};
use gridlogic::{generate_puzzle, Circuit, ComponentKind, Point, Puzzle, PuzzleSet, SimConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "gridlogic", version, about = "Grid logic simulator + puzzle checker")]
struct Cli {
    /// JSON simulation settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the two-input AND example and check it.
    Demo {
        /// Also write the circuit here.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print a generated puzzle.
    Puzzle {
        /// Print the three puzzles of this day instead.
        #[arg(long)]
        day: Option<u64>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        level: u8,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Check a saved circuit against a puzzle.
    Check {
        #[arg(long)]
        circuit: PathBuf,
        /// Puzzle JSON file; otherwise one is generated from seed and level.
        #[arg(long)]
        puzzle: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        level: u8,
    },
    /// Tick a saved circuit and print its outputs.
    Run {
        #[arg(long)]
        circuit: PathBuf,
        #[arg(long, default_value_t = 20)]
        ticks: u64,
        /// Toggle the part at `x,y` before running. Repeatable.
        #[arg(long)]
        toggle: Vec<String>,
    },
    /// Promote a saved circuit into a chip definition.
    Chip {
        #[arg(long)]
        circuit: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    match cli.command {
        Commands::Demo { save } => demo(config, save.as_deref())?,
        Commands::Puzzle {
            day,
            seed,
            level,
            json,
        } => {
            let puzzles: Vec<Puzzle> = match day {
                Some(day) => PuzzleSet::for_day(day).iter().cloned().collect(),
                None => vec![generate_puzzle(seed, level)],
            };
            for puzzle in &puzzles {
                if json {
                    println!("{}", serde_json::to_string_pretty(puzzle)?);
                } else {
                    print_puzzle(puzzle);
                }
            }
        }
        Commands::Check {
            circuit,
            puzzle,
            seed,
            level,
        } => {
            let puzzle: Puzzle = match puzzle {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str(&text)?
                }
                None => generate_puzzle(seed, level),
            };
            let mut circuit = load_circuit(config, &circuit)?;
            let report = circuit.check_truth_table(&puzzle);
            if report.solved {
                println!("SOLVED puzzle={}", puzzle.id);
            } else {
                println!(
                    "NOT SOLVED puzzle={} failing_rows={:?}",
                    puzzle.id, report.failing_rows
                );
            }
        }
        Commands::Run {
            circuit,
            ticks,
            toggle,
        } => {
            let mut circuit = load_circuit(config, &circuit)?;
            for spec in &toggle {
                let at = parse_point(spec)?;
                if !circuit.toggle_at(at) {
                    return Err(anyhow!("nothing to toggle at {}", at));
                }
            }
            circuit.start();
            while circuit.is_running() && circuit.tick_count() < ticks {
                circuit.frame();
                println!("tick {:>4} {}", circuit.tick_count(), observed(&circuit));
            }
            circuit.pause();
        }
        Commands::Chip { circuit, name, out } => {
            let mut circuit = load_circuit(config, &circuit)?;
            let def = circuit.create_chip(&name)?;
            println!(
                "chip name={} inputs={} outputs={} depth={} hash={}",
                def.name,
                def.inputs.len(),
                def.outputs.len(),
                def.depth(),
                def.hash()
            );
            if let Some(out) = out {
                fs::write(&out, serde_json::to_string_pretty(&def)?)?;
                println!("definition written to {}", out.display());
            }
        }
    }
    Ok(())
}

fn load_circuit(config: SimConfig, path: &Path) -> Result<Circuit> {
    let mut circuit = Circuit::with_config(config);
    let summary = circuit.load_from(path)?;
    info!(
        components = summary.components,
        wires = summary.wires,
        skipped = summary.skipped,
        "loaded {}",
        path.display()
    );
    Ok(circuit)
}

fn parse_point(text: &str) -> Result<Point> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| anyhow!("expected x,y but got `{}`", text))?;
    Ok(Point::snapped(x.trim().parse()?, y.trim().parse()?))
}

/// Named output pins and LEDs, in list order.
fn observed(circuit: &Circuit) -> String {
    let mut parts = Vec::new();
    for (idx, c) in circuit.components().iter().enumerate() {
        match c.kind() {
            ComponentKind::OutputPin => parts.push(format!(
                "{}={}",
                c.pin_id().filter(|id| !id.is_empty()).unwrap_or("out"),
                u8::from(c.value().unwrap_or(false))
            )),
            ComponentKind::Led => parts.push(format!(
                "led{}={}",
                idx,
                u8::from(c.is_on().unwrap_or(false))
            )),
            _ => {}
        }
    }
    parts.join(" ")
}

fn print_puzzle(puzzle: &Puzzle) {
    println!("{} [{}]", puzzle.title, puzzle.id);
    println!("{}", puzzle.description);
    println!();
    println!("{}", format_truth_table(puzzle));
    println!();
    println!("hint: {}", puzzle.hint);
    println!();
}

fn demo(config: SimConfig, save: Option<&Path>) -> Result<()> {
    let mut circuit = Circuit::with_config(config);
    let at = |x, y| Point::new(x, y);
    circuit
        .add_component("AND", at(100, 100))
        .ok_or_else(|| anyhow!("AND gate unavailable"))?;
    for (name, kind, pos) in [
        ("A", "InputPin", at(40, 100)),
        ("B", "InputPin", at(40, 140)),
        ("Q", "OutputPin", at(160, 100)),
    ] {
        let idx = circuit
            .add_component(kind, pos)
            .ok_or_else(|| anyhow!("{} unavailable", kind))?;
        circuit.name_pin(idx, name);
    }
    circuit.add_wire(at(50, 100), at(70, 90));
    circuit.add_wire(at(50, 140), at(70, 110));
    circuit.add_wire(at(130, 100), at(150, 100));

    println!("A B | Q");
    for (a, b) in [(false, false), (true, false), (false, true), (true, true)] {
        circuit.set_pin_value("A", a);
        circuit.set_pin_value("B", b);
        circuit.update();
        println!(
            "{} {} | {}",
            u8::from(a),
            u8::from(b),
            u8::from(circuit.output_value("Q"))
        );
    }

    let mut puzzle = generate_puzzle(0, 1);
    puzzle.id = "and-gate-demo".into();
    puzzle.inputs = vec!["A".into(), "B".into()];
    puzzle.outputs = vec!["Q".into()];
    puzzle.truth_table = build_truth_table(&["A", "B"], &["Q"], |x| vec![x[0] && x[1]]);
    let report = circuit.check_truth_table(&puzzle);
    println!("check solved={}", report.solved);

    let def = circuit.create_chip("AND2")?;
    println!("promoted chip={} hash={}", def.name, def.hash());

    if let Some(path) = save {
        circuit.save_to(path)?;
        println!("circuit written to {}", path.display());
    }
    Ok(())
}
