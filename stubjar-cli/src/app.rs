use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use stubjar::{Classpath, ClosureEngine, ExclusionPrefixes, StubJarWriter};

/// stubjar - generate minimal API-stub jars from JVM class files
///
/// Every class reachable from the roots through public/protected declarations is
/// re-encoded with private and package-private members removed and method bodies
/// replaced by placeholders, then packaged into a jar suitable for compiling against.
#[derive(Debug, Parser)]
#[command(name = "stubjar", version, about, long_about = None)]
pub struct Cli {
    /// Directories or jars whose classes all become stubbing roots.
    ///
    /// A trailing `/*` component expands to every jar in that directory.
    #[arg(value_name = "ROOT")]
    pub roots: Vec<String>,

    /// Explicit root class names in internal form (e.g. com/example/Service).
    #[arg(short = 't', long = "type", value_name = "CLASS")]
    pub types: Vec<String>,

    /// Additional classpath entries used for lookup only, not as roots.
    ///
    /// A trailing `/*` component expands to every jar in that directory.
    #[arg(short = 'c', long = "classpath", value_name = "ENTRY")]
    pub classpath: Vec<String>,

    /// Class-name prefixes to exclude from stubbing (besides the built-in java/).
    #[arg(short = 'i', long = "ignore", value_name = "PREFIX")]
    pub ignore: Vec<String>,

    /// Output jar path. Without it the stubbed class names are printed instead.
    #[arg(short = 'o', long = "output", value_name = "JAR")]
    pub output: Option<PathBuf>,

    /// Print each stubbed class and enable debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the stubbing pipeline. Returns the process exit code: 0 on success, 1 when no
/// root classes were found at all. An empty closure is a success but writes no jar.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let mut classpath = Classpath::new();
    let mut root_names = cli.types.clone();

    for spec in &cli.roots {
        for path in Classpath::expand_entry(spec)
            .with_context(|| format!("cannot expand root entry {spec}"))?
        {
            let mut found = Classpath::class_names(&path)
                .with_context(|| format!("cannot list classes in {}", path.display()))?;
            log::debug!("{} root classes in {}", found.len(), path.display());
            root_names.append(&mut found);
            classpath
                .push(&path)
                .with_context(|| format!("cannot open root entry {}", path.display()))?;
        }
    }

    for spec in &cli.classpath {
        for path in Classpath::expand_entry(spec)
            .with_context(|| format!("cannot expand classpath entry {spec}"))?
        {
            classpath
                .push(&path)
                .with_context(|| format!("cannot open classpath entry {}", path.display()))?;
        }
    }

    if root_names.is_empty() {
        eprintln!("no root classes found; pass directories, jars or --type names");
        return Ok(1);
    }

    let mut exclusions = ExclusionPrefixes::default();
    for prefix in &cli.ignore {
        exclusions.add(prefix.clone());
    }

    let mut engine = ClosureEngine::new(classpath, exclusions);
    engine
        .fill(root_names)
        .context("dependency closure failed")?;

    let mut stubbed: Vec<&str> = engine.type_names().collect();
    stubbed.sort_unstable();
    log::info!("{} classes in closure", stubbed.len());

    if cli.verbose || cli.output.is_none() {
        for name in &stubbed {
            println!("{name}");
        }
    }

    if let Some(output) = &cli.output {
        if stubbed.is_empty() {
            log::info!("zero classes to stub; {} not written", output.display());
            return Ok(0);
        }
        let writer = StubJarWriter::new(engine.source());
        writer
            .write(stubbed.iter().copied(), output)
            .with_context(|| format!("cannot write {}", output.display()))?;
    }

    Ok(0)
}
