//! TinyVM - command line front end

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tinyvm_runtime::{VMConfig, VM};
use tinyvm_spec::DEFAULT_CAPACITY;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Run and inspect TinyVM memory images
#[derive(Parser, Debug)]
#[command(name = "tinyvm")]
#[command(version)]
#[command(about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a memory image and execute it from address 0
    Run {
        /// Memory image to run
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Print a trace line for each executed instruction
        #[arg(short, long)]
        debug: bool,

        /// Memory size in bytes
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,

        /// Stop after this many instructions
        #[arg(long)]
        max_cycles: Option<u64>,
    },

    /// Print a listing of a memory image
    Disasm {
        /// Memory image to disassemble
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Memory size in bytes
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
    },

    /// Assemble a source file and save the resulting memory image
    Asm {
        /// Source file, one command per line
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Where to write the image
        #[arg(short, long, value_name = "IMAGE")]
        output: PathBuf,

        /// Memory size in bytes
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_vm(image: &Path, config: VMConfig) -> Result<VM> {
    let mut vm = VM::new(config).context("Failed to create machine")?;
    vm.load(image)
        .with_context(|| format!("Failed to load image: {}", image.display()))?;
    Ok(vm)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Run {
            image,
            debug,
            capacity,
            max_cycles,
        } => {
            let config = VMConfig {
                capacity,
                debug,
                max_cycles,
            };
            let mut vm = load_vm(&image, config)?;
            let result = vm
                .run()
                .with_context(|| format!("Failed to run: {}", image.display()))?;
            debug!(cycles = result.cycles, halt = ?result.halt_reason, "run finished");
        }
        Commands::Disasm { image, capacity } => {
            let config = VMConfig {
                capacity,
                ..VMConfig::default()
            };
            let vm = load_vm(&image, config)?;
            let listing = tinyvm_disassembler::disassemble(vm.memory().as_bytes())
                .with_context(|| format!("Failed to disassemble: {}", image.display()))?;
            print!("{listing}");
        }
        Commands::Asm {
            source,
            output,
            capacity,
        } => {
            let text = fs::read_to_string(&source)
                .with_context(|| format!("Failed to read: {}", source.display()))?;
            let commands = tinyvm_assembler::assemble(&text)
                .with_context(|| format!("Failed to assemble: {}", source.display()))?;

            let config = VMConfig {
                capacity,
                ..VMConfig::default()
            };
            let mut vm = VM::new(config).context("Failed to create machine")?;
            for command in &commands {
                vm.apply(command)
                    .with_context(|| format!("Failed to apply `{}`", command.mnemonic()))?;
            }
            vm.save(&output)
                .with_context(|| format!("Failed to save image: {}", output.display()))?;
            info!(commands = commands.len(), image = %output.display(), "image written");
        }
    }

    Ok(())
}
