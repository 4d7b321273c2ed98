// ABOUTME: Main entry point for the prompt2pptx program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{debug, warn};
use prompt2pptx::{
    check_layout, extract, pom, Config, ExternalBuilder, GenerationMode, GenerationReport, Pipeline,
    PresentationBuilder, ReviewReport,
};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message to the generator agent and print the raw reply
    Chat {
        /// Message to send
        message: String,
    },

    /// Generate a PPTX from a natural-language prompt
    Generate(GenerateArgs),

    /// Extract and validate a POM document from saved model output
    Validate {
        /// File holding the model output, or '-' for stdin
        #[arg(short, long)]
        input: String,
    },

    /// Build a PPTX from an existing POM JSON document
    Build {
        /// Path to the POM JSON document
        #[arg(short, long)]
        input: PathBuf,

        /// Path to output PPTX file
        #[arg(short, long, default_value = "output.pptx")]
        output: PathBuf,
    },

    /// Render a PPTX to slide images and review each slide
    Check {
        /// Path to the PPTX file
        #[arg(short, long, default_value = "output.pptx")]
        input: PathBuf,

        /// Directory for the slide images
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Generate a PPTX, then render and review it
    Run {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Directory for the slide images
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Natural-language description of the presentation
    #[arg(short, long)]
    prompt: String,

    /// Path to output PPTX file
    #[arg(short, long, default_value = "output.pptx")]
    output: PathBuf,

    /// How the document is obtained: 'text' (extract from free text) or 'structured'
    #[arg(long, default_value = "text")]
    mode: GenerationMode,

    /// Also write the validated POM document to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

fn print_generation(report: &GenerationReport) {
    for issue in &report.issues {
        println!("warning: {}", issue);
    }
    if let Some(json_path) = &report.json_path {
        println!("POM document written: {:?}", json_path);
    }
    println!(
        "PPTX generated successfully: {:?} ({} slides)",
        report.pptx_path,
        report.slides.len()
    );
}

fn print_review(report: &ReviewReport) {
    for path in &report.saved.saved {
        println!("Saved {:?}", path);
    }
    for (path, e) in &report.saved.failed {
        eprintln!("Failed to save {:?}: {}", path, e);
    }
    for critique in &report.critiques.critiques {
        match &critique.outcome {
            Ok(text) => println!("Slide {} Check Result:\n{}\n", critique.index, text),
            Err(e) => eprintln!("Slide {} check failed: {}", critique.index, e),
        }
    }
    println!(
        "All slides have been checked at {} ({}/{} succeeded).",
        report.reviewed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.critiques.succeeded().count(),
        report.critiques.len()
    );
}

async fn build_from_file(config: &Config, input: &Path, output: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
    let slides = extract::parse_document(&text)?;
    for issue in check_layout(&slides) {
        println!("warning: {}", issue);
    }

    let builder = ExternalBuilder::new(config.builder_program.clone(), config.builder_script.clone());
    let path = builder.build(&slides, config.canvas, output).await?;
    println!("PPTX generated successfully: {:?} ({} slides)", path, slides.len());
    Ok(())
}

async fn execute(command: Commands, config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Chat { message } => {
            let pipeline = Pipeline::from_config(config)?;
            let reply = pipeline.generator().generate(&message).await?;
            println!("{}", reply);
        }
        Commands::Generate(args) => {
            println!("Executing generate command...");
            let pipeline = Pipeline::from_config(config)?;
            let report = pipeline
                .generate(&args.prompt, args.mode, &args.output, args.json.as_deref())
                .await?;
            print_generation(&report);
        }
        Commands::Validate { input } => {
            let text = read_input(&input)?;
            let slides = extract::parse_document(&text)?;
            for issue in check_layout(&slides) {
                eprintln!("warning: {}", issue);
            }
            println!("{}", pom::to_pretty_json(&slides)?);
        }
        Commands::Build { input, output } => {
            println!("Executing build command...");
            build_from_file(&config, &input, &output).await?;
        }
        Commands::Check { input, out_dir } => {
            println!("Executing check command...");
            let pipeline = Pipeline::from_config(config)?;
            let report = pipeline.review(&input, &out_dir).await?;
            print_review(&report);
        }
        Commands::Run { generate, out_dir } => {
            println!("Executing run command...");
            let pipeline = Pipeline::from_config(config)?;
            let (generation, review) = pipeline
                .run(&generate.prompt, generate.mode, &generate.output, &out_dir)
                .await?;
            print_generation(&generation);
            print_review(&review);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG can come from it too
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match dotenv {
        Ok(path) => debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Some(command) => execute(command, Config::from_env()).await,
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
