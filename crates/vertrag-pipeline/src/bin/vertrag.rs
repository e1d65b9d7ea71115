//! Command-line front end for one-off generation runs

use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use std::sync::Arc;
use std::time::Duration;
use vertrag_core::{ContractType, GenerationInput};
use vertrag_llm::{CallGate, GatedClient, OpenAiClient};
use vertrag_pipeline::{ContractPipeline, NullSink, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Command::new("vertrag")
        .version(vertrag_pipeline::VERSION)
        .about("Two-phase BGB contract generation with deterministic validation")
        .subcommand_required(true)
        .subcommand(
            Command::new("generate")
                .about("Generate one contract from a JSON input file")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("Contract type: mietvertrag, freelancer, kaufvertrag, darlehen, individuell"),
                )
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .help("Path to the generation input JSON file"),
                )
                .arg(
                    Arg::new("min-interval-ms")
                        .long("min-interval-ms")
                        .default_value("500")
                        .value_parser(value_parser!(u64))
                        .help("Minimum spacing between provider calls"),
                )
                .arg(
                    Arg::new("max-retries")
                        .long("max-retries")
                        .default_value("2")
                        .value_parser(value_parser!(u32))
                        .help("Retry budget per artifact"),
                ),
        );

    let matches = cli.get_matches();
    match matches.subcommand() {
        Some(("generate", args)) => {
            let contract_type: ContractType = args
                .get_one::<String>("type")
                .unwrap()
                .parse()
                .context("unknown contract type")?;
            let input_path = args.get_one::<String>("input").unwrap();
            let min_interval = *args.get_one::<u64>("min-interval-ms").unwrap();
            let max_retries = *args.get_one::<u32>("max-retries").unwrap();

            let raw = std::fs::read_to_string(input_path)
                .with_context(|| format!("cannot read input file {input_path}"))?;
            let input: GenerationInput =
                serde_json::from_str(&raw).context("input file is not valid generation input JSON")?;
            let api_key =
                std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;

            let gate = Arc::new(CallGate::new(Duration::from_millis(min_interval)));
            let client = GatedClient::new(OpenAiClient::new(api_key), gate);
            let config = PipelineConfig::default().with_max_retries(max_retries);
            let pipeline = ContractPipeline::new(client, config, NullSink);

            let outcome = pipeline.generate(contract_type, input).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);

            std::process::exit(i32::from(outcome.review_required));
        }
        _ => unreachable!("subcommand is required"),
    }
}
