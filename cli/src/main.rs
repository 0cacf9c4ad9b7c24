use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tock_core::{agent, config, providers, tools};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tock")]
#[command(about = "tock - a minimal tool-calling agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file to ~/.tock/config.toml
    Init,
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat { message: None });

    match command {
        Commands::Init => {
            config::save_config(&config::Config::default())?;
            println!("Wrote {}", config::get_config_path().display());
        }
        Commands::Chat { message } => {
            let config = config::Config::load_or_init()?;

            let provider: Arc<dyn tock_core::Provider> =
                Arc::from(providers::create_provider(&config)?);

            let mut tool_registry = agent::ToolRegistry::new();
            tool_registry.register(Box::new(tools::CurrentTimeTool));

            let agent_loop = agent::AgentLoop::new(provider, Arc::new(tool_registry))
                .with_max_iterations(config.max_iterations);

            if let Some(msg) = message {
                match agent_loop.process(&msg).await {
                    Ok(response) => {
                        println!("{}", response);
                    }
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        anyhow::bail!("Agent processing failed: {}", e);
                    }
                }
            } else {
                println!("tock ({})", config.model);
                println!("Type your message (Ctrl+D to exit):\n");
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                let stdout = io::stdout();
                let mut stdout_lock = stdout.lock();

                loop {
                    print!("> ");
                    let _ = stdout_lock.flush();

                    let mut input = String::new();
                    let mut reader = stdin.lock();

                    match reader.read_line(&mut input) {
                        Ok(0) => {
                            println!("\nGoodbye!");
                            break;
                        }
                        Ok(_) => {
                            let input = input.trim();
                            if input.is_empty() {
                                continue;
                            }

                            match agent_loop.process(input).await {
                                Ok(response) => {
                                    println!("{}", response);
                                }
                                Err(e) => {
                                    eprintln!("Error: {}", e);
                                }
                            }

                            println!();
                        }
                        Err(_) => {
                            println!("\nGoodbye!");
                            break;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
