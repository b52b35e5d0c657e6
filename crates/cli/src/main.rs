use clap::{Parser, Subcommand};

use lib::backend::HttpBackend;
use lib::connectivity::ConnectivityState;
use lib::controller::{ChatController, SubmitOutcome, EXAMPLE_QUESTIONS};
use lib::transcript::Role;

#[derive(Parser)]
#[command(name = "danisma")]
#[command(about = "Danışma CLI — Türk hukuk asistanı", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: DANISMA_CONFIG_PATH or ~/.danisma/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Chat with the legal assistant (interactive). Waits for the local
    /// answer service to become ready before accepting questions.
    Chat {
        /// Config file path (default: DANISMA_CONFIG_PATH or ~/.danisma/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Answer service base URL (default from config or http://127.0.0.1:5001)
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("danisma {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Chat { config, url }) => {
            if let Err(e) = run_chat(config, url).await {
                log::error!("chat failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let _dir = lib::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", path.display());
    Ok(())
}

async fn run_chat(
    config_path: Option<std::path::PathBuf>,
    url: Option<String>,
) -> anyhow::Result<()> {
    use std::io::{self, BufRead, Write};

    let (config, _path) = lib::config::load_config(config_path)?;
    let base_url = url.unwrap_or_else(|| lib::config::resolve_backend_url(&config));
    let backend = HttpBackend::new(Some(base_url.clone()), config.backend.request_timeout())?;
    log::info!("chat: using answer service at {}", base_url);

    let mut controller = ChatController::start(backend, &config);

    println!("TÜRK HUKUK ASİSTANI");
    println!("Tüketici hakları ile ilgili sorularınızı yanıtlamak için hazırım.");
    println!();

    // Block input until the first successful health probe.
    if controller.connectivity() != ConnectivityState::Connected {
        println!("BAĞLANIYOR...");
        while controller.connectivity_changed().await != ConnectivityState::Connected {}
    }
    println!("SİSTEM AKTİF");
    println!();
    println!("Hızlı sorular ( /1 .. /{} ile seçin, Enter ile gönderin ):", EXAMPLE_QUESTIONS.len());
    for (i, q) in EXAMPLE_QUESTIONS.iter().enumerate() {
        println!("  /{}  {}", i + 1, q);
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    // Pre-filled input awaiting an empty-line confirmation.
    let mut draft: Option<String> = None;

    loop {
        match &draft {
            Some(d) => write!(stdout, "[{}] > ", d)?,
            None => write!(stdout, "> ")?,
        }
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim().to_string();

        let question = if line.is_empty() {
            match draft.take() {
                Some(d) => d,
                None => continue,
            }
        } else if line == "/cikis" || line == "exit" {
            break;
        } else if let Some(rest) = line.strip_prefix('/') {
            // Example pick pre-fills the draft; it is sent on the next Enter.
            let picked = rest
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| controller.pick_example(i));
            match picked {
                Some(q) => {
                    draft = Some(q.to_string());
                    continue;
                }
                None => {
                    println!("bilinmeyen komut: {}", line);
                    continue;
                }
            }
        } else {
            line
        };

        if !controller.can_submit(&question) {
            if controller.connectivity() != ConnectivityState::Connected {
                println!("BAĞLANIYOR... (sunucu hazır değil, lütfen bekleyin)");
            }
            continue;
        }

        write!(stdout, "ASİSTAN  ")?;
        stdout.flush()?;
        let mut print_chunk = |delta: &str| {
            print!("{}", delta);
            let _ = io::stdout().flush();
        };
        let outcome = controller.submit(&question, Some(&mut print_chunk)).await;
        match outcome {
            SubmitOutcome::Completed => println!(),
            SubmitOutcome::Failed => {
                // The apology was appended to the transcript but never revealed.
                if let Some(m) = controller.messages().last().filter(|m| m.role == Role::Assistant) {
                    println!("{}", m.text);
                }
            }
            SubmitOutcome::Ignored => println!(),
        }
        println!();
    }

    Ok(())
}
