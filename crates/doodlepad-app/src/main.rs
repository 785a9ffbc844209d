//! Main application entry point (native).
//!
//! Replays a recorded event script onto an offscreen canvas, writes the
//! result as PNG and optionally asks the model for feedback.

#[cfg(feature = "native")]
mod native {
    use clap::Parser;
    use doodlepad_app::{
        App, AppConfig, AppResult, connect_feedback, load_script, replay, request_analysis, send_chat,
    };
    use doodlepad_feedback::FeedbackConfig;
    use doodlepad_render::{EXPORT_FILE_NAME, export_png};
    use std::path::PathBuf;

    /// Command-line arguments.
    #[derive(Debug, Clone, Parser)]
    #[command(name = "doodlepad")]
    #[command(about = "Replay a drawing script and export it as PNG")]
    #[command(version)]
    pub struct CliArgs {
        /// JSON event script to replay
        #[arg(long)]
        pub script: Option<PathBuf>,

        /// Output PNG path
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        pub out: PathBuf,

        /// Canvas width in pixels
        #[arg(long, default_value = "1280")]
        pub width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value = "800")]
        pub height: u32,

        /// Ask for artistic feedback on the exported drawing
        #[arg(long)]
        pub feedback: bool,

        /// Send a chat message to the art tutor
        #[arg(long)]
        pub chat: Option<String>,
    }

    pub async fn run(args: CliArgs) -> AppResult<()> {
        let mut app = App::new(AppConfig {
            width: args.width,
            height: args.height,
            ..AppConfig::default()
        });
        let mut surface = app.render_offscreen()?;

        if let Some(path) = &args.script {
            let events = load_script(path)?;
            let summary = replay(&events, app.pad_mut(), &mut surface);
            log::info!(
                "Replayed {} events: {} history changes, {} strokes kept",
                summary.events,
                summary.changes,
                app.pad().history().len()
            );
        }

        let png_data = export_png(&surface)?;
        std::fs::write(&args.out, &png_data)?;
        println!("Wrote {}", args.out.display());

        if !args.feedback && args.chat.is_none() {
            return Ok(());
        }
        let client = connect_feedback(FeedbackConfig::from_env());

        if args.feedback {
            let reply = request_analysis(app.chat(), client.as_ref(), &png_data).await;
            println!("{reply}");
        }
        if let Some(message) = &args.chat {
            match send_chat(app.chat(), client.as_ref(), message).await {
                Some(reply) => println!("{reply}"),
                None => log::warn!("Ignoring blank chat message"),
            }
        }
        Ok(())
    }
}

#[cfg(feature = "native")]
#[tokio::main]
async fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Starting Doodlepad");
    doodlepad_core::ShortcutRegistry::log_all();

    if let Err(e) = native::run(native::CliArgs::parse()).await {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
