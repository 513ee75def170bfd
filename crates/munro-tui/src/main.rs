use clap::Parser;

use munro_tui::infra::config::Config;
use munro_tui::ui::app::UiApp;

#[derive(Parser)]
#[command(name = "munro-tui", version, about = "Browse the Scottish Munros in your terminal")]
struct Cli {
    /// Override the munro collection endpoint.
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    munro_tui::init();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.url = url;
    }

    let mut app = UiApp::new(config)?;
    app.run()
}
