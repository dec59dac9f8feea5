mod app;

use banned_ip_map::config::Opt;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();
    app::logging::setup_logger(&opt.log_dir)?;

    if let Some(target) = &opt.export {
        return app::export(&opt, target).await;
    }

    app::run(&opt)
}
