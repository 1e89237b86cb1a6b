//! Bike Sharing Dashboard - interactive window, JSON report and PNG chart export.

use anyhow::{anyhow, Context};
use bikeshare_dashboard::charts::{ChartSpec, StaticChartRenderer};
use bikeshare_dashboard::config::{setup_logging, Cli, Command};
use bikeshare_dashboard::data::DataLoader;
use bikeshare_dashboard::gui;
use bikeshare_dashboard::report::DashboardReport;
use bikeshare_dashboard::stats::Dashboard;
use clap::Parser;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let path = cli.data_path();
    let dataset = DataLoader::load_csv(&path)
        .with_context(|| format!("failed to load dataset from {}", path.display()))?;
    let selection = cli.selection(dataset.extent());

    match cli.command() {
        Command::Gui => gui::run(dataset, path, selection, cli.wind_scope)
            .map_err(|e| anyhow!("dashboard window failed: {e}")),
        Command::Report { output, pretty } => {
            let dashboard = Dashboard::compute(&dataset, selection, cli.wind_scope)?;
            DashboardReport::new(&path, dashboard).write(output.as_deref(), pretty)?;
            Ok(())
        }
        Command::Export {
            out_dir,
            width,
            height,
        } => {
            let dashboard = Dashboard::compute(&dataset, selection, cli.wind_scope)?;
            let specs = ChartSpec::for_dashboard(&dashboard);
            let paths = StaticChartRenderer::export_all(&specs, &out_dir, width, height)
                .with_context(|| format!("failed to export charts to {}", out_dir.display()))?;
            info!("exported {} charts to {}", paths.len(), out_dir.display());
            for path in paths {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}
