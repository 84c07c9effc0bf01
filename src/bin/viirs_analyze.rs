use anyhow::{Context, Result};
use earthdata::init_tracing;
use earthdata_viirs::bin_common::{
    parse_analyze_args, parse_args, AnalyzeArgs, BinaryRunner, RunConfig,
};
use tracing::info;
use viirs::{generate_rgb_image, quality_filtering, surface_reflectance, Hdf5Source, Stats};

struct AnalyzeApp {
    run_config: RunConfig,
    args: AnalyzeArgs,
}

fn describe(label: &str, stats: &Stats) {
    info!(
        "{}: {}/{} valid | min {:?} | max {:?} | mean {:?}",
        label, stats.valid, stats.count, stats.min, stats.max, stats.mean
    );
}

impl BinaryRunner for AnalyzeApp {
    async fn run(&mut self) -> Result<String> {
        let source = Hdf5Source::open(&self.args.input)
            .with_context(|| format!("failed to open {}", self.args.input.display()))?;
        let selection = self.args.selection;
        let mut written = Vec::new();

        if selection.rgb {
            written.push(generate_rgb_image(&source, &self.args.out_dir)?);
        }

        if selection.vegetation {
            let report = quality_filtering(&source, &self.args.out_dir)?;
            describe("NDVI", &report.ndvi);
            describe("EVI", &report.evi);
            written.extend(report.outputs);
        }

        if selection.reflectance {
            let report = surface_reflectance(&source)?;
            describe("I3 without masks", &report.unmasked);
            describe("I3 with QF6 mask", &report.masked);
        }

        for path in &written {
            info!("Wrote {}", path.display());
        }
        Ok(format!("{} image(s) written to {}", written.len(), self.args.out_dir.display()))
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = parse_analyze_args(&parse_args())?;
    let mut app = AnalyzeApp {
        run_config: RunConfig::new(format!("VIIRS analysis of {}", args.input.display())),
        args,
    };
    app.execute().await
}
