use anyhow::{Context, Result};
use structopt::StructOpt;

use abstutil::Timer;
use curb_model::{resolve, ResolverConfig, ResolverInputs};

/// Where to find each input feed, and where to write the results. Only the centerlines are
/// required; every other feed just adds more to attach.
#[derive(StructOpt)]
pub struct Job {
    /// The path to a GeoJSON file of street centerlines
    #[structopt(long)]
    centerlines: String,
    /// The path to a GeoJSON file of authoritative curb lines
    #[structopt(long)]
    curbs: Option<String>,
    /// The path to a CSV file of street sweeping schedules
    #[structopt(long)]
    sweeping: Option<String>,
    /// The path to a GeoJSON file of parking regulations
    #[structopt(long)]
    regulations: Option<String>,
    /// The path to a JSON list of manual overrides. A missing file is treated as an empty list.
    #[structopt(long)]
    overrides: Option<String>,
    /// The path to a JSON resolver config. Unspecified fields use defaults.
    #[structopt(long)]
    config: Option<String>,
    /// Write the resolved segments here, as JSON
    #[structopt(long)]
    output: String,
    /// Also write every drawable segment here, as a GeoJSON FeatureCollection
    #[structopt(long)]
    geojson: Option<String>,
    /// Also write every cardinal direction conflict here, as JSON
    #[structopt(long)]
    conflicts: Option<String>,
}

impl Job {
    pub fn run(self) -> Result<()> {
        let mut timer = Timer::new("resolve curb segments");

        let config = match self.config {
            Some(ref path) => abstio::read_json::<ResolverConfig, _>(path)
                .with_context(|| format!("reading config {}", path))?,
            None => ResolverConfig::default(),
        };
        let inputs = self.load_inputs(&mut timer)?;
        let resolution = resolve(&inputs, &config, &mut timer)?;

        abstio::write_json(&self.output, &resolution.to_records())?;
        info!(
            "Wrote {} segments to {}",
            abstutil::prettyprint_usize(resolution.registry.len()),
            self.output
        );
        if let Some(path) = self.geojson {
            let fc = resolution.to_geojson();
            let num = fc.features.len();
            abstio::write_file(&path, serde_json::to_string_pretty(&fc)?.as_bytes())?;
            info!("Wrote {} features to {}", abstutil::prettyprint_usize(num), path);
        }
        if let Some(path) = self.conflicts {
            abstio::write_json(&path, &resolution.conflicts)?;
            info!(
                "Wrote {} conflicts to {}",
                abstutil::prettyprint_usize(resolution.conflicts.len()),
                path
            );
        }
        Ok(())
    }

    fn load_inputs(&self, timer: &mut Timer) -> Result<ResolverInputs> {
        let mut inputs = ResolverInputs {
            centerlines: feeds::load_centerlines(&self.centerlines, timer)?,
            ..Default::default()
        };
        if let Some(ref path) = self.curbs {
            inputs.curbs = feeds::load_curbs(path, timer)?;
        }
        if let Some(ref path) = self.sweeping {
            inputs.sweeping = feeds::load_sweeping(path, timer)?;
        }
        if let Some(ref path) = self.regulations {
            inputs.regulations = feeds::load_regulations(path, timer)?;
        }
        if let Some(ref path) = self.overrides {
            inputs.overrides = feeds::load_overrides(path, timer)?;
        }
        Ok(inputs)
    }
}
