use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use course::{CourseConfig, CourseSnapshot, MarkerPlan, Route, parse_geojson_route};
use foundation::math::Coordinate;
use foundation::units::UnitSystem;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "COURSEKIT_CONFIG";

#[derive(Parser, Debug)]
#[command(author, version, about = "Course profile, marker and hover-lookup tools")]
struct Args {
    /// JSON course config (falls back to $COURSEKIT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report distances in miles and elevations in feet
    #[arg(long, global = true)]
    imperial: bool,

    /// Densification target in points per km
    #[arg(long, global = true)]
    density: Option<f64>,

    /// Marker spacing in the selected distance unit
    #[arg(long, global = true)]
    interval: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the elevation profile of a GeoJSON route
    Profile {
        route: PathBuf,

        /// Totals only, no per-sample series
        #[arg(long)]
        summary: bool,
    },

    /// Print the distance markers of a GeoJSON route
    Markers { route: PathBuf },

    /// Coordinate at a distance along the route
    Locate {
        route: PathBuf,

        /// Distance from the start, in the selected unit
        #[arg(long, allow_negative_numbers = true)]
        distance: f64,
    },

    /// Snap a map position onto the route and find its chart sample
    Project {
        route: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), String> {
    let env_config = env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = resolve_config(&args, env_config)?;
    debug!(?config, "resolved course config");

    let output = match &args.command {
        Command::Profile { route, summary } => {
            let snapshot = load_snapshot(route, &config)?;
            to_json(&ProfileReport::new(&snapshot, *summary))?
        }
        Command::Markers { route } => {
            let snapshot = load_snapshot(route, &config)?;
            to_json(&MarkersReport::new(&snapshot.markers, config.units))?
        }
        Command::Locate { route, distance } => {
            let snapshot = load_snapshot(route, &config)?;
            let coordinate = snapshot
                .coordinate_at_distance(*distance)
                .ok_or_else(|| "route has no usable geometry".to_string())?;
            to_json(&LocateReport {
                units: config.units,
                distance: *distance,
                coordinate,
            })?
        }
        Command::Project { route, lng, lat } => {
            let snapshot = load_snapshot(route, &config)?;
            to_json(&ProjectReport::new(&snapshot, Coordinate::flat(*lng, *lat))?)?
        }
    };
    println!("{output}");
    Ok(())
}

/// File config (flag, then env), then command-line overrides, then validation.
fn resolve_config(args: &Args, env_config: Option<PathBuf>) -> Result<CourseConfig, String> {
    let mut config = match args.config.clone().or(env_config) {
        Some(path) => CourseConfig::load(&path).map_err(|e| e.to_string())?,
        None => CourseConfig::default(),
    };
    if args.imperial {
        config.units = UnitSystem::Imperial;
    }
    if let Some(density) = args.density {
        config.points_per_km = density;
    }
    if let Some(interval) = args.interval {
        config.marker_interval = interval;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn load_route(path: &Path) -> Result<Route, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    parse_geojson_route(&text).map_err(|e| format!("{path:?}: {e}"))
}

fn load_snapshot(path: &Path, config: &CourseConfig) -> Result<CourseSnapshot, String> {
    let raw = load_route(path)?;
    let snapshot = CourseSnapshot::build(&raw, config);
    info!(
        route = %path.display(),
        raw_points = raw.len(),
        points = snapshot.route.len(),
        "built course"
    );
    Ok(snapshot)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))
}

#[derive(Debug, Serialize)]
struct ProfileReport {
    units: UnitSystem,
    distance_unit: &'static str,
    elevation_unit: &'static str,
    points: usize,
    total_distance: f64,
    ascent: f64,
    descent: f64,
    min_elevation: Option<f64>,
    max_elevation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    samples: Option<Vec<ProfileSample>>,
}

#[derive(Debug, Serialize)]
struct ProfileSample {
    distance: f64,
    elevation: f64,
    grade: f64,
}

impl ProfileReport {
    fn new(snapshot: &CourseSnapshot, summary: bool) -> Self {
        let p = &snapshot.profile;
        let samples = (!summary).then(|| {
            (0..p.len())
                .map(|i| ProfileSample {
                    distance: p.distance[i],
                    elevation: p.elevation[i],
                    grade: p.grade[i],
                })
                .collect()
        });
        Self {
            units: p.units,
            distance_unit: p.units.distance_label(),
            elevation_unit: p.units.elevation_label(),
            points: p.len(),
            total_distance: p.total_distance(),
            ascent: p.ascent(),
            descent: p.descent(),
            min_elevation: p.min_elevation(),
            max_elevation: p.max_elevation(),
            samples,
        }
    }
}

#[derive(Debug, Serialize)]
struct MarkersReport<'a> {
    units: UnitSystem,
    halfway: Option<&'a course::Marker>,
    regular: &'a [course::Marker],
}

impl<'a> MarkersReport<'a> {
    fn new(plan: &'a MarkerPlan, units: UnitSystem) -> Self {
        Self {
            units,
            halfway: plan.halfway.as_ref(),
            regular: &plan.regular,
        }
    }
}

#[derive(Debug, Serialize)]
struct LocateReport {
    units: UnitSystem,
    distance: f64,
    coordinate: Coordinate,
}

#[derive(Debug, Serialize)]
struct ProjectReport {
    query: Coordinate,
    coordinate: Coordinate,
    fractional_index: f64,
    chart_index: usize,
    distance: f64,
}

impl ProjectReport {
    fn new(snapshot: &CourseSnapshot, query: Coordinate) -> Result<Self, String> {
        let (chart_index, hit) = snapshot
            .chart_index_for(query)
            .ok_or_else(|| "route has no usable geometry".to_string())?;
        Ok(Self {
            query,
            coordinate: hit.coordinate,
            fractional_index: hit.fractional_index,
            chart_index,
            distance: snapshot.profile.distance[chart_index],
        })
    }
}
