//! Perform various adjustments to a CMOD file.
//!
//! Reads a model from a file (or standard input), applies the requested
//! transformations in a fixed order - normals, tangents, merge, dedup,
//! strip conversion - and writes the result to a file (or standard
//! output).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use cmod_io::{load_model, save_model_ascii, save_model_binary};
use cmod_ops::{
    convert_to_strips, dedup_vertices, generate_normals, generate_tangents, merge_model_meshes,
    GreedyStripGenerator,
};
use cmod_types::Model;

/// Perform various adjustments to a CMOD file.
#[derive(Debug, Parser)]
#[command(name = "cmodfix", version)]
struct Cli {
    /// Output an ASCII .cmod file (default)
    #[arg(short, long)]
    ascii: bool,

    /// Output a binary .cmod file
    #[arg(short, long, conflicts_with = "ascii")]
    binary: bool,

    /// Eliminate duplicate vertices
    #[arg(short, long)]
    uniquify: bool,

    /// Generate normals
    #[arg(short, long)]
    normals: bool,

    /// Generate tangents
    #[arg(short, long)]
    tangents: bool,

    /// Smoothing angle for normal generation, in degrees
    #[arg(short, long, default_value_t = 60.0, allow_negative_numbers = true)]
    smooth: f32,

    /// Join identical vertices before normal generation
    #[arg(short, long)]
    weld: bool,

    /// Merge submeshes to improve rendering performance
    #[arg(short, long)]
    merge: bool,

    /// Optimize by converting triangle lists to strips
    #[arg(short, long)]
    optimize: bool,

    /// Input CMOD file; standard input when omitted
    input: Option<PathBuf>,

    /// Output CMOD file; standard output when omitted
    output: Option<PathBuf>,
}

fn load(cli: &Cli) -> Result<Model> {
    match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            load_model(&mut BufReader::new(file))
                .with_context(|| format!("loading {}", path.display()))
        }
        None => {
            let stdin = io::stdin();
            load_model(&mut stdin.lock()).context("loading standard input")
        }
    }
}

fn save<W: Write>(cli: &Cli, model: &Model, writer: &mut W) -> Result<()> {
    if cli.binary {
        save_model_binary(model, writer).context("writing binary model")
    } else {
        save_model_ascii(model, writer).context("writing ASCII model")
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut model = load(cli)?;

    if cli.normals || cli.tangents {
        let (meshes, materials) = model.into_parts();
        let mut generated = Model::new();
        for material in materials {
            generated.add_material(material);
        }
        for mesh in meshes {
            let mut mesh = mesh;
            if cli.normals {
                mesh = generate_normals(&mesh, cli.smooth.to_radians(), cli.weld)
                    .context("generating normals")?;
            }
            if cli.tangents {
                mesh = generate_tangents(&mesh, cli.weld).context("generating tangents")?;
            }
            generated.add_mesh(mesh);
        }
        model = generated;
    }

    if cli.merge {
        model = merge_model_meshes(&model).context("merging meshes")?;
    }

    if cli.uniquify {
        for mesh in model.meshes_mut() {
            dedup_vertices(mesh).context("eliminating duplicate vertices")?;
        }
    }

    if cli.optimize {
        let generator = GreedyStripGenerator::default();
        for mesh in model.meshes_mut() {
            convert_to_strips(mesh, &generator).context("converting to strips")?;
        }
    }

    match &cli.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("opening {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            save(cli, &model, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            save(cli, &model, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Argument errors exit 1, like every other failure; --help and
    // --version are not failures.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprint!("{err}");
            return ExitCode::FAILURE;
        }
    };
    debug!(?cli, "parsed arguments");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("cmodfix: {error:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmod_types::{Mesh, PrimitiveGroup, PrimitiveKind, VertexDescription, VertexFormat,
                     VertexSemantic};

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("cmodfix").chain(args.iter().copied()))
    }

    fn triangle_model() -> Model {
        let desc =
            VertexDescription::from_formats([(VertexSemantic::Position, VertexFormat::Float3)])
                .unwrap();
        let data: Vec<u8> = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut mesh = Mesh::with_vertices(desc, 3, data).unwrap();
        mesh.add_group(PrimitiveGroup::new(PrimitiveKind::TriList, 0, vec![0, 1, 2]));
        let mut model = Model::new();
        model.add_mesh(mesh);
        model
    }

    #[test]
    fn smoothing_angle_defaults_to_sixty_degrees() {
        let cli = cli(&[]);
        assert!((cli.smooth - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn normals_flag_rebuilds_the_model() {
        let model = triangle_model();
        let mut out = Vec::new();

        // Emulate the pipeline body for the -n case.
        let (meshes, _) = model.into_parts();
        let mut generated = Model::new();
        for mesh in meshes {
            generated.add_mesh(generate_normals(&mesh, 0.0, false).unwrap());
        }
        save_model_ascii(&generated, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("normal f3"));
    }
}
