//! Generates a surface, scatters marker boxes over it in placement patterns,
//! and writes the combined mesh as PLY.
//!
//! ```text
//! demo-scatter [SCENE.json] [OUTPUT.ply]
//! ```
//!
//! Without a scene description a displaced plane with a ring, a spiral, and a
//! line of markers is generated. Without an output path the PLY data is
//! written to standard output. Logging is configured with `RUST_LOG`.

use anyhow::{ensure, Context, Result};
use lattice::buffer::MeshBuffer;
use lattice::builder::MeshBuilder;
use lattice::noise::{NoiseConfig, NoiseGenerator};
use lattice::pattern::{Circle, Grid, Line, Pattern, Spiral};
use lattice::prelude::*;
use lattice::E3;
use nalgebra::Vector3;
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Surface {
    Plane {
        width: f32,
        height: f32,
        width_segments: usize,
        height_segments: usize,
    },
    Cube {
        width: f32,
        height: f32,
        depth: f32,
    },
    Grid {
        size: usize,
        cell: f32,
    },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Scatter {
    Grid(Grid),
    Circle(Circle),
    Spiral(Spiral),
    Line(Line),
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct Terrain {
    #[serde(flatten)]
    noise: NoiseConfig,
    amplitude: f32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
struct Scene {
    surface: Surface,
    terrain: Option<Terrain>,
    /// Offset of pattern points from the origin of the surface.
    origin: [f32; 3],
    marker: f32,
    patterns: Vec<Scatter>,
}

impl Default for Scene {
    fn default() -> Self {
        Scene {
            surface: Surface::Plane {
                width: 32.0,
                height: 32.0,
                width_segments: 64,
                height_segments: 64,
            },
            terrain: Some(Terrain {
                noise: NoiseConfig {
                    seed: 7,
                    scale: 0.1,
                },
                amplitude: 3.0,
            }),
            origin: [16.0, 0.0, 16.0],
            marker: 0.5,
            patterns: vec![
                Scatter::Circle(Circle::new(12.0, 24)),
                Scatter::Spiral(Spiral::new(3, 1.0, 0.15, 60)),
                Scatter::Line(Line::new(
                    E3::new(-14.0, 0.0, -14.0),
                    E3::new(14.0, 0.0, -14.0),
                    8,
                )),
            ],
        }
    }
}

fn read_scene(path: Option<&str>) -> Result<Scene> {
    match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open scene `{}`", path))?;
            serde_json::from_reader(file).with_context(|| format!("failed to parse scene `{}`", path))
        }
        None => Ok(Scene::default()),
    }
}

fn generate_surface(builder: &mut MeshBuilder, surface: Surface) -> Result<MeshBuffer> {
    let mesh = match surface {
        Surface::Plane {
            width,
            height,
            width_segments,
            height_segments,
        } => builder.generate_plane(width, height, width_segments, height_segments)?,
        Surface::Cube {
            width,
            height,
            depth,
        } => builder.generate_cube(width, height, depth)?,
        Surface::Grid { size, cell } => builder.generate_grid(size, cell)?,
    };
    Ok(mesh.clone())
}

fn scatter<P>(
    pattern: &P,
    scene: &Scene,
    marker: &MeshBuffer,
    noise: Option<(&NoiseGenerator, f32)>,
    mesh: &mut MeshBuffer,
) -> Result<usize>
where
    P: Pattern,
{
    let origin = Vector3::from(scene.origin);
    let half = Vector3::new(scene.marker, 0.0, scene.marker) / 2.0;
    let placed = pattern
        .spawn(|position: E3| -> Result<usize> {
            let mut position = position + origin;
            if let Some((noise, amplitude)) = noise {
                position.y += amplitude * noise.perlin(position.x, position.z);
            }
            ensure!(
                position.coords.iter().all(|x| x.is_finite()),
                "marker position is not finite"
            );
            let mut marker = marker
                .clone()
                .map_positions(|corner| corner + position.coords - half);
            mesh.append(&mut marker);
            Ok(mesh.vertex_count())
        })
        .map_err(|error| {
            let message = error.to_string();
            error.source.context(message)
        })?;
    Ok(placed.len())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let scene = read_scene(args.get(1).map(String::as_str))?;

    let mut builder = MeshBuilder::new();
    let mut mesh = generate_surface(&mut builder, scene.surface)?;
    let noise = scene
        .terrain
        .map(|terrain| (NoiseGenerator::new(terrain.noise), terrain.amplitude));
    if let Some((noise, amplitude)) = noise.as_ref() {
        noise.displace(&mut mesh, *amplitude);
    }
    tracing::info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "generated surface"
    );

    let marker = builder
        .generate_cube(scene.marker, scene.marker, scene.marker)?
        .clone();
    let noise = noise.as_ref().map(|(noise, amplitude)| (noise, *amplitude));
    for pattern in scene.patterns.iter() {
        let placed = match pattern {
            Scatter::Grid(grid) => scatter(grid, &scene, &marker, noise, &mut mesh)?,
            Scatter::Circle(circle) => scatter(circle, &scene, &marker, noise, &mut mesh)?,
            Scatter::Spiral(spiral) => scatter(spiral, &scene, &marker, noise, &mut mesh)?,
            Scatter::Line(line) => scatter(line, &scene, &marker, noise, &mut mesh)?,
        };
        tracing::info!(pattern = ?pattern, placed, "scattered markers");
    }

    let written = match args.get(2) {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create `{}`", path))?;
            mesh.to_ply(BufWriter::new(file))?
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            let written = mesh.to_ply(&mut lock)?;
            lock.flush()?;
            written
        }
    };
    tracing::info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        bytes = written,
        "wrote PLY"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use lattice::builder::MeshBuilder;
    use lattice::pattern::{Circle, Grid, Line};
    use lattice::E3;

    use crate::{generate_surface, scatter, Scatter, Scene, Surface};

    #[test]
    fn parse_tagged_scene() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "surface": { "kind": "grid", "size": 4, "cell": 1.0 },
                "terrain": { "seed": 3, "scale": 0.2, "amplitude": 1.5 },
                "patterns": [
                    { "kind": "circle", "radius": 2.0, "count": 3 },
                    { "kind": "grid", "rows": 2, "columns": 2, "spacing": 1.0 },
                    {
                        "kind": "line",
                        "start": [0.0, 0.0, 0.0],
                        "end": [4.0, 0.0, 0.0],
                        "count": 5
                    }
                ]
            }"#,
        )
        .unwrap();

        assert!(matches!(scene.surface, Surface::Grid { size: 4, .. }));
        let terrain = scene.terrain.unwrap();
        assert_eq!(3, terrain.noise.seed);
        assert_eq!(0.2, terrain.noise.scale);
        assert_eq!(1.5, terrain.amplitude);
        assert_eq!(Scene::default().origin, scene.origin);
        assert_eq!(Scene::default().marker, scene.marker);
        assert_eq!(3, scene.patterns.len());
        assert!(matches!(scene.patterns[0], Scatter::Circle(circle) if circle == Circle::new(2.0, 3)));
        assert!(matches!(scene.patterns[1], Scatter::Grid(grid) if grid == Grid::new(2, 2, 1.0)));
        assert!(matches!(
            scene.patterns[2],
            Scatter::Line(line) if line == Line::new(E3::origin(), E3::new(4.0, 0.0, 0.0), 5)
        ));
    }

    #[test]
    fn reject_unknown_kind() {
        assert!(serde_json::from_str::<Scene>(r#"{"surface":{"kind":"torus"}}"#).is_err());
        assert!(
            serde_json::from_str::<Scene>(r#"{"patterns":[{"kind":"hexagon","count":6}]}"#)
                .is_err()
        );
    }

    #[test]
    fn scatter_markers_onto_surface() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "surface": { "kind": "plane", "width": 4.0, "height": 4.0, "width_segments": 2, "height_segments": 2 },
                "terrain": null,
                "origin": [0.0, 0.0, 0.0],
                "patterns": [{ "kind": "grid", "rows": 2, "columns": 3, "spacing": 1.0 }]
            }"#,
        )
        .unwrap();
        assert!(scene.terrain.is_none());

        let mut builder = MeshBuilder::new();
        let mut mesh = generate_surface(&mut builder, scene.surface).unwrap();
        let marker = builder
            .generate_cube(scene.marker, scene.marker, scene.marker)
            .unwrap()
            .clone();
        let placed = match scene.patterns[0] {
            Scatter::Grid(grid) => scatter(&grid, &scene, &marker, None, &mut mesh).unwrap(),
            _ => unreachable!(),
        };

        assert_eq!(6, placed);
        assert_eq!(9 + (6 * marker.vertex_count()), mesh.vertex_count());
        assert_eq!(8 + (6 * marker.triangle_count()), mesh.triangle_count());
    }
}
