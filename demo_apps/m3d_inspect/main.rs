//! Prints a summary of an m3d file and plays one of its clips.
//!
//! ```text
//! m3d_inspect <file.m3d> [clip] [--strict]
//! ```

use std::sync::Arc;

use anyhow::Context;
use sinew::{Instance, LoadOptions, M3dLoader, SkinningPalette};

const TICK: f32 = 1.0 / 30.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: m3d_inspect <file.m3d> [clip] [--strict]")?;
    let rest: Vec<String> = args.collect();
    let strict = rest.iter().any(|arg| arg == "--strict");
    let clip_arg = rest.into_iter().find(|arg| !arg.starts_with("--"));

    let options = if strict { LoadOptions::strict() } else { LoadOptions::default() };
    let model = M3dLoader::with_options(options)
        .load_skinned(&path)
        .with_context(|| format!("loading {path}"))?;

    println!("{path}");
    println!("  vertices:  {}", model.vertices.len());
    println!("  triangles: {}", model.indices.len() / 3);
    for (subset, material) in model.subsets.iter().zip(&model.materials) {
        println!(
            "  subset {}: {} faces, material {:?} ({}, diffuse map {:?})",
            subset.id, subset.face_count, material.name, material.material_type, material.diffuse_map
        );
    }

    let skeleton = Arc::new(model.skeleton);
    println!("  bones:     {}", skeleton.bone_count());

    let mut clip_names: Vec<&str> = skeleton.clip_names().collect();
    clip_names.sort_unstable();
    for name in &clip_names {
        let (start, end) = skeleton.clip_time_range(name)?;
        println!("  clip {name:?}: {start:.3}s .. {end:.3}s");
    }

    let Some(clip) = clip_arg.or_else(|| clip_names.first().map(|name| (*name).to_string())) else {
        println!("no animation clips to play");
        return Ok(());
    };

    let mut instance = Instance::new(Arc::clone(&skeleton), clip.as_str())?;
    let end = skeleton.clip_end_time(&clip)?;
    // one full pass plus a tick to show the loop reset
    let ticks = (end / TICK).ceil() as usize + 1;

    let mut palette = SkinningPalette::default();
    for tick in 0..=ticks {
        instance.update(TICK)?;
        palette.write(instance.final_transforms())?;
        log::debug!("tick {tick}: t = {:.3}s", instance.time());
    }

    println!(
        "played {clip:?} for {} ticks, now at {:.3}s, palette upload {} bytes",
        ticks + 1,
        instance.time(),
        palette.as_bytes().len()
    );
    Ok(())
}
