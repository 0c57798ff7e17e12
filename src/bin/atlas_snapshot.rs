use image::ImageReader;
use sap_render::texture_atlas::Atlas;
use std::fs;
use std::path::Path;

fn compare_with_tolerance(a_path: &Path, b_path: &Path, tolerance: u8) -> anyhow::Result<bool> {
    let a = ImageReader::open(a_path)?.decode()?.to_rgba8();
    let b = ImageReader::open(b_path)?.decode()?.to_rgba8();

    if a.dimensions() != b.dimensions() {
        return Ok(false);
    }
    Ok(a.pixels().zip(b.pixels()).all(|(pa, pb)| {
        let da = pa.0;
        let db = pb.0;
        (0..4).all(|i| da[i].abs_diff(db[i]) <= tolerance)
    }))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let atlas = Atlas::build()?;

    // An explicit path just dumps the atlas; otherwise compare against the golden.
    if let Some(path) = std::env::args().nth(1) {
        atlas.image.save_png(&path)?;
        println!("atlas written to {}", path);
        return Ok(());
    }

    fs::create_dir_all("snapshots/actual")?;
    fs::create_dir_all("snapshots/golden")?;
    let out_actual = Path::new("snapshots/actual/atlas.png");
    let out_golden = Path::new("snapshots/golden/atlas.png");
    atlas.image.save_png(out_actual)?;

    if !out_golden.exists() {
        fs::copy(out_actual, out_golden)?;
        println!("golden created at {}", out_golden.display());
        return Ok(());
    }

    if compare_with_tolerance(out_actual, out_golden, 0)? {
        println!("snapshot OK for atlas.png");
    } else {
        println!("snapshot mismatch for atlas.png");
    }
    Ok(())
}
