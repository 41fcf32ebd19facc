//! LED panels tiled over the footprint of the plumbed system.

use crate::error::SceneError;
use crate::layout::Run;
use crate::parts;
use crate::placement::Placement;
use crate::scene::Category;
use glam::DVec3;
use log::debug;

/// Categories whose extent the panels must cover.
const COVERED: [Category; 3] = [Category::Pots, Category::Pipes, Category::Fittings];

/// Number of panels needed to cover `extent`, and the pitch between them.
fn tiling(extent: f64, panel: f64) -> (u32, f64) {
    let n = ((extent / panel).ceil() as u32).max(1);
    (n, extent / n as f64)
}

pub(crate) fn build(run: &mut Run) -> Result<(), SceneError> {
    let lighting = &run.config.lighting;
    let (width, depth, height) = (lighting.panel_width, lighting.panel_depth, lighting.light_height);
    let Some((min, max)) = run.scene.bounding_box(&COVERED) else {
        debug!("nothing to light");
        return Ok(());
    };
    let extent = max - min;
    let (nx, pitch_x) = tiling(extent.x, width);
    let (ny, pitch_y) = tiling(extent.y, depth);
    let z = max.z + height;
    debug!("lighting {nx}x{ny} panels at z = {z}");

    let mut k = 0;
    for j in 0..ny {
        for i in 0..nx {
            let at = DVec3::new(
                min.x + pitch_x * (i as f64 + 0.5),
                min.y + pitch_y * (j as f64 + 0.5),
                z,
            );
            let built = parts::light_panel(
                &mut run.ctx,
                &format!("LED_Panel_{k}"),
                &Placement::at(at),
                width,
                depth,
            );
            run.add(built)?;
            k += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tiling_covers_extent() {
        let (n, pitch) = tiling(1.3, 0.6);
        assert_eq!(n, 3);
        assert_relative_eq!(pitch * n as f64, 1.3, epsilon = 1e-12);

        // A zero-width footprint still gets one panel
        assert_eq!(tiling(0.0, 0.6).0, 1);
    }
}
