use std::collections::BTreeMap;

use geodraw_core::{random_color, settings, Result, Vec3};
use geodraw_render::{Drawable, NormalBuffer, PointsDrawable};
use geodraw_structures::{Model, PointCloud, COLOR, NORMAL, PRIMITIVE_INDEX, PRIMITIVE_TYPE};

use super::{required_points, UpdateData};

impl UpdateData<PointsDrawable> for PointCloud {
    fn update_data(&mut self, drawable: &mut PointsDrawable) -> Result<()> {
        let points = required_points(self)?;
        let n = points.len();
        drawable.upload_vertices(points);
        drawable.upload_normals(
            self.vertex_property::<Vec3>(NORMAL)
                .map_or_else(Vec::new, |normals| normals.to_vec()),
        );

        if let Some(colors) = segmentation_colors(self) {
            log::debug!("point cloud '{}': coloring {n} points by segment", self.name());
            drawable.upload_colors(colors);
            drawable.set_per_vertex_color(true);
        } else if let Some(colors) = self.vertex_property::<Vec3>(COLOR) {
            drawable.upload_colors(colors.to_vec());
            drawable.set_per_vertex_color(true);
        } else {
            drawable.upload_colors(Vec::new());
            drawable.set_default_color(settings().point_cloud_points_color);
            drawable.set_per_vertex_color(false);
        }
        Ok(())
    }
}

/// Colors each vertex by its segment, or returns `None` without segmentation data.
///
/// Every segment instance gets a fresh random color, drawn in ascending instance
/// order. Vertices of unknown class (`primitive_type == -1`) and vertices with a
/// negative instance are black.
fn segmentation_colors(cloud: &PointCloud) -> Option<Vec<Vec3>> {
    let types = cloud.vertex_property::<i32>(PRIMITIVE_TYPE)?;
    let indices = cloud.vertex_property::<i32>(PRIMITIVE_INDEX)?;

    // Keyed by the instances present, so sparse or huge ids cost one entry each.
    let mut table: BTreeMap<i32, Vec3> = indices
        .iter()
        .filter(|&&i| i >= 0)
        .map(|&i| (i, Vec3::ZERO))
        .collect();
    for color in table.values_mut() {
        *color = random_color();
    }

    Some(
        cloud
            .vertices()
            .map(|v| {
                if types[v] == -1 {
                    return Vec3::ZERO;
                }
                table.get(&indices[v]).copied().unwrap_or(Vec3::ZERO)
            })
            .collect(),
    )
}
