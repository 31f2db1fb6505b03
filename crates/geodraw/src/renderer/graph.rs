use geodraw_core::{Result, Vec3};
use geodraw_render::{
    Drawable, IndexBuffer, LineImpostor, LinesDrawable, PointImpostor, PointsDrawable,
};
use geodraw_structures::Graph;

use super::{required_points, UpdateData};

// Graphs are not styled through `Settings`.
const VERTEX_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const VERTEX_POINT_SIZE: f32 = 15.0;
const EDGE_COLOR: Vec3 = Vec3::new(1.0, 0.67, 0.5);
const EDGE_LINE_WIDTH: f32 = 3.0;

impl UpdateData<PointsDrawable> for Graph {
    fn update_data(&mut self, drawable: &mut PointsDrawable) -> Result<()> {
        let points = required_points(self)?;
        drawable.upload_vertices(points);
        drawable.set_default_color(VERTEX_COLOR);
        drawable.set_per_vertex_color(false);
        drawable.set_point_size(VERTEX_POINT_SIZE);
        drawable.set_impostor_type(PointImpostor::Sphere);
        Ok(())
    }
}

impl UpdateData<LinesDrawable> for Graph {
    fn update_data(&mut self, drawable: &mut LinesDrawable) -> Result<()> {
        let points = required_points(self)?;
        let indices: Vec<u32> = self
            .edges()
            .flat_map(|e| [self.from_vertex(e), self.to_vertex(e)])
            .map(|v| v.idx() as u32)
            .collect();
        drawable.upload_vertices(points);
        drawable.upload_indices(indices);
        drawable.set_default_color(EDGE_COLOR);
        drawable.set_per_vertex_color(false);
        drawable.set_line_width(EDGE_LINE_WIDTH);
        drawable.set_impostor_type(LineImpostor::Cylinder);
        Ok(())
    }
}
