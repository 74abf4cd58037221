use bevy::prelude::*;
use measure_core::{MeasurementSession, Point3};

/// The measuring session as a Bevy resource.
#[derive(Resource, Default, Debug, Deref, DerefMut)]
pub struct MeasureSession(pub MeasurementSession);

pub fn to_point3(v: Vec3) -> Point3 {
    Point3::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
}

pub fn to_vec3(p: Point3) -> Vec3 {
    Vec3::new(p.x as f32, p.y as f32, p.z as f32)
}
