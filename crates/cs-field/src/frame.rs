//! Geodetic to local East-North-Up conversion on the WGS-84 ellipsoid.

use cs_core::GeoPoint;
use nalgebra::{Matrix3, Vector3};

/// WGS-84 semi-major axis (m).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

fn eccentricity_sq() -> f64 {
    WGS84_F * (2.0 - WGS84_F)
}

/// Earth-centred, earth-fixed coordinates of a geodetic point.
pub fn geodetic_to_ecef(p: GeoPoint) -> Vector3<f64> {
    let (lat, lon) = (p.latitude.to_radians(), p.longitude.to_radians());
    let e2 = eccentricity_sq();
    let n = WGS84_A / (1.0 - e2 * lat.sin().powi(2)).sqrt();
    Vector3::new(
        (n + p.altitude) * lat.cos() * lon.cos(),
        (n + p.altitude) * lat.cos() * lon.sin(),
        (n * (1.0 - e2) + p.altitude) * lat.sin(),
    )
}

/// Local vertical (ellipsoid normal) at a geodetic point, in ECEF.
pub fn up_ecef(p: GeoPoint) -> Vector3<f64> {
    let (lat, lon) = (p.latitude.to_radians(), p.longitude.to_radians());
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// A local tangent-plane frame: x east, y north, z up, metres from `origin`.
#[derive(Debug, Clone, Copy)]
pub struct EnuFrame {
    origin: GeoPoint,
    origin_ecef: Vector3<f64>,
    /// Rows are the east, north and up unit vectors in ECEF.
    rotation: Matrix3<f64>,
}

impl EnuFrame {
    pub fn new(origin: GeoPoint) -> Self {
        let (lat, lon) = (origin.latitude.to_radians(), origin.longitude.to_radians());
        let (slat, clat, slon, clon) = (lat.sin(), lat.cos(), lon.sin(), lon.cos());
        #[rustfmt::skip]
        let rotation = Matrix3::new(
            -slon,         clon,        0.0,
            -slat * clon, -slat * slon, clat,
             clat * clon,  clat * slon, slat,
        );
        Self {
            origin,
            origin_ecef: geodetic_to_ecef(origin),
            rotation,
        }
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Position of `p` in this frame.
    pub fn to_local(&self, p: GeoPoint) -> Vector3<f64> {
        self.rotation * (geodetic_to_ecef(p) - self.origin_ecef)
    }

    /// An ECEF direction expressed in this frame.
    pub fn direction(&self, ecef: Vector3<f64>) -> Vector3<f64> {
        self.rotation * ecef
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_zero() {
        let p = GeoPoint::new(47.37, 8.54, 408.0);
        let frame = EnuFrame::new(p);
        assert_eq!(frame.to_local(p), Vector3::zeros());
    }

    #[test]
    fn altitude_maps_to_up() {
        let p = GeoPoint::new(-33.9, 151.2, 10.0);
        let frame = EnuFrame::new(p);
        let v = frame.to_local(p.raised(25.0));
        assert!(v.x.abs() < 1e-6);
        assert!(v.y.abs() < 1e-6);
        assert!((v.z - 25.0).abs() < 1e-6);
    }

    #[test]
    fn north_and_east_axes() {
        let p = GeoPoint::new(0.0, 0.0, 0.0);
        let frame = EnuFrame::new(p);

        let north = frame.to_local(GeoPoint::new(0.001, 0.0, 0.0));
        assert!(north.y > 110.0 && north.y < 111.5, "{north:?}");
        assert!(north.x.abs() < 1e-6);

        let east = frame.to_local(GeoPoint::new(0.0, 0.001, 0.0));
        assert!(east.x > 111.0 && east.x < 111.5, "{east:?}");
        assert!(east.y.abs() < 1e-6);
    }

    #[test]
    fn local_vertical_is_z_at_origin() {
        let p = GeoPoint::new(52.0, 13.4, 0.0);
        let frame = EnuFrame::new(p);
        let up = frame.direction(up_ecef(p));
        assert!((up - Vector3::z()).norm() < 1e-12);
    }
}
