// astra_sim/src/simulation/utils/serde_helpers.rs

//! `#[serde(with = ...)]` adapters between TOML arrays and nalgebra types.

pub mod vec3_f64_from_array {
    use nalgebra::Vector3;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vector3<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let arr: [f64; 3] = Deserialize::deserialize(deserializer)?;
        Ok(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

/// Rotations are written as `[roll, pitch, yaw]` in degrees.
pub mod quat_from_euler_deg {
    use nalgebra::UnitQuaternion;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<UnitQuaternion<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let arr: [f64; 3] = Deserialize::deserialize(deserializer)?;
        Ok(UnitQuaternion::from_euler_angles(
            arr[0].to_radians(), // Roll
            arr[1].to_radians(), // Pitch
            arr[2].to_radians(), // Yaw
        ))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use figment::providers::{Format, Toml};
    use figment::Figment;
    use nalgebra::{UnitQuaternion, Vector3};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Mount {
        #[serde(with = "super::vec3_f64_from_array")]
        offset: Vector3<f64>,
        #[serde(with = "super::quat_from_euler_deg")]
        rotation: UnitQuaternion<f64>,
    }

    #[test]
    fn parses_arrays_into_nalgebra_types() {
        let source = "offset = [1.0, -2.0, 0.5]\nrotation = [0.0, 0.0, 90.0]\n";
        let figment = Figment::from(Toml::string(source));
        let mount: Mount = figment.extract().unwrap();
        assert_eq!(mount.offset, Vector3::new(1.0, -2.0, 0.5));
        assert_abs_diff_eq!(mount.rotation * Vector3::x(), Vector3::y(), epsilon = 1e-12);
    }
}
