// astra_core/src/constants.rs

/// Earth equatorial radius used for apparent-size exclusion tests [m].
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_136.6;

/// WGS84 equatorial radius, used as the default occluding sphere for antennas [m].
pub const WGS84_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// Earth gravitational parameter [m^3/s^2].
pub const EARTH_GRAVITATIONAL_CONSTANT_M3_S2: f64 = 3.986_004_415e14;

/// One astronomical unit [m].
pub const ASTRONOMICAL_UNIT_M: f64 = 1.495_978_707_00e11;

/// Mean Earth-Moon distance [m].
pub const EARTH_MOON_DISTANCE_M: f64 = 3.844e8;

/// Full turn in radians.
pub const TAU: f64 = std::f64::consts::TAU;
