//! Grid layouts and timestamps the isoband tests build on.

/// Regular lat/lon layouts, from a 10x10 toy up to full model domains.
pub mod grid {
    use isoband_common::{Grid, GridError};

    /// GFS 0.25 degree global layout, longitudes 0..360.
    pub const GFS_GLOBAL: GridSpec = GridSpec {
        width: 1440,
        height: 721,
        min_lon: 0.0,
        max_lon: 359.75,
        min_lat: -90.0,
        max_lat: 90.0,
    };

    /// MRMS CONUS grid (1km resolution)
    pub const MRMS_CONUS: GridSpec = GridSpec {
        width: 7000,
        height: 3500,
        min_lon: -130.0,
        max_lon: -60.0,
        min_lat: 20.0,
        max_lat: 55.0,
    };

    /// Simple 10x10 test grid
    pub const SIMPLE_10X10: GridSpec = GridSpec {
        width: 10,
        height: 10,
        min_lon: -10.0,
        max_lon: 10.0,
        min_lat: -10.0,
        max_lat: 10.0,
    };

    /// 40x20 grid over CONUS
    pub const CONUS_40X20: GridSpec = GridSpec {
        width: 40,
        height: 20,
        min_lon: -130.0,
        max_lon: -60.0,
        min_lat: 20.0,
        max_lat: 55.0,
    };

    /// 36x18 grid covering the globe in -180..180
    pub const GLOBAL_36X18: GridSpec = GridSpec {
        width: 36,
        height: 18,
        min_lon: -175.0,
        max_lon: 175.0,
        min_lat: -85.0,
        max_lat: 85.0,
    };

    /// A regular lat/lon layout. Rows run north to south, columns west to east.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub min_lon: f64,
        pub max_lon: f64,
        pub min_lat: f64,
        pub max_lat: f64,
    }

    impl GridSpec {
        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Returns the spacing between samples in degrees.
        pub fn resolution(&self) -> (f64, f64) {
            let dx = (self.max_lon - self.min_lon) / (self.width.max(2) - 1) as f64;
            let dy = (self.max_lat - self.min_lat) / (self.height.max(2) - 1) as f64;
            (dx, dy)
        }

        /// One latitude per row, north first.
        pub fn row_latitudes(&self) -> Vec<f64> {
            let (_, dy) = self.resolution();
            (0..self.height)
                .map(|row| self.max_lat - row as f64 * dy)
                .collect()
        }

        /// One longitude per column, west first.
        pub fn column_longitudes(&self) -> Vec<f64> {
            let (dx, _) = self.resolution();
            (0..self.width)
                .map(|col| self.min_lon + col as f64 * dx)
                .collect()
        }

        /// Build a north-up [`Grid`] with these coordinates.
        pub fn build(&self, values: Vec<f64>) -> Result<Grid, GridError> {
            Grid::from_axes(
                self.width,
                self.height,
                values,
                &self.row_latitudes(),
                &self.column_longitudes(),
            )
        }

        /// Build a south-up [`Grid`]: row 0 is the southernmost row.
        pub fn build_south_up(&self, values: Vec<f64>) -> Result<Grid, GridError> {
            let mut lats = self.row_latitudes();
            lats.reverse();
            Grid::from_axes(
                self.width,
                self.height,
                values,
                &lats,
                &self.column_longitudes(),
            )
        }
    }
}

/// Common time values for testing.
pub mod time {
    /// Timestamp of the MRMS reflectivity sample (2025-12-11T23:59:17Z)
    pub const MRMS_SAMPLE_TIME: &str = "2025-12-11T23:59:17Z";
}
