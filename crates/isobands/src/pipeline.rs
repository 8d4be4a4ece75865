//! End-to-end grid to isoband pipeline.

use std::time::Instant;

use isoband_common::{
    ConfigError, Feature, FeatureCollection, FeatureProperties, Grid, Polygon, Properties,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::assemble::{build_polygon_hierarchy, classify_rings};
use crate::clip::split_into_quadrants;
use crate::config::{HoleMode, IsobandConfig};
use crate::contour::extract_rings;
use crate::error::IsobandResult;
use crate::geo::GeoMapper;
use crate::levels::{generate_levels, level_span, Level, MAX_LEVELS};
use crate::preprocess::{preprocess_grid, PreparedGrid};
use crate::simplify::{CommandSimplifier, IsobandSimplifier};
use crate::transform::{Identity, InitialTransform, PostSmoothTransform};

/// Turns decoded grids into isogon and isoband feature collections.
///
/// A pipeline holds no per-run state; one instance can serve many grids,
/// including concurrently.
///
/// ```no_run
/// use isobands::{IsobandConfig, IsobandPipeline, MaskRows, SwapHalves};
/// # fn run(grid: &isoband_common::Grid) -> Result<(), isobands::IsobandError> {
/// let pipeline = IsobandPipeline::new(IsobandConfig::default())
///     .with_initial_transform(SwapHalves)
///     .with_post_transform(MaskRows { top: 40, bottom: 40 });
/// let bands = pipeline.isobands(grid, Default::default())?;
/// # Ok(())
/// # }
/// ```
pub struct IsobandPipeline {
    config: IsobandConfig,
    initial: Box<dyn InitialTransform>,
    post: Box<dyn PostSmoothTransform>,
    simplifier: Box<dyn IsobandSimplifier>,
    feature_properties: Properties,
}

impl IsobandPipeline {
    /// Pipeline with identity transforms and the configured command
    /// collaborator.
    pub fn new(config: IsobandConfig) -> Self {
        let simplifier = CommandSimplifier::new(config.simplifier.clone());
        Self {
            config,
            initial: Box::new(Identity),
            post: Box::new(Identity),
            simplifier: Box::new(simplifier),
            feature_properties: Properties::new(),
        }
    }

    pub fn with_initial_transform(mut self, transform: impl InitialTransform + 'static) -> Self {
        self.initial = Box::new(transform);
        self
    }

    pub fn with_post_transform(mut self, transform: impl PostSmoothTransform + 'static) -> Self {
        self.post = Box::new(transform);
        self
    }

    pub fn with_simplifier(mut self, simplifier: impl IsobandSimplifier + 'static) -> Self {
        self.simplifier = Box::new(simplifier);
        self
    }

    /// Attributes merged into every feature's properties.
    pub fn with_feature_properties(mut self, properties: Properties) -> Self {
        self.feature_properties = properties;
        self
    }

    pub fn config(&self) -> &IsobandConfig {
        &self.config
    }

    /// Validate the configuration and run the preprocessing stages.
    pub fn prepare(&self, grid: &Grid) -> IsobandResult<PreparedGrid> {
        self.config.validate()?;
        Ok(preprocess_grid(
            grid,
            &self.config,
            self.initial.as_ref(),
            self.post.as_ref(),
        )?)
    }

    /// Dense, unsimplified polygons for every level.
    pub fn isogons(&self, grid: &Grid) -> IsobandResult<FeatureCollection> {
        let start = Instant::now();
        let prepared = self.prepare(grid)?;
        let span = level_span(prepared.grid.values(), self.config.floor, self.config.step);
        if let Some((_, count)) = span.filter(|(_, count)| *count > MAX_LEVELS) {
            return Err(ConfigError::invalid(
                "step",
                format!("yields {count} levels for this grid, more than {MAX_LEVELS}"),
            )
            .into());
        }
        let levels = generate_levels(prepared.grid.values(), self.config.floor, self.config.step);
        let mapper = GeoMapper::new(&prepared.grid);

        let per_level: Vec<Vec<Feature>> = levels
            .par_iter()
            .map(|level| self.level_features(level, &prepared, &mapper))
            .collect();

        let mut collection = FeatureCollection::new();
        collection.extend(per_level.into_iter().flatten());

        info!(
            width = grid.width(),
            height = grid.height(),
            levels = levels.len(),
            features = collection.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generated isogons"
        );

        Ok(collection)
    }

    /// Isogons passed through the collaborator, carrying `properties` at
    /// the collection level.
    pub fn isobands(&self, grid: &Grid, properties: Properties) -> IsobandResult<FeatureCollection> {
        let isogons = self.isogons(grid)?;
        let mut isobands = self.simplifier.simplify(
            isogons,
            self.config.tolerance,
            &self.config.work_dir,
        )?;
        isobands.properties = properties;
        Ok(isobands)
    }

    fn level_features(
        &self,
        level: &Level,
        prepared: &PreparedGrid,
        mapper: &GeoMapper,
    ) -> Vec<Feature> {
        let grid = &prepared.grid;
        let threshold = level.threshold(self.config.level_epsilon);
        let rings = extract_rings(grid.values(), grid.width(), grid.height(), threshold);
        let ring_count = rings.len();

        let mapped = rings.iter().map(|r| mapper.map_ring(r)).collect();
        let (fills, holes) = classify_rings(mapped);
        let (fill_count, hole_count) = (fills.len(), holes.len());
        let polygons = build_polygon_hierarchy(fills, holes);

        let mut features = Vec::new();
        for (polygon, is_hole) in self.split_holes(polygons) {
            let props = FeatureProperties::new(level.index, level.floor, level.ceiling);
            let props = match is_hole {
                Some(flag) => props.with_hole_flag(flag),
                None => props,
            };

            if self.config.clip_quadrants {
                for (quadrant, piece) in split_into_quadrants(&polygon) {
                    let props = props
                        .clone()
                        .with_quadrant(quadrant)
                        .with_extra(&self.feature_properties);
                    features.push(Feature::polygon(&piece, props));
                }
            } else {
                features.push(Feature::polygon(
                    &polygon,
                    props.with_extra(&self.feature_properties),
                ));
            }
        }

        debug!(
            level = level.index,
            floor = level.floor,
            rings = ring_count,
            fills = fill_count,
            holes = hole_count,
            features = features.len(),
            "Processed level"
        );

        features
    }

    /// Apply the hole mode. The flag is `None` for nested output.
    fn split_holes(&self, polygons: Vec<Polygon>) -> Vec<(Polygon, Option<bool>)> {
        match self.config.hole_mode {
            HoleMode::Nested => polygons.into_iter().map(|p| (p, None)).collect(),
            HoleMode::Separate => {
                let mut out = Vec::new();
                for polygon in polygons {
                    out.push((Polygon::new(polygon.exterior, Vec::new()), Some(false)));
                    for mut hole in polygon.holes {
                        hole.reverse();
                        out.push((Polygon::new(hole, Vec::new()), Some(true)));
                    }
                }
                out
            }
        }
    }
}
