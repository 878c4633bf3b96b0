//! Built-in strand presets.
//!
//! The catalog is immutable data built once on first use: one base record per
//! [`StrandSystemType`] and one size entry per `(system, axis)` pair. Deriving
//! parameters is a pair of map lookups, never a chain of comparisons.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::data::*;

/// Segment counts offered for hair.
pub const HAIR_SEGMENT_CHOICES: &[u32] = &[2, 3, 5, 7, 10, 15];
/// Segment counts offered for fur.
pub const FUR_SEGMENT_CHOICES: &[u32] = &[3, 5, 7, 10, 15, 25];

/// Segment count for presets with a fixed count, or the choice list for tunable ones.
#[derive(Clone, Copy, Debug)]
pub enum SegmentPolicy {
    Fixed(u32),
    Choice {
        options: &'static [u32],
        default: u32,
    },
}

impl SegmentPolicy {
    pub fn default_segments(&self) -> u32 {
        match self {
            Self::Fixed(n) => *n,
            Self::Choice { default, .. } => *default,
        }
    }

    pub fn options(&self) -> &'static [u32] {
        match self {
            Self::Fixed(_) => &[],
            Self::Choice { options, .. } => options,
        }
    }
}

/// Per-preset values that do not depend on size buckets.
#[derive(Clone, Debug)]
pub struct PresetBase {
    pub segments: SegmentPolicy,
    pub taper_shape: f32,
    pub tip_thickness: f32,
    pub clump_factor: f32,
    pub clump_shape: f32,
    pub child_type: ChildType,
    pub child_radius: f32,
    pub use_emit_random: bool,
    pub use_even_distribution: bool,
    pub jitter_per_face: u32,
    pub jitter_factor: f32,
    pub use_length_vertex_group: bool,
    pub parent_count: u32,
    pub child_count: u32,
    pub hair_dynamics: bool,
    pub kink: Option<KinkSettings>,
}

/// A value read from one size axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeValue {
    Length { hair_length: f32, child_length: f32 },
    Thickness(f32),
}

/// Size table for one `(system, axis)` pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeEntry {
    /// Indexed by [`SizeBucket::index`].
    Bucketed([SizeValue; 5]),
    /// The preset ignores the bucket.
    Fixed(SizeValue),
}

impl SizeEntry {
    fn pick(
        &self,
        system: StrandSystemType,
        axis: SizeAxis,
        bucket: Option<SizeBucket>,
    ) -> Result<SizeValue, CatalogError> {
        match self {
            Self::Fixed(value) => Ok(*value),
            Self::Bucketed(values) => bucket
                .map(|b| values[b.index()])
                .ok_or(CatalogError::MissingSize { system, axis }),
        }
    }
}

pub struct PresetCatalog {
    bases: HashMap<StrandSystemType, PresetBase>,
    sizes: HashMap<(StrandSystemType, SizeAxis), SizeEntry>,
}

static CATALOG: LazyLock<PresetCatalog> = LazyLock::new(PresetCatalog::builtin);

/// The process-wide built-in catalog.
pub fn catalog() -> &'static PresetCatalog {
    &CATALOG
}

/// Derive parameters with the catalog's default counts, segments and dynamics.
pub fn derive(
    system: StrandSystemType,
    length: Option<SizeBucket>,
    thickness: Option<SizeBucket>,
) -> Result<StrandParameters, CatalogError> {
    catalog().derive(system, length, thickness, &PresetTuning::default())
}

impl PresetCatalog {
    pub fn base(&self, system: StrandSystemType) -> Result<&PresetBase, CatalogError> {
        self.bases
            .get(&system)
            .ok_or(CatalogError::MissingEntry(system))
    }

    pub fn size_entry(
        &self,
        system: StrandSystemType,
        axis: SizeAxis,
    ) -> Result<&SizeEntry, CatalogError> {
        self.sizes
            .get(&(system, axis))
            .ok_or(CatalogError::MissingEntry(system))
    }

    /// Segment counts a request may pick for `system`. Empty when fixed.
    pub fn segment_choices(&self, system: StrandSystemType) -> &'static [u32] {
        self.base(system)
            .map(|base| base.segments.options())
            .unwrap_or(&[])
    }

    /// Build a fresh parameter record for one request.
    pub fn derive(
        &self,
        system: StrandSystemType,
        length: Option<SizeBucket>,
        thickness: Option<SizeBucket>,
        tuning: &PresetTuning,
    ) -> Result<StrandParameters, CatalogError> {
        let base = self.base(system)?;

        let SizeValue::Length {
            hair_length,
            child_length,
        } = self
            .size_entry(system, SizeAxis::Length)?
            .pick(system, SizeAxis::Length, length)?
        else {
            return Err(CatalogError::MissingEntry(system));
        };

        let SizeValue::Thickness(root_thickness) = self
            .size_entry(system, SizeAxis::Thickness)?
            .pick(system, SizeAxis::Thickness, thickness)?
        else {
            return Err(CatalogError::MissingEntry(system));
        };

        let segments = match (base.segments, tuning.segments) {
            (policy, None) => policy.default_segments(),
            (SegmentPolicy::Choice { options, .. }, Some(n)) if options.contains(&n) => n,
            (SegmentPolicy::Fixed(fixed), Some(n)) if n == fixed => n,
            (_, Some(n)) => {
                return Err(CatalogError::UnsupportedSegments {
                    system,
                    segments: n,
                });
            }
        };

        Ok(StrandParameters {
            system_type: system,
            parent_count: tuning.parent_count.unwrap_or(base.parent_count),
            child_count: tuning.child_count.unwrap_or(base.child_count),
            segments,
            taper_shape: base.taper_shape,
            hair_length,
            child_length,
            thickness: root_thickness,
            tip_thickness: base.tip_thickness,
            clump_factor: base.clump_factor,
            clump_shape: base.clump_shape,
            child_type: base.child_type,
            child_radius: base.child_radius,
            use_emit_random: base.use_emit_random,
            use_even_distribution: base.use_even_distribution,
            jitter_per_face: base.jitter_per_face,
            jitter_factor: base.jitter_factor,
            use_length_vertex_group: base.use_length_vertex_group,
            hair_dynamics: tuning.hair_dynamics.unwrap_or(base.hair_dynamics),
            kink: base.kink,
        })
    }

    fn builtin() -> Self {
        let mut bases = HashMap::new();
        let mut sizes = HashMap::new();

        for (system, base, length, thickness) in [
            hair(),
            fur(),
            eyelashes(),
            eyebrows(),
            arm_hair(),
            back_hair(),
            chest_hair(),
            leg_hair(),
            stubble(),
        ] {
            bases.insert(system, base);
            sizes.insert((system, SizeAxis::Length), length);
            sizes.insert((system, SizeAxis::Thickness), thickness);
        }

        Self { bases, sizes }
    }
}

type PresetRow = (StrandSystemType, PresetBase, SizeEntry, SizeEntry);

// ---------------------------------------------------------------------------
// Table helpers
// ---------------------------------------------------------------------------

/// Length entry where only the child length varies with the bucket.
fn child_lengths(hair_length: f32, child: [f32; 5]) -> SizeEntry {
    SizeEntry::Bucketed(child.map(|child_length| SizeValue::Length {
        hair_length,
        child_length,
    }))
}

fn thicknesses(values: [f32; 5]) -> SizeEntry {
    SizeEntry::Bucketed(values.map(SizeValue::Thickness))
}

fn fixed_length(hair_length: f32, child_length: f32) -> SizeEntry {
    SizeEntry::Fixed(SizeValue::Length {
        hair_length,
        child_length,
    })
}

fn fixed_thickness(value: f32) -> SizeEntry {
    SizeEntry::Fixed(SizeValue::Thickness(value))
}

fn curl(amplitude: f32, clump: f32, frequency: f32) -> Option<KinkSettings> {
    Some(KinkSettings {
        kind: KinkType::Curl,
        amplitude,
        clump,
        flatness: 0.0,
        frequency,
        shape: 0.0,
    })
}

/// Shared base for the five body-hair presets.
fn body_hair(taper_shape: f32, child_radius: f32, tip_thickness: f32) -> PresetBase {
    PresetBase {
        segments: SegmentPolicy::Fixed(3),
        taper_shape,
        tip_thickness,
        clump_factor: 0.933,
        clump_shape: 0.0,
        child_type: ChildType::Simple,
        child_radius,
        use_emit_random: true,
        use_even_distribution: false,
        jitter_per_face: 0,
        jitter_factor: 1.0,
        use_length_vertex_group: false,
        parent_count: 0,
        child_count: 0,
        hair_dynamics: false,
        kink: None,
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

fn hair() -> PresetRow {
    let base = PresetBase {
        segments: SegmentPolicy::Choice {
            options: HAIR_SEGMENT_CHOICES,
            default: 7,
        },
        // Constant thickness until the very tip.
        taper_shape: -0.75,
        tip_thickness: 0.0,
        clump_factor: 0.9,
        clump_shape: 0.0,
        child_type: ChildType::Simple,
        child_radius: 0.02,
        use_emit_random: true,
        use_even_distribution: false,
        jitter_per_face: 0,
        jitter_factor: 1.0,
        use_length_vertex_group: false,
        parent_count: 100,
        child_count: 3000,
        hair_dynamics: true,
        kink: None,
    };

    // Hair varies the emitted length; children keep full length.
    let length = SizeEntry::Bucketed([0.075, 0.2, 0.3375, 0.475, 0.75].map(|hair_length| {
        SizeValue::Length {
            hair_length,
            child_length: 1.0,
        }
    }));

    (
        StrandSystemType::Hair,
        base,
        length,
        thicknesses([0.01, 0.03, 0.04, 0.05, 0.06]),
    )
}

fn fur() -> PresetRow {
    let base = PresetBase {
        segments: SegmentPolicy::Choice {
            options: FUR_SEGMENT_CHOICES,
            default: 7,
        },
        // Starts tapering at roughly three quarters of the strand.
        taper_shape: -0.5,
        tip_thickness: 0.0,
        clump_factor: 0.0,
        clump_shape: 0.0,
        child_type: ChildType::Interpolated,
        child_radius: 0.001,
        use_emit_random: true,
        use_even_distribution: false,
        jitter_per_face: 0,
        jitter_factor: 1.0,
        use_length_vertex_group: true,
        parent_count: 100,
        child_count: 3000,
        hair_dynamics: true,
        kink: None,
    };

    (
        StrandSystemType::Fur,
        base,
        child_lengths(0.025, [0.125, 0.25, 0.5, 0.75, 1.0]),
        thicknesses([0.025, 0.06875, 0.1125, 0.15625, 0.2]),
    )
}

fn eyelashes() -> PresetRow {
    let base = PresetBase {
        segments: SegmentPolicy::Fixed(5),
        taper_shape: -0.25,
        tip_thickness: 0.0,
        // Strongest clumping, tips pulled together.
        clump_factor: 1.0,
        clump_shape: 0.999,
        child_type: ChildType::Interpolated,
        child_radius: 0.001,
        use_emit_random: false,
        use_even_distribution: true,
        jitter_per_face: 1,
        jitter_factor: 0.0,
        use_length_vertex_group: true,
        parent_count: 100,
        child_count: 3000,
        hair_dynamics: false,
        kink: None,
    };

    (
        StrandSystemType::Eyelashes,
        base,
        child_lengths(0.025, [0.2, 0.3, 0.4, 0.5, 1.0]),
        thicknesses([0.009375, 0.01875, 0.0375, 0.075, 0.10]),
    )
}

fn eyebrows() -> PresetRow {
    let base = PresetBase {
        segments: SegmentPolicy::Fixed(3),
        taper_shape: -0.75,
        tip_thickness: 0.0,
        clump_factor: 0.933,
        clump_shape: 0.0,
        child_type: ChildType::Simple,
        // Larger radii scatter the strands far off the brow.
        child_radius: 0.001,
        use_emit_random: true,
        use_even_distribution: false,
        jitter_per_face: 0,
        jitter_factor: 1.0,
        // Brow length is never driven by the painted weight.
        use_length_vertex_group: false,
        parent_count: 100,
        child_count: 3000,
        hair_dynamics: false,
        kink: None,
    };

    (
        StrandSystemType::Eyebrows,
        base,
        child_lengths(0.06, [0.25, 0.5, 1.0, 1.5, 2.0]),
        thicknesses([0.005, 0.01, 0.02, 0.04, 0.08]),
    )
}

fn arm_hair() -> PresetRow {
    let base = PresetBase {
        kink: curl(0.00125, 0.1, 2.0),
        ..body_hair(-0.75, 0.025, 0.0)
    };
    (
        StrandSystemType::ArmHair,
        base,
        fixed_length(0.06, 0.5),
        fixed_thickness(0.01),
    )
}

fn back_hair() -> PresetRow {
    let base = PresetBase {
        kink: curl(0.005, 0.0, 3.0),
        ..body_hair(-0.75, 0.04, 0.02)
    };
    (
        StrandSystemType::BackHair,
        base,
        fixed_length(0.06, 0.2),
        fixed_thickness(0.04),
    )
}

fn chest_hair() -> PresetRow {
    let base = PresetBase {
        kink: curl(0.0025, 0.1, 4.0),
        ..body_hair(-0.8, 0.04, 0.02)
    };
    (
        StrandSystemType::ChestHair,
        base,
        fixed_length(0.06, 0.6),
        fixed_thickness(0.04),
    )
}

fn leg_hair() -> PresetRow {
    let base = PresetBase {
        kink: curl(0.0025, 0.1, 4.0),
        ..body_hair(-0.75, 0.04, 0.01)
    };
    (
        StrandSystemType::LegHair,
        base,
        fixed_length(0.06, 0.4),
        fixed_thickness(0.04),
    )
}

fn stubble() -> PresetRow {
    (
        StrandSystemType::Stubble,
        body_hair(-0.8, 0.005, 0.10),
        fixed_length(0.06, 0.75),
        fixed_thickness(0.02),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_combinations() -> impl Iterator<Item = (StrandSystemType, SizeBucket, SizeBucket)> {
        StrandSystemType::ALL.into_iter().flat_map(|system| {
            SizeBucket::ALL.into_iter().flat_map(move |length| {
                SizeBucket::ALL
                    .into_iter()
                    .map(move |thickness| (system, length, thickness))
            })
        })
    }

    #[test]
    fn catalog_is_total() {
        for (system, length, thickness) in all_combinations() {
            let params = derive(system, Some(length), Some(thickness))
                .unwrap_or_else(|e| panic!("{system} {length}/{thickness}: {e}"));
            assert_eq!(params.system_type, system);
            assert!(params.segments > 0);
            assert!(params.taper_shape < 0.0);
            assert!(params.hair_length > 0.0);
            assert!(params.child_length > 0.0);
            assert!(params.thickness > 0.0);
        }
    }

    #[test]
    fn body_hair_ignores_buckets() {
        for system in StrandSystemType::ALL.into_iter().filter(|s| !s.is_sizable()) {
            let without = derive(system, None, None).unwrap();
            for (_, length, thickness) in all_combinations().filter(|(s, _, _)| *s == system) {
                assert_eq!(derive(system, Some(length), Some(thickness)).unwrap(), without);
            }
        }
    }

    #[test]
    fn sizes_grow_with_bucket() {
        for system in StrandSystemType::ALL.into_iter().filter(StrandSystemType::is_sizable) {
            let rows: Vec<_> = SizeBucket::ALL
                .into_iter()
                .map(|b| derive(system, Some(b), Some(b)).unwrap())
                .collect();
            for pair in rows.windows(2) {
                assert!(pair[1].child_length >= pair[0].child_length, "{system} length");
                assert!(pair[1].hair_length >= pair[0].hair_length, "{system} hair length");
                assert!(pair[1].thickness > pair[0].thickness, "{system} thickness");
            }
        }
    }

    #[test]
    fn sizable_presets_require_buckets() {
        assert_eq!(
            derive(StrandSystemType::Fur, None, Some(SizeBucket::M)),
            Err(CatalogError::MissingSize {
                system: StrandSystemType::Fur,
                axis: SizeAxis::Length,
            })
        );
        assert_eq!(
            derive(StrandSystemType::Hair, Some(SizeBucket::M), None),
            Err(CatalogError::MissingSize {
                system: StrandSystemType::Hair,
                axis: SizeAxis::Thickness,
            })
        );
    }

    #[test]
    fn medium_hair() {
        let params =
            derive(StrandSystemType::Hair, Some(SizeBucket::M), Some(SizeBucket::M)).unwrap();
        assert_eq!(params.hair_length, 0.3375);
        assert_eq!(params.child_length, 1.0);
        assert_eq!(params.thickness, 0.04);
        assert_eq!(params.segments, 7);
        assert_eq!(params.child_type, ChildType::Simple);
        assert_eq!(params.clump_factor, 0.9);
        assert_eq!(params.parent_count, 100);
        assert_eq!(params.child_count, 3000);
        assert!(params.hair_dynamics);
        assert!(params.kink.is_none());
    }

    #[test]
    fn small_long_eyebrows() {
        let params =
            derive(StrandSystemType::Eyebrows, Some(SizeBucket::S), Some(SizeBucket::L)).unwrap();
        assert_eq!(params.child_length, 0.5);
        assert_eq!(params.thickness, 0.04);
        assert_eq!(params.segments, 3);
        assert_eq!(params.taper_shape, -0.75);
        assert!(!params.use_length_vertex_group);
    }

    #[test]
    fn length_vertex_group_only_for_fur_and_eyelashes() {
        for system in StrandSystemType::ALL {
            let params = derive(system, Some(SizeBucket::M), Some(SizeBucket::M)).unwrap();
            let expected = matches!(system, StrandSystemType::Fur | StrandSystemType::Eyelashes);
            assert_eq!(params.use_length_vertex_group, expected, "{system}");
        }
    }

    #[test]
    fn kink_only_on_curly_body_hair() {
        for system in StrandSystemType::ALL {
            let params = derive(system, Some(SizeBucket::M), Some(SizeBucket::M)).unwrap();
            let curly = matches!(
                system,
                StrandSystemType::ArmHair
                    | StrandSystemType::BackHair
                    | StrandSystemType::ChestHair
                    | StrandSystemType::LegHair
            );
            assert_eq!(params.kink.is_some(), curly, "{system}");
        }

        let chest = derive(StrandSystemType::ChestHair, None, None).unwrap();
        assert_eq!(
            chest.kink,
            Some(KinkSettings {
                kind: KinkType::Curl,
                amplitude: 0.0025,
                clump: 0.1,
                flatness: 0.0,
                frequency: 4.0,
                shape: 0.0,
            })
        );
        assert_eq!(chest.taper_shape, -0.8);
    }

    #[test]
    fn tuning_overrides_defaults() {
        let tuning = PresetTuning {
            parent_count: Some(0),
            child_count: Some(500),
            segments: Some(15),
            hair_dynamics: Some(false),
        };
        let params = catalog()
            .derive(StrandSystemType::Hair, Some(SizeBucket::XL), Some(SizeBucket::XS), &tuning)
            .unwrap();
        assert_eq!(params.parent_count, 0);
        assert_eq!(params.child_count, 500);
        assert_eq!(params.segments, 15);
        assert!(!params.hair_dynamics);
        assert_eq!(params.hair_length, 0.75);
        assert_eq!(params.thickness, 0.01);
    }

    #[test]
    fn segment_overrides_fail_closed() {
        let tuning = |segments| PresetTuning {
            segments: Some(segments),
            ..Default::default()
        };
        let m = Some(SizeBucket::M);

        assert!(catalog().derive(StrandSystemType::Fur, m, m, &tuning(25)).is_ok());
        assert_eq!(
            catalog().derive(StrandSystemType::Hair, m, m, &tuning(25)),
            Err(CatalogError::UnsupportedSegments {
                system: StrandSystemType::Hair,
                segments: 25,
            })
        );
        assert!(catalog().derive(StrandSystemType::Eyelashes, m, m, &tuning(5)).is_ok());
        assert!(catalog().derive(StrandSystemType::Eyelashes, m, m, &tuning(7)).is_err());
    }

    #[test]
    fn segment_choices_are_exposed() {
        assert_eq!(catalog().segment_choices(StrandSystemType::Hair), HAIR_SEGMENT_CHOICES);
        assert_eq!(catalog().segment_choices(StrandSystemType::Fur), FUR_SEGMENT_CHOICES);
        assert!(catalog().segment_choices(StrandSystemType::Stubble).is_empty());
    }
}
