//! The value a decode produces.

use log::warn;

use super::{DecodeDiagnostic, DecodedRegion, FileMetadata, RegionDescriptor, Spectrum};

/// Outcome of decoding one file.
///
/// Built once per decode and not mutated afterwards. Holding fewer spectra
/// than declared regions is a normal outcome; `diagnostics` explains each gap.
#[derive(Debug, Clone, Default)]
pub struct DecodeResult {
    /// Byte offset where the binary segment starts
    pub binary_start_offset: usize,

    /// Every region declared in the header, decoded or not
    pub regions: Vec<RegionDescriptor>,

    /// Header metadata
    pub metadata: FileMetadata,

    /// Decoded regions in declaration order, one per distinct name
    pub spectra: Vec<DecodedRegion>,

    /// Recoverable problems found along the way
    pub diagnostics: Vec<DecodeDiagnostic>,
}

impl DecodeResult {
    /// Look up a decoded region by name.
    pub fn get(&self, name: &str) -> Option<&DecodedRegion> {
        self.spectra.iter().find(|r| r.name() == name)
    }

    /// Look up a decoded spectrum by name.
    pub fn spectrum(&self, name: &str) -> Option<&Spectrum> {
        self.get(name).map(|r| &r.spectrum)
    }

    /// The spectrum decoded for the region declared at `index`.
    ///
    /// Unlike [`get`](Self::get) this tells apart regions that share a name.
    pub fn decoded_at(&self, index: usize) -> Option<&DecodedRegion> {
        self.spectra.iter().find(|r| r.region_index == index)
    }

    /// Names of decoded regions in order.
    pub fn decoded_names(&self) -> Vec<&str> {
        self.spectra.iter().map(|r| r.name()).collect()
    }

    /// Declared regions with no decoded spectrum in the result.
    pub fn omitted_regions(&self) -> Vec<&RegionDescriptor> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(index, _)| self.decoded_at(*index).is_none())
            .map(|(_, region)| region)
            .collect()
    }

    /// Whether every declared region was decoded.
    pub fn is_complete(&self) -> bool {
        self.omitted_regions().is_empty()
    }

    /// Insert with mapping semantics: a repeated name replaces the earlier
    /// spectrum in place and is recorded as a diagnostic.
    pub(crate) fn insert(&mut self, decoded: DecodedRegion) {
        match self.spectra.iter_mut().find(|r| r.name() == decoded.name()) {
            Some(existing) => {
                warn!("Region {} declared twice; keeping the later spectrum", decoded.name());
                self.diagnostics.push(DecodeDiagnostic::DuplicateRegionName {
                    region: decoded.name().to_string(),
                });
                *existing = decoded;
            }
            None => self.spectra.push(decoded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(index: usize, name: &str, y: f64) -> DecodedRegion {
        let descriptor = RegionDescriptor {
            name: name.to_string(),
            points: 2,
            start_ev: 1.0,
            end_ev: 0.0,
        };
        DecodedRegion {
            region_index: index,
            spectrum: Spectrum::assemble(&descriptor, vec![y, y]),
            descriptor,
            marker_offset: 0,
            data_offset: 0,
            mean_intensity: y,
        }
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let mut result = DecodeResult::default();
        result.insert(decoded(0, "C1s", 100.0));
        result.insert(decoded(1, "O1s", 200.0));
        result.insert(decoded(2, "C1s", 300.0));

        assert_eq!(result.decoded_names(), vec!["C1s", "O1s"]);
        assert_eq!(result.spectrum("C1s").unwrap().y, vec![300.0, 300.0]);
        assert_eq!(
            result.diagnostics,
            vec![DecodeDiagnostic::DuplicateRegionName {
                region: "C1s".to_string()
            }]
        );
    }

    #[test]
    fn test_omitted_regions() {
        let mut result = DecodeResult::default();
        result.regions = vec![
            decoded(0, "C1s", 1.0).descriptor,
            decoded(1, "O1s", 1.0).descriptor,
        ];
        result.insert(decoded(1, "O1s", 150.0));

        let omitted: Vec<_> = result.omitted_regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(omitted, vec!["C1s"]);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_shared_name_tracked_by_declaration() {
        let mut result = DecodeResult::default();
        result.regions = vec![
            decoded(0, "C1s", 1.0).descriptor,
            decoded(1, "C1s", 1.0).descriptor,
        ];
        result.insert(decoded(0, "C1s", 400.0));

        assert_eq!(result.decoded_at(0).map(|r| r.mean_intensity), Some(400.0));
        assert!(result.decoded_at(1).is_none());
        assert_eq!(result.omitted_regions().len(), 1);
    }
}
