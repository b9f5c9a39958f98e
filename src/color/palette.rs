//! Palette entries keyed by cluster index
//!
//! A palette is created once from the final k-means centroids and never
//! modified afterwards. Entry ids are dense and equal to their position, so a
//! color id doubles as an index into the entry list.

use crate::io::error::{PipelineError, Result, malformed};
use crate::math::distance::{nearest_index, to_f64};
use serde::{Deserialize, Serialize};

/// One representative color of the palette
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Cluster index this color came from
    pub id: usize,
    /// Integer color channels
    pub rgb: [u8; 3],
    /// Lowercase `#rrggbb` form of `rgb`
    pub hex: String,
}

impl PaletteEntry {
    /// Create an entry, deriving the hex string from the channels
    pub fn new(id: usize, rgb: [u8; 3]) -> Self {
        Self {
            id,
            rgb,
            hex: hex_string(rgb),
        }
    }
}

/// Ordered, immutable set of palette entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Build a palette from floating point centroids
    ///
    /// Channels are truncated towards zero after clamping to `0..=255`.
    pub fn from_centroids(centroids: &[[f64; 3]]) -> Self {
        let entries = centroids
            .iter()
            .enumerate()
            .map(|(id, centroid)| PaletteEntry::new(id, centroid.map(truncate_channel)))
            .collect();
        Self { entries }
    }

    /// Build a palette from plain colors, assigning ids in order
    pub fn from_colors(colors: &[[u8; 3]]) -> Self {
        let entries = colors
            .iter()
            .enumerate()
            .map(|(id, &rgb)| PaletteEntry::new(id, rgb))
            .collect();
        Self { entries }
    }

    /// Validate entries read back from a palette file
    ///
    /// # Errors
    ///
    /// Returns a malformed data error naming the offending field if the list is
    /// empty, an id does not equal its position, or a hex string disagrees
    /// with its rgb channels
    pub fn from_entries(entries: Vec<PaletteEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(malformed("[]", &"palette has no entries"));
        }

        for (position, entry) in entries.iter().enumerate() {
            if entry.id != position {
                return Err(malformed(
                    format!("[{position}].id"),
                    &format!("expected id {position}, found {}", entry.id),
                ));
            }
            match parse_hex(&entry.hex) {
                Some(rgb) if rgb == entry.rgb => {}
                Some(_) => {
                    return Err(malformed(
                        format!("[{position}].hex"),
                        &format!("'{}' does not match rgb {:?}", entry.hex, entry.rgb),
                    ));
                }
                None => {
                    return Err(malformed(
                        format!("[{position}].hex"),
                        &format!("'{}' is not a #rrggbb color", entry.hex),
                    ));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Iterate entries in id order
    pub fn iter(&self) -> std::slice::Iter<'_, PaletteEntry> {
        self.entries.iter()
    }

    /// Look up an entry by id
    pub fn get(&self, id: usize) -> Option<&PaletteEntry> {
        self.entries.get(id)
    }

    /// Whether `id` references an entry
    pub fn contains(&self, id: usize) -> bool {
        id < self.entries.len()
    }

    /// Channels of the entry with the given id
    ///
    /// # Errors
    ///
    /// Returns an error if `id` does not reference an entry
    pub fn rgb(&self, id: usize) -> Result<[u8; 3]> {
        self.get(id)
            .map(|entry| entry.rgb)
            .ok_or(PipelineError::InvalidColorId {
                id,
                palette_len: self.entries.len(),
            })
    }

    /// Entry whose color is nearest to `color` by Euclidean RGB distance
    ///
    /// Exact ties resolve to the lowest id.
    pub fn nearest(&self, color: [f64; 3]) -> Option<&PaletteEntry> {
        nearest_index(color, self.entries.iter().map(|entry| to_f64(entry.rgb)))
            .and_then(|index| self.entries.get(index))
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Format channels as lowercase `#rrggbb`
pub fn hex_string(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Parse a `#rrggbb` string (either case) into channels
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

fn truncate_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
