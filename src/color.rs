//! Palette side of the crate: distinct image colors, their pixel positions, and the per-cluster layers
//! that result from clustering those colors. Decoding and encoding image files is left to the caller.

use crate::{primitive::from_u8, DataSet, Primitive};
use log::{debug, info};
use std::collections::BTreeMap;

/// Schema of a data set built from colors.
pub const COLOR_ATTRIBUTES: [&str; 4] = ["Red", "Green", "Blue", "Alpha"];

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}
impl Rgba {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }

    /// Unpack a `0xAARRGGBB` pixel.
    pub const fn from_argb(argb: u32) -> Self {
        Self::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8, (argb >> 24) as u8)
    }

    pub const fn to_argb(self) -> u32 {
        (self.alpha as u32) << 24 | (self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32
    }

    /// Sum of the color channels, alpha excluded.
    pub const fn brightness(self) -> u32 {
        self.red as u32 + self.green as u32 + self.blue as u32
    }

    /// Values in [`COLOR_ATTRIBUTES`] order.
    pub fn values<T: Primitive>(self) -> Vec<T> {
        [self.red, self.green, self.blue, self.alpha].into_iter().map(from_u8).collect()
    }
}

impl<T: Primitive> DataSet<T> {
    /// One record per color, in iteration order, over [`COLOR_ATTRIBUTES`].
    pub fn from_colors<'c, I: IntoIterator<Item = &'c Rgba>>(colors: I) -> Self {
        let mut data = Self::default();
        data.set_schema(COLOR_ATTRIBUTES.iter().map(|n| n.to_string()).collect());
        for color in colors {
            data.push_unchecked(color.values());
        }
        info!("Recorded {} records.", data.len());
        data
    }
}

/// Pixel position as `(x, y)`.
pub type Position = (u32, u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixel {
    pub position: Position,
    pub color: Rgba,
}

/// All pixels of one color cluster. Positions outside the layer stay transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteLayer {
    pub cluster_no: usize,
    pub colors: Vec<Rgba>,
    pub pixels: Vec<Pixel>,
}

/// Distinct colors of an image, each with the positions it occurs at.
///
/// Colors iterate in a fixed order, so a [`DataSet`] built from the map can be paired back with it by record index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorMap {
    colors: BTreeMap<Rgba, Vec<Position>>,
    width: u32,
    height: u32,
}
impl ColorMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self { colors: BTreeMap::new(), width, height }
    }

    pub fn from_pixels<I: IntoIterator<Item = Pixel>>(width: u32, height: u32, pixels: I) -> Self {
        let mut map = Self::new(width, height);
        pixels.into_iter().for_each(|p| map.add_pixel(p.color, p.position));
        map
    }

    pub fn add_pixel(&mut self, color: Rgba, position: Position) {
        self.colors.entry(color).or_default().push(position);
    }

    /// Remove one occurrence of **position** from **color**. A color left without pixels disappears.
    pub fn remove_pixel(&mut self, color: Rgba, position: Position) -> bool {
        let Some(positions) = self.colors.get_mut(&color) else {
            return false;
        };
        let Some(idx) = positions.iter().position(|&p| p == position) else {
            return false;
        };
        positions.remove(idx);
        if positions.is_empty() {
            self.colors.remove(&color);
        }
        true
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn len(&self) -> usize { self.colors.len() }
    pub fn is_empty(&self) -> bool { self.colors.is_empty() }
    pub fn colors(&self) -> impl Iterator<Item = &Rgba> + '_ { self.colors.keys() }
    pub fn positions(&self, color: &Rgba) -> Option<&[Position]> { self.colors.get(color).map(Vec::as_slice) }

    /// `floor(sqrt(floor(sqrt(width * height))))`, the pixel count under which a color counts as rare.
    pub fn default_pixel_limit(&self) -> usize {
        let area = self.width as u64 * self.height as u64;
        ((area as f64).sqrt().floor().sqrt().floor()) as usize
    }

    /// Fold rare colors into their predecessor.
    ///
    /// Colors are visited in order. A color with at most **pixel_limit** pixels whose brightness differs from the
    /// previously visited color by at most **disparity** gives its pixels to the current representative color.
    /// Every other color becomes the new representative.
    pub fn trim_color_distribution(&self, pixel_limit: usize, disparity: u32) -> ColorMap {
        let mut trimmed = ColorMap::new(self.width, self.height);
        let mut representative: Option<Rgba> = None;
        let mut last_brightness = 0u32;

        for (&color, positions) in &self.colors {
            let brightness = color.brightness();
            let mergeable = positions.len() <= pixel_limit && last_brightness.abs_diff(brightness) <= disparity;
            let target = match representative {
                Some(rep) if mergeable => rep,
                _ => color,
            };
            representative = Some(target);
            trimmed.colors.entry(target).or_default().extend_from_slice(positions);
            last_brightness = brightness;
        }
        debug!("Trimmed {} colors down to {}.", self.len(), trimmed.len());
        trimmed
    }

    /// Data set with one record per color, in this map's color order.
    pub fn to_dataset<T: Primitive>(&self) -> DataSet<T> {
        DataSet::from_colors(self.colors.keys())
    }

    /// Split the image into one layer per cluster.
    ///
    /// **data** must have been built with [`ColorMap::to_dataset`] from this map and then clustered.
    pub fn layers<T: Primitive>(&self, data: &DataSet<T>) -> Vec<PaletteLayer> {
        data.group_by_cluster(self.colors.keys().copied())
            .into_iter()
            .map(|(cluster_no, colors)| {
                let pixels = colors.iter()
                    .flat_map(|color| self.pixels_of(*color))
                    .collect();
                PaletteLayer { cluster_no, colors, pixels }
            })
            .collect()
    }

    /// All pixels of the map, i.e. every layer stacked on top of each other.
    pub fn fused_pixels(&self) -> Vec<Pixel> {
        self.colors.keys().flat_map(|color| self.pixels_of(*color)).collect()
    }

    fn pixels_of(&self, color: Rgba) -> impl Iterator<Item = Pixel> + '_ {
        self.colors.get(&color).into_iter()
            .flatten()
            .map(move |&position| Pixel { position, color })
    }
}
