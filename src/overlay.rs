// Header overlay: the strip of pre-rendered images along the top of the
// frame. Each image corresponds to one selectable tool; while it is active
// its image is blitted over the strip, and a bounding box inside the strip
// switches to it when the selection gesture lands there.

use std::fs;
use std::path::PathBuf;

use image::imageops::FilterType;

use crate::config::HEADER_HEIGHT;
use crate::error::Error;
use crate::types::{FrameBuffer, Point, rgb};

/// What a header region selects: a brush color, or the eraser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Brush(u32),
    Eraser,
}

/// Brush colors assigned to regions left to right; the rightmost region is
/// always the eraser. Pure black is reserved as the canvas key color.
const PALETTE: [u32; 3] = [
    rgb(230, 0, 230), // magenta
    rgb(40, 90, 255), // blue
    rgb(0, 200, 80),  // green
];

/// One selectable box inside the header strip, in frame x coordinates.
#[derive(Clone, Copy, Debug)]
pub struct HeaderRegion {
    pub x0: usize,
    pub x1: usize,
    pub tool: Tool,
}

pub struct HeaderSet {
    images: Vec<FrameBuffer>,
    regions: Vec<HeaderRegion>,
    active: usize,
}

impl HeaderSet {
    /// Load every image in `dir` (sorted by filename), scaled to the strip
    /// size. Region boxes are equal slots across the frame width, one per
    /// image; the last slot is the eraser, the rest cycle the palette.
    pub fn load(dir: &str, frame_width: usize) -> Result<Self, Error> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| Error::OverlayLoad(format!("read {dir}: {e}")))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        if paths.len() < 2 {
            return Err(Error::OverlayLoad(format!(
                "{dir} must contain at least two header images, found {}",
                paths.len()
            )));
        }

        let mut images = Vec::with_capacity(paths.len());
        for path in &paths {
            let img = image::open(path)
                .map_err(|e| Error::OverlayLoad(format!("{}: {e}", path.display())))?
                .to_rgb8();
            let img = image::imageops::resize(
                &img,
                frame_width as u32,
                HEADER_HEIGHT as u32,
                FilterType::Triangle,
            );
            let mut pixels = Vec::with_capacity(frame_width * HEADER_HEIGHT);
            for px in img.pixels() {
                pixels.push(rgb(px[0], px[1], px[2]));
            }
            images.push(FrameBuffer {
                width: frame_width,
                height: HEADER_HEIGHT,
                pixels,
            });
        }

        let regions = layout_regions(frame_width, images.len());
        log::info!("loaded {} header images from {dir}", images.len());

        Ok(Self {
            images,
            regions,
            active: 0,
        })
    }

    /// Region index under `p`, or None when the point misses the strip and
    /// every box. Boxes are half-open, so adjacent regions never overlap.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        let (x, y) = p;
        if y < 0 || y >= HEADER_HEIGHT as i32 || x < 0 {
            return None;
        }
        let x = x as usize;
        self.regions
            .iter()
            .position(|r| x >= r.x0 && x < r.x1)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.regions.len() {
            self.active = index;
        }
    }

    pub fn active_tool(&self) -> Tool {
        self.regions[self.active].tool
    }

    /// Copy the active header image over the top of the frame.
    pub fn blit(&self, frame: &mut FrameBuffer) {
        let strip = &self.images[self.active];
        let rows = HEADER_HEIGHT.min(frame.height);
        let cols = strip.width.min(frame.width);
        for y in 0..rows {
            let src = &strip.pixels[y * strip.width..y * strip.width + cols];
            let dst_start = y * frame.width;
            frame.pixels[dst_start..dst_start + cols].copy_from_slice(src);
        }
    }

    #[cfg(test)]
    pub(crate) fn synthetic(frame_width: usize, count: usize) -> Self {
        let images = (0..count)
            .map(|_| FrameBuffer::new(frame_width, HEADER_HEIGHT))
            .collect();
        Self {
            images,
            regions: layout_regions(frame_width, count),
            active: 0,
        }
    }
}

/// Equal slots across the width with a small gap between boxes so a
/// fingertip near a boundary doesn't flicker between neighbors.
fn layout_regions(frame_width: usize, count: usize) -> Vec<HeaderRegion> {
    let slot = frame_width / count;
    let margin = slot / 10;
    (0..count)
        .map(|i| {
            let tool = if i + 1 == count {
                Tool::Eraser
            } else {
                Tool::Brush(PALETTE[i % PALETTE.len()])
            };
            HeaderRegion {
                x0: i * slot + margin,
                x1: (i + 1) * slot - margin,
                tool,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_region_is_eraser() {
        let set = HeaderSet::synthetic(1280, 4);
        assert_eq!(set.regions.last().unwrap().tool, Tool::Eraser);
        assert!(matches!(set.regions[0].tool, Tool::Brush(_)));
    }

    #[test]
    fn hit_inside_box_finds_region() {
        let set = HeaderSet::synthetic(1280, 4);
        // Center of the second slot.
        let hit = set.hit_test((320 + 160, 50));
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn hit_below_strip_misses() {
        let set = HeaderSet::synthetic(1280, 4);
        assert_eq!(set.hit_test((480, HEADER_HEIGHT as i32)), None);
    }

    #[test]
    fn hit_in_gap_between_boxes_misses() {
        let set = HeaderSet::synthetic(1280, 4);
        // The boundary between slot 0 and slot 1 sits inside both margins.
        assert_eq!(set.hit_test((320, 10)), None);
    }

    #[test]
    fn select_switches_active_tool() {
        let mut set = HeaderSet::synthetic(1280, 4);
        let before = set.active_tool();
        set.select(3);
        assert_eq!(set.active_tool(), Tool::Eraser);
        assert_ne!(set.active_tool(), before);
        // Out-of-range selections are ignored.
        set.select(17);
        assert_eq!(set.active_tool(), Tool::Eraser);
    }

    #[test]
    fn blit_copies_strip_rows_only() {
        let set = HeaderSet::synthetic(64, 2);
        let mut frame = FrameBuffer::new(64, 120);
        for px in frame.pixels.iter_mut() {
            *px = 0x00FFFFFF;
        }
        set.blit(&mut frame);
        assert_eq!(frame.get(0, 0), 0);
        assert_eq!(frame.get(0, HEADER_HEIGHT - 1), 0);
        assert_eq!(frame.get(0, HEADER_HEIGHT), 0x00FFFFFF);
    }
}
