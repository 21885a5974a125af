#![allow(dead_code)]

use std::f64::consts::PI;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use hand_volume::{BinaryMask, Frame, LevelDisplay, OutputSink};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

/// Vertices of a star with `points` tips, alternating outer and inner radius.
pub fn star_vertices(
    center: (f64, f64),
    points: usize,
    outer: f64,
    inner: f64,
) -> Vec<Point<i32>> {
    (0..points * 2)
        .map(|k| {
            let angle = -PI / 2.0 + k as f64 * PI / points as f64;
            let radius = if k % 2 == 0 { outer } else { inner };
            Point::new(
                (center.0 + radius * angle.cos()).round() as i32,
                (center.1 + radius * angle.sin()).round() as i32,
            )
        })
        .collect()
}

/// Binary mask with a filled star as foreground.
pub fn star_mask(points: usize) -> BinaryMask {
    let mut mask = GrayImage::new(320, 320);
    draw_polygon_mut(
        &mut mask,
        &star_vertices((160.0, 160.0), points, 120.0, 10.0),
        Luma([255]),
    );
    mask
}

/// Grayscale frame with a dark star on a light background.
pub fn star_frame(points: usize) -> Frame {
    let mut frame = GrayImage::from_pixel(320, 320, Luma([230]));
    draw_polygon_mut(
        &mut frame,
        &star_vertices((160.0, 160.0), points, 120.0, 10.0),
        Luma([20]),
    );
    DynamicImage::ImageLuma8(frame)
}

pub fn blank_frame(value: u8) -> Frame {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(320, 240, Luma([value])))
}

/// Records every call, shared between the test and the display thread.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<(u32, u32)>>>);

impl Recorder {
    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.0.lock().unwrap().clone()
    }

    pub fn levels(&self) -> Vec<u32> {
        self.calls().into_iter().map(|(level, _)| level).collect()
    }
}

impl OutputSink for Recorder {
    fn set_level(&mut self, level: u32, max_level: u32) -> Result<()> {
        self.0.lock().unwrap().push((level, max_level));
        Ok(())
    }
}

impl LevelDisplay for Recorder {
    fn show(&mut self, level: u32, max_level: u32) {
        self.0.lock().unwrap().push((level, max_level));
    }
}
